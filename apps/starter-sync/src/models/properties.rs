//! Per-workflow metadata sidecar (`properties/<id>.properties.json`).

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Metadata describing one starter workflow.
pub struct WorkflowProperties {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub icon_name: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub enterprise: Option<bool>,
}
