//! Typed read model for workflow YAML.
//!
//! Only the parts the compatibility check looks at are modeled; every other
//! key is ignored. Shapes that do not match (for example `jobs` written as a
//! list) fail deserialization with a descriptive error.

use indexmap::IndexMap;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct WorkflowDocument {
    #[serde(default)]
    pub jobs: Option<IndexMap<String, Job>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub steps: Option<Vec<Step>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub uses: Option<String>,
}

impl WorkflowDocument {
    /// Every `uses` reference in job/step order.
    pub fn action_refs(&self) -> impl Iterator<Item = &str> {
        self.jobs
            .iter()
            .flat_map(|jobs| jobs.values())
            .flat_map(|job| job.steps.iter().flatten())
            .filter_map(|step| step.uses.as_deref())
    }
}
