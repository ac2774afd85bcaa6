//! Shared data models: workflow descriptors, sidecar metadata, the typed
//! workflow read model and the CODEOWNERS configuration.

pub mod codeowners;
pub mod properties;
pub mod workflow;

use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// How a workflow's icon is provided.
pub enum IconType {
    /// A file under the icons directory.
    Svg,
    /// A built-in octicon; nothing to copy.
    Octicon,
}

impl IconType {
    pub fn from_icon_name(icon_name: Option<&str>) -> Self {
        match icon_name {
            Some(name) if name.starts_with("octicon") => IconType::Octicon,
            _ => IconType::Svg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
/// One starter workflow found while scanning.
pub struct WorkflowDescriptor {
    /// Folder as configured, relative to the repository root.
    pub folder: String,
    pub id: String,
    pub icon_name: Option<String>,
    pub icon_type: IconType,
}

impl WorkflowDescriptor {
    /// `<folder>/<id>.yml`
    pub fn workflow_path(&self) -> PathBuf {
        Path::new(&self.folder).join(format!("{}.yml", self.id))
    }

    /// `<folder>/properties/<id>.properties.json`
    pub fn properties_path(&self) -> PathBuf {
        properties_path(Path::new(&self.folder), &self.id)
    }

    /// Icon file to carry along, if the workflow uses a named svg icon.
    pub fn icon_path(&self, icons_dir: &str) -> Option<PathBuf> {
        match (&self.icon_type, self.icon_name.as_deref()) {
            (IconType::Svg, Some(name)) if !name.is_empty() => {
                Some(Path::new(icons_dir).join(format!("{}.svg", name)))
            }
            _ => None,
        }
    }

    /// Display key used in reports.
    pub fn key(&self) -> String {
        format!("{}/{}", self.folder, self.id)
    }
}

/// Sidecar location for workflow `id` inside `folder`.
pub fn properties_path(folder: &Path, id: &str) -> PathBuf {
    folder
        .join("properties")
        .join(format!("{}.properties.json", id))
}

#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
/// Partition of scanned workflows. Each descriptor lands on exactly one side.
pub struct CheckResult {
    pub compatible_workflows: Vec<WorkflowDescriptor>,
    pub incompatible_workflows: Vec<WorkflowDescriptor>,
}
