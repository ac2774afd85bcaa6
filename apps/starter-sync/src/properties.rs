//! Loader for workflow metadata sidecars.
//!
//! A missing or unparsable sidecar is not an error: the workflow is simply
//! left out of the inventory.

use crate::models::properties::WorkflowProperties;
use crate::models::properties_path;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Load `<folder>/properties/<id>.properties.json`, or `None` to skip the workflow.
pub fn load_properties(folder: &Path, id: &str) -> Option<WorkflowProperties> {
    let path = properties_path(folder, id);
    let raw = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no properties sidecar; skipping workflow");
            return None;
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable properties sidecar; skipping workflow");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(props) => Some(props),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid properties sidecar; skipping workflow");
            None
        }
    }
}
