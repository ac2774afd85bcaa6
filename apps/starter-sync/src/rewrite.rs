//! In-place workflow rewrites.
//!
//! Two flavours: text transforms (version pins, where keeping the file
//! byte-identical when nothing matches matters) and document transforms over
//! the parsed YAML tree.

use crate::config::PlaceholderStep;
use crate::error::{Result, SyncError};
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Apply `transform` to the file's text; writes only when it returns new content.
pub fn rewrite_text<F>(path: &Path, transform: F) -> Result<bool>
where
    F: FnOnce(&str) -> Option<String>,
{
    let raw = fs::read_to_string(path).map_err(|e| SyncError::io(path, e))?;
    match transform(&raw) {
        Some(updated) if updated != raw => {
            fs::write(path, updated).map_err(|e| SyncError::io(path, e))?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Parse the file as YAML, apply `transform`, and write the result back.
pub fn rewrite_document<F>(path: &Path, transform: F) -> Result<()>
where
    F: FnOnce(Value) -> Result<Value>,
{
    let raw = fs::read_to_string(path).map_err(|e| SyncError::io(path, e))?;
    let yaml_err = |source: serde_yaml::Error| SyncError::Yaml {
        path: path.to_path_buf(),
        source,
    };
    let doc: Value = serde_yaml::from_str(&raw).map_err(yaml_err)?;
    let doc = transform(doc).map_err(|e| match e {
        SyncError::InvalidWorkflow { message, .. } => SyncError::InvalidWorkflow {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })?;
    let out = serde_yaml::to_string(&doc).map_err(yaml_err)?;
    fs::write(path, out).map_err(|e| SyncError::io(path, e))
}

fn artifact_v4() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"actions/(upload|download)-artifact@v4").expect("artifact pattern is valid")
    })
}

/// Pin `actions/upload-artifact@v4` and `actions/download-artifact@v4` back to `@v3`.
///
/// Returns `None` when the text has nothing to change.
pub fn downgrade_artifact_actions(content: &str) -> Option<String> {
    if !content.contains("@v4") {
        return None;
    }
    let re = artifact_v4();
    if !re.is_match(content) {
        return None;
    }
    Some(re.replace_all(content, "actions/${1}-artifact@v3").into_owned())
}

/// Append `step` to every job's `steps`, creating the list when missing.
///
/// Documents without `jobs` come back unchanged.
pub fn insert_placeholder_step(mut doc: Value, step: &PlaceholderStep) -> Result<Value> {
    match doc.get("jobs") {
        None | Some(Value::Null) => return Ok(doc),
        Some(Value::Mapping(_)) => {}
        Some(_) => return Err(invalid("`jobs` is not a mapping")),
    }

    let mut placeholder = Mapping::new();
    placeholder.insert("name".into(), Value::String(step.name.clone()));
    placeholder.insert("run".into(), Value::String(step.run.clone()));
    let placeholder = Value::Mapping(placeholder);

    if let Some(Value::Mapping(jobs)) = doc.get_mut("jobs") {
        for (name, job) in jobs.iter_mut() {
            let job_name = name.as_str().unwrap_or("<job>");
            let Value::Mapping(job) = job else {
                return Err(invalid(&format!("job `{job_name}` is not a mapping")));
            };
            let steps = job
                .entry("steps".into())
                .or_insert(Value::Sequence(Vec::new()));
            if steps.is_null() {
                *steps = Value::Sequence(Vec::new());
            }
            match steps {
                Value::Sequence(list) => list.push(placeholder.clone()),
                _ => {
                    return Err(invalid(&format!(
                        "`steps` of job `{job_name}` is not a list"
                    )))
                }
            }
        }
    }
    Ok(doc)
}

fn invalid(message: &str) -> SyncError {
    SyncError::InvalidWorkflow {
        path: Default::default(),
        message: message.to_string(),
    }
}
