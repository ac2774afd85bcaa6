//! CODEOWNERS generation from a JSON list of ownership rules.

use crate::error::{Result, SyncError};
use crate::models::codeowners::CodeOwnersConfig;
use std::fs;
use std::path::Path;

const HEADER: &str =
    "# This file is generated by starter-sync from the codeowners config. Do not edit it by hand.";

/// Render the CODEOWNERS text: header, blank line, one line per rule.
pub fn render_codeowners(config: &CodeOwnersConfig) -> String {
    let mut lines = vec![HEADER.to_string(), String::new()];
    for rule in &config.owners {
        lines.push(format!("{} {}", rule.pattern, rule.teams.join(" ")));
    }
    lines.push(String::new());
    lines.join("\n")
}

pub fn load_codeowners_config(path: &Path) -> Result<CodeOwnersConfig> {
    let raw = fs::read_to_string(path).map_err(|e| SyncError::io(path, e))?;
    serde_json::from_str(&raw).map_err(|source| SyncError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Read rules from `config_path` and (over)write `output_path`.
pub fn generate_codeowners(config_path: &Path, output_path: &Path) -> Result<()> {
    let config = load_codeowners_config(config_path)?;
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
    }
    fs::write(output_path, render_codeowners(&config))
        .map_err(|e| SyncError::io(output_path, e))?;
    tracing::info!(
        rules = config.owners.len(),
        "wrote {}",
        crate::utils::rel_to_wd(output_path)
    );
    Ok(())
}
