//! Branch synchronization pipeline.
//!
//! Scans the source tree, switches to the target branch, wipes the
//! regenerated folders and restores only what the target can run, then
//! applies the target-specific rewrites and regenerates CODEOWNERS. Every
//! step runs to completion before the next one starts; the first error
//! aborts the run and leaves the tree as the last finished step left it.

use crate::codeowners::generate_codeowners;
use crate::config::Settings;
use crate::error::{Result, SyncError};
use crate::exec::Git;
use crate::models::CheckResult;
use crate::rewrite::{
    downgrade_artifact_actions, insert_placeholder_step, rewrite_document, rewrite_text,
};
use crate::scan::scan_workflows;
use crate::utils::git_path;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
/// What a sync run did, for the final report.
pub struct SyncReport {
    pub check: CheckResult,
    pub removed: Vec<String>,
    pub restored: Vec<String>,
    pub downgraded: Vec<String>,
    pub placeholders: usize,
    pub codeowners: String,
}

/// Run the full pipeline against `settings.repo_root`.
///
/// `output` selects the format of the inventory summary printed before git runs.
pub async fn run_sync(settings: &Settings, output: &str) -> Result<SyncReport> {
    let root = &settings.repo_root;
    let git = Git::new(root, settings.command_timeout);
    let mut report = SyncReport::default();

    let check = scan_workflows(settings)?;
    // The JSON report carries the partition itself; avoid two documents on stdout.
    if output != "json" {
        crate::output::print_check(&check, output);
    }

    tracing::info!("Switching to branch {}", settings.target_branch);
    git.checkout(&settings.target_branch).await?;

    tracing::info!("Removing synced workflows");
    report.removed = remove_synced_folders(settings)?;

    if !settings.read_only_folders.is_empty() {
        tracing::info!("Restoring read-only folders from {}", settings.source_branch);
        git.checkout_paths(&settings.source_branch, &settings.read_only_folders)
            .await?;
    }

    let paths = restore_paths(settings, &check);
    if !paths.is_empty() {
        tracing::info!(
            count = paths.len(),
            "Restoring compatible workflows from {}",
            settings.source_branch
        );
        git.checkout_paths(&settings.source_branch, &paths).await?;
    }
    report.restored = paths;

    let rewritable: Vec<PathBuf> = check
        .compatible_workflows
        .iter()
        .filter(|w| !settings.is_read_only(&w.folder))
        .map(|w| w.workflow_path())
        .collect();

    for rel in &rewritable {
        if rewrite_text(&root.join(rel), downgrade_artifact_actions)? {
            tracing::info!("Downgraded artifact actions in {}", git_path(rel));
            report.downgraded.push(git_path(rel));
        }
    }

    if let Some(step) = &settings.placeholder {
        for rel in &rewritable {
            rewrite_document(&root.join(rel), |doc| insert_placeholder_step(doc, step))?;
            report.placeholders += 1;
        }
        tracing::info!(count = report.placeholders, "Inserted placeholder steps");
    }

    generate_codeowners(
        &root.join(&settings.codeowners_config),
        &root.join(&settings.codeowners_output),
    )?;
    report.codeowners = settings.codeowners_output.clone();

    report.check = check;
    Ok(report)
}

/// Delete every non-read-only workflow folder and the icons directory.
fn remove_synced_folders(settings: &Settings) -> Result<Vec<String>> {
    let targets = settings
        .folders
        .iter()
        .filter(|f| !settings.is_read_only(f))
        .chain(std::iter::once(&settings.icons_dir));
    let mut removed = Vec::new();
    for rel in targets {
        let path = settings.repo_root.join(rel);
        if remove_path(&path)? {
            removed.push(rel.clone());
        }
    }
    Ok(removed)
}

fn remove_path(path: &Path) -> Result<bool> {
    let res = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match res {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(SyncError::io(path, e)),
    }
}

/// Paths to check out from the source branch for the compatible workflows.
///
/// Read-only folders were restored wholesale, so only their icons are listed.
pub fn restore_paths(settings: &Settings, check: &CheckResult) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();
    let mut push = |p: String| {
        if !paths.contains(&p) {
            paths.push(p);
        }
    };
    for w in &check.compatible_workflows {
        if !settings.is_read_only(&w.folder) {
            push(git_path(&w.workflow_path()));
            push(git_path(&w.properties_path()));
        }
        if let Some(icon) = w.icon_path(&settings.icons_dir) {
            push(git_path(&icon));
        }
    }
    paths
}
