//! Workflow inventory scan.
//!
//! Walks the configured folders, loads each workflow's sidecar and decides
//! whether it can be synced to the target branch:
//!
//! - partner workflows are never synced;
//! - workflows in the restricted-category folder need `enterprise: true`;
//! - read-only folders skip the action allow-list, everything else must pass it.

use crate::check::{check_workflow, AllowList};
use crate::config::Settings;
use crate::error::{Result, SyncError};
use crate::models::properties::WorkflowProperties;
use crate::models::{CheckResult, IconType, WorkflowDescriptor};
use crate::properties::load_properties;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Scan every configured folder and partition its workflows.
pub fn scan_workflows(settings: &Settings) -> Result<CheckResult> {
    let allow_list = AllowList::new(&settings.enabled_actions);
    let partners: HashSet<String> = settings.partners.iter().map(|p| p.to_lowercase()).collect();

    let mut result = CheckResult::default();
    for folder in &settings.folders {
        let dir = settings.repo_root.join(folder);
        for (id, path) in list_workflow_files(&dir)? {
            let Some(props) = load_properties(&dir, &id) else {
                continue;
            };
            let enabled = is_enabled(settings, folder, &path, &props, &partners, &allow_list)?;
            let desc = WorkflowDescriptor {
                folder: folder.clone(),
                id,
                icon_type: IconType::from_icon_name(props.icon_name.as_deref()),
                icon_name: props.icon_name,
            };
            if enabled {
                result.compatible_workflows.push(desc);
            } else {
                result.incompatible_workflows.push(desc);
            }
        }
    }
    Ok(result)
}

fn is_enabled(
    settings: &Settings,
    folder: &str,
    path: &Path,
    props: &WorkflowProperties,
    partners: &HashSet<String>,
    allow_list: &AllowList,
) -> Result<bool> {
    let is_partner = props
        .creator
        .as_ref()
        .is_some_and(|c| partners.contains(&c.to_lowercase()));
    let is_restricted = Path::new(folder)
        .file_name()
        .is_some_and(|name| name == settings.restricted_folder.as_str());
    let is_read_only = settings.is_read_only(folder);

    Ok(!is_partner
        && (props.enterprise == Some(true) || !is_restricted)
        && (is_read_only || check_workflow(path, allow_list)?))
}

/// Regular `.yml` files in `dir` as `(id, path)`, sorted by file name.
fn list_workflow_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(dir).map_err(|e| SyncError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SyncError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| SyncError::io(entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("yml") {
            continue;
        }
        if let Some(id) = path.file_stem().and_then(|s| s.to_str()) {
            files.push((id.to_string(), path.clone()));
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn add_workflow(root: &Path, folder: &str, id: &str, uses: &str, props: &str) {
        let dir = root.join(folder);
        fs::create_dir_all(dir.join("properties")).unwrap();
        fs::write(
            dir.join(format!("{id}.yml")),
            format!("on: push\njobs:\n  build:\n    steps:\n      - uses: {uses}\n"),
        )
        .unwrap();
        fs::write(dir.join(format!("properties/{id}.properties.json")), props).unwrap();
    }

    fn settings(root: &Path) -> Settings {
        let mut s = Settings::with_defaults(root);
        s.folders = vec!["ci".into(), "code-scanning".into(), "pages".into()];
        s.read_only_folders = vec!["pages".into()];
        s.enabled_actions = vec!["actions/checkout".into(), "github/codeql-action".into()];
        s.partners = vec!["Acme Cloud".into()];
        s
    }

    fn ids(list: &[WorkflowDescriptor]) -> Vec<String> {
        list.iter().map(|d| d.key()).collect()
    }

    #[test]
    fn test_partitions_by_policy() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let plain = r#"{"name":"n","description":"d","iconName":"go"}"#;
        add_workflow(root, "ci", "go", "actions/checkout@v4", plain);
        add_workflow(root, "ci", "azure", "azure/login@v1", plain);
        add_workflow(
            root,
            "ci",
            "partner",
            "actions/checkout@v4",
            r#"{"name":"n","description":"d","creator":"ACME cloud"}"#,
        );
        add_workflow(root, "code-scanning", "codeql", "github/codeql-action/init@v3", plain);
        add_workflow(
            root,
            "code-scanning",
            "codeql-ent",
            "github/codeql-action/init@v3",
            r#"{"name":"n","description":"d","enterprise":true}"#,
        );
        add_workflow(root, "pages", "hugo", "peaceiris/actions-hugo@v2", plain);

        let res = scan_workflows(&settings(root)).unwrap();
        assert_eq!(
            ids(&res.compatible_workflows),
            vec!["ci/go", "code-scanning/codeql-ent", "pages/hugo"]
        );
        assert_eq!(
            ids(&res.incompatible_workflows),
            vec!["ci/azure", "ci/partner", "code-scanning/codeql"]
        );
    }

    #[test]
    fn test_partner_in_read_only_folder_is_excluded() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("ci")).unwrap();
        fs::create_dir_all(root.join("code-scanning")).unwrap();
        add_workflow(
            root,
            "pages",
            "acme",
            "actions/checkout@v4",
            r#"{"name":"n","description":"d","creator":"Acme Cloud"}"#,
        );
        let res = scan_workflows(&settings(root)).unwrap();
        assert!(res.compatible_workflows.is_empty());
        assert_eq!(ids(&res.incompatible_workflows), vec!["pages/acme"]);
    }

    #[test]
    fn test_skips_without_sidecar_and_non_yml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("code-scanning")).unwrap();
        fs::create_dir_all(root.join("pages")).unwrap();
        add_workflow(root, "ci", "go", "actions/checkout@v4", r#"{"name":"n","description":"d"}"#);
        fs::write(root.join("ci/orphan.yml"), "jobs: {}\n").unwrap();
        fs::write(root.join("ci/readme.md"), "# hi").unwrap();
        fs::write(root.join("ci/other.yaml"), "jobs: {}\n").unwrap();
        fs::create_dir_all(root.join("ci/dir.yml")).unwrap();

        let res = scan_workflows(&settings(root)).unwrap();
        assert_eq!(ids(&res.compatible_workflows), vec!["ci/go"]);
        assert!(res.incompatible_workflows.is_empty());
    }

    #[test]
    fn test_icon_types() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("code-scanning")).unwrap();
        fs::create_dir_all(root.join("pages")).unwrap();
        add_workflow(
            root,
            "ci",
            "a",
            "actions/checkout@v4",
            r#"{"name":"n","description":"d","iconName":"octicon gear"}"#,
        );
        add_workflow(root, "ci", "b", "actions/checkout@v4", r#"{"name":"n","description":"d"}"#);
        let res = scan_workflows(&settings(root)).unwrap();
        assert_eq!(res.compatible_workflows[0].icon_type, IconType::Octicon);
        assert_eq!(res.compatible_workflows[1].icon_type, IconType::Svg);
        assert_eq!(res.compatible_workflows[1].icon_name, None);
    }

    #[test]
    fn test_missing_folder_is_fatal() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            scan_workflows(&settings(dir.path())),
            Err(SyncError::Io { .. })
        ));
    }

    #[test]
    fn test_broken_workflow_yaml_is_fatal() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("code-scanning")).unwrap();
        fs::create_dir_all(root.join("pages")).unwrap();
        add_workflow(root, "ci", "go", "actions/checkout@v4", r#"{"name":"n","description":"d"}"#);
        fs::write(root.join("ci/go.yml"), "jobs: [oops\n").unwrap();
        assert!(matches!(
            scan_workflows(&settings(root)),
            Err(SyncError::Yaml { .. })
        ));
    }
}
