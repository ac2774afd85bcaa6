//! Workflow compatibility check against the action allow-list.

use crate::error::{Result, SyncError};
use crate::models::workflow::WorkflowDocument;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Allow-listed actions at `owner/repo` granularity, compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    actions: HashSet<String>,
}

impl AllowList {
    pub fn new<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            actions: actions
                .into_iter()
                .map(|a| a.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Whether a `uses:` reference resolves to an allow-listed `owner/repo`.
    pub fn allows(&self, uses: &str) -> bool {
        self.actions.contains(&action_nwo(uses).to_lowercase())
    }
}

/// Reduce a `uses:` reference to `owner/repo`.
///
/// The version after `@` and any sub-path past the second segment are dropped:
/// `github/codeql-action/init@v3` becomes `github/codeql-action`.
pub fn action_nwo(uses: &str) -> String {
    let name = uses.split('@').next().unwrap_or(uses);
    name.split('/').take(2).collect::<Vec<_>>().join("/")
}

/// Check that every step of the workflow at `path` uses an allowed action.
///
/// Returns on the first disallowed reference. Read and parse failures are
/// errors, not "incompatible".
pub fn check_workflow(path: &Path, allow_list: &AllowList) -> Result<bool> {
    let raw = fs::read_to_string(path).map_err(|e| SyncError::io(path, e))?;
    let doc: WorkflowDocument = serde_yaml::from_str(&raw).map_err(|source| SyncError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    match first_disallowed(&doc, allow_list) {
        Some(uses) => {
            tracing::info!("{}", incompatibility_message(path, uses));
            Ok(false)
        }
        None => Ok(true),
    }
}

/// The first `uses:` reference, in document order, not on the allow-list.
pub fn first_disallowed<'a>(
    doc: &'a WorkflowDocument,
    allow_list: &AllowList,
) -> Option<&'a str> {
    doc.action_refs().find(|uses| !allow_list.allows(uses))
}

fn incompatibility_message(path: &Path, uses: &str) -> String {
    let action = uses.split('@').next().unwrap_or(uses);
    format!(
        "Workflow {} uses '{}' which is not supported on the target.",
        crate::utils::rel_to_wd(path),
        action
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn allow() -> AllowList {
        AllowList::new(["actions/checkout", "Actions/Setup-Node", "github/codeql-action"])
    }

    fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let p = dir.join(name);
        fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn test_action_nwo_strips_version_and_subpath() {
        assert_eq!(action_nwo("actions/checkout@v4"), "actions/checkout");
        assert_eq!(action_nwo("github/codeql-action/init@v3"), "github/codeql-action");
        assert_eq!(action_nwo("actions/checkout"), "actions/checkout");
        assert_eq!(action_nwo("./.github/actions/local"), "./.github");
    }

    #[test]
    fn test_allow_list_is_case_insensitive() {
        let a = allow();
        assert!(a.allows("ACTIONS/checkout@main"));
        assert!(a.allows("actions/setup-node@v4"));
        assert!(!a.allows("docker://alpine:3"));
    }

    #[test]
    fn test_all_allowed_is_compatible() {
        let dir = tempdir().unwrap();
        let p = write(
            dir.path(),
            "ok.yml",
            "on: push\njobs:\n  build:\n    steps:\n      - uses: actions/checkout@v4\n      - uses: github/codeql-action/analyze@v3\n      - run: echo hi\n",
        );
        assert!(check_workflow(&p, &allow()).unwrap());
    }

    #[test]
    fn test_no_uses_is_compatible() {
        let dir = tempdir().unwrap();
        let p = write(dir.path(), "plain.yml", "on: push\njobs:\n  a:\n    steps:\n      - run: make\n");
        assert!(check_workflow(&p, &allow()).unwrap());
        let q = write(dir.path(), "nojobs.yml", "name: nothing\n");
        assert!(check_workflow(&q, &allow()).unwrap());
    }

    #[test]
    fn test_unknown_action_is_incompatible() {
        let dir = tempdir().unwrap();
        let p = write(
            dir.path(),
            "azure.yml",
            "jobs:\n  build:\n    steps:\n      - uses: actions/checkout@v4\n  deploy:\n    steps:\n      - uses: azure/webapps-deploy@v2\n",
        );
        assert!(!check_workflow(&p, &allow()).unwrap());
    }

    #[test]
    fn test_only_first_disallowed_reference_is_reported() {
        let doc: WorkflowDocument = serde_yaml::from_str(
            "jobs:\n  build:\n    steps:\n      - uses: actions/checkout@v4\n      - uses: azure/login@v1\n  deploy:\n    steps:\n      - uses: azure/webapps-deploy@v2\n",
        )
        .unwrap();
        assert_eq!(first_disallowed(&doc, &allow()), Some("azure/login@v1"));

        let msg = incompatibility_message(Path::new("ci/azure.yml"), "azure/login@v1");
        assert!(msg.contains("azure.yml"));
        assert!(msg.contains("'azure/login'"));
        assert!(!msg.contains("webapps-deploy"));
        assert!(!msg.contains("@v1"));
    }

    #[test]
    fn test_unparsable_workflow_is_an_error() {
        let dir = tempdir().unwrap();
        let p = write(dir.path(), "bad.yml", "jobs: [unclosed\n");
        assert!(matches!(
            check_workflow(&p, &allow()),
            Err(SyncError::Yaml { .. })
        ));
        let missing = dir.path().join("missing.yml");
        assert!(matches!(
            check_workflow(&missing, &allow()),
            Err(SyncError::Io { .. })
        ));
    }
}
