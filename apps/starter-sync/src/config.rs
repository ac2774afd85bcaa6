//! Configuration discovery and effective settings resolution.
//!
//! starter-sync reads `starter-sync.toml|yaml|yml` from the repository root
//! (or the closest ancestor holding one or a `.git` directory) and merges it
//! with CLI flags to produce a single [`Settings`] value that is passed down
//! to every component.
//!
//! Defaults:
//! - `folders`: `ci automation deployments code-scanning pages`
//! - `read_only_folders`: `code-scanning`
//! - `enabled_actions`: actions available on GitHub Enterprise Server
//! - `partners`: cloud/partner names whose workflows are never synced
//! - `icons_dir`: `icons`, `restricted_folder`: `code-scanning`
//! - `source_branch`: `main`, `target_branch`: `ghes`
//! - `codeowners.config`: `script/sync-ghes/codeowners.json`
//! - `codeowners.output`: `.github/CODEOWNERS`
//! - `placeholder.enabled`: true, `commands.timeout_secs`: none
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::error::{Result, SyncError};
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

const CONFIG_FILES: [&str; 3] = [
    "starter-sync.toml",
    "starter-sync.yaml",
    "starter-sync.yml",
];

const DEFAULT_FOLDERS: &[&str] = &["ci", "automation", "deployments", "code-scanning", "pages"];
const DEFAULT_READ_ONLY_FOLDERS: &[&str] = &["code-scanning"];
const DEFAULT_ENABLED_ACTIONS: &[&str] = &[
    "actions/cache",
    "actions/checkout",
    "actions/configure-pages",
    "actions/create-release",
    "actions/delete-package-versions",
    "actions/deploy-pages",
    "actions/download-artifact",
    "actions/jekyll-build-pages",
    "actions/setup-dotnet",
    "actions/setup-go",
    "actions/setup-java",
    "actions/setup-node",
    "actions/setup-python",
    "actions/stale",
    "actions/starter-workflows",
    "actions/upload-artifact",
    "actions/upload-pages-artifact",
    "actions/upload-release-asset",
    "github/codeql-action",
];
const DEFAULT_PARTNERS: &[&str] = &[
    "Alibaba Cloud",
    "Amazon Web Services",
    "Microsoft Azure",
    "Google Cloud",
    "IBM",
    "Red Hat",
    "Tencent Cloud",
    "HashiCorp",
    "OpenShift",
];
pub const DEFAULT_PLACEHOLDER_NAME: &str = "Placeholder step for GitHub Enterprise Server";
pub const DEFAULT_PLACEHOLDER_RUN: &str =
    "echo \"Replace this step with the commands your workflow needs.\"";

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `starter-sync.toml|yaml`.
pub struct FileConfig {
    pub folders: Option<Vec<String>>,
    #[serde(alias = "readOnlyFolders")]
    pub read_only_folders: Option<Vec<String>>,
    #[serde(alias = "enabledActions")]
    pub enabled_actions: Option<Vec<String>>,
    pub partners: Option<Vec<String>>,
    pub icons_dir: Option<String>,
    pub restricted_folder: Option<String>,
    pub source_branch: Option<String>,
    pub target_branch: Option<String>,
    #[serde(default)]
    pub codeowners: Option<CodeOwnersCfg>,
    #[serde(default)]
    pub placeholder: Option<PlaceholderCfg>,
    #[serde(default)]
    pub commands: Option<CommandsCfg>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// `[codeowners]`: where rules are read from and where the file is written.
pub struct CodeOwnersCfg {
    pub config: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// `[placeholder]`: the step appended to every job of synced workflows.
pub struct PlaceholderCfg {
    pub enabled: Option<bool>,
    pub name: Option<String>,
    pub run: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct CommandsCfg {
    pub timeout_secs: Option<u64>,
}

/// CLI-provided overrides; `None` falls through to the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub repo_root: Option<String>,
    pub config: Option<String>,
    pub source_branch: Option<String>,
    pub target_branch: Option<String>,
    pub timeout_secs: Option<u64>,
    pub no_placeholder: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderStep {
    pub name: String,
    pub run: String,
}

#[derive(Debug, Clone)]
/// Fully-resolved settings used by every command after applying precedence.
pub struct Settings {
    pub repo_root: PathBuf,
    /// Workflow folders, relative to `repo_root`.
    pub folders: Vec<String>,
    pub read_only_folders: Vec<String>,
    pub enabled_actions: Vec<String>,
    pub partners: Vec<String>,
    pub icons_dir: String,
    pub restricted_folder: String,
    pub source_branch: String,
    pub target_branch: String,
    pub codeowners_config: String,
    pub codeowners_output: String,
    pub placeholder: Option<PlaceholderStep>,
    pub command_timeout: Option<Duration>,
}

impl Settings {
    /// Defaults rooted at `repo_root`, as if no config file existed.
    pub fn with_defaults(repo_root: &Path) -> Self {
        resolve(repo_root.to_path_buf(), FileConfig::default(), &Overrides::default())
    }

    pub fn is_read_only(&self, folder: &str) -> bool {
        self.read_only_folders.iter().any(|f| same_folder(f, folder))
    }
}

/// `ci`, `ci/` and `./ci` name the same folder.
fn same_folder(a: &str, b: &str) -> bool {
    let parts = |p: &str| {
        Path::new(p)
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect::<PathBuf>()
    };
    parts(a) == parts(b)
}

/// Absolute starting point for root detection; relative paths hang off `cwd`.
fn start_dir(repo_root: Option<&str>, cwd: &Path) -> PathBuf {
    let path = Path::new(repo_root.unwrap_or("."));
    let abs = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    abs.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `starter-sync.toml|yaml|yml` or a `.git` entry is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|name| cur.join(name).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `FileConfig` from `starter-sync.toml` or `starter-sync.yaml|yml` if present.
pub fn load_config(root: &Path) -> Result<Option<FileConfig>> {
    for name in CONFIG_FILES {
        let p = root.join(name);
        if p.is_file() {
            return load_config_file(&p).map(Some);
        }
    }
    Ok(None)
}

/// Parse an explicit config file; the extension picks TOML or YAML.
pub fn load_config_file(path: &Path) -> Result<FileConfig> {
    let s = fs::read_to_string(path).map_err(|e| SyncError::io(path, e))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&s).map_err(|source| SyncError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        toml::from_str(&s).map_err(|source| SyncError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolve `Settings` by merging CLI overrides, discovered config, and defaults.
pub fn resolve_settings(overrides: &Overrides) -> Result<Settings> {
    let cwd = std::env::current_dir().map_err(|e| SyncError::io(".", e))?;
    let start = start_dir(overrides.repo_root.as_deref(), &cwd);
    let repo_root = detect_repo_root(&start);
    let cfg = match overrides.config.as_deref() {
        Some(p) => load_config_file(&repo_root.join(p))?,
        None => load_config(&repo_root)?.unwrap_or_default(),
    };
    Ok(resolve(repo_root, cfg, overrides))
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn resolve(repo_root: PathBuf, cfg: FileConfig, overrides: &Overrides) -> Settings {
    let codeowners = cfg.codeowners.unwrap_or_default();
    let placeholder_cfg = cfg.placeholder.unwrap_or_default();
    let placeholder_enabled =
        !overrides.no_placeholder && placeholder_cfg.enabled.unwrap_or(true);
    let placeholder = placeholder_enabled.then(|| PlaceholderStep {
        name: placeholder_cfg
            .name
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER_NAME.to_string()),
        run: placeholder_cfg
            .run
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER_RUN.to_string()),
    });
    let timeout_secs = overrides
        .timeout_secs
        .or_else(|| cfg.commands.as_ref().and_then(|c| c.timeout_secs));

    Settings {
        repo_root,
        folders: cfg.folders.unwrap_or_else(|| owned(DEFAULT_FOLDERS)),
        read_only_folders: cfg
            .read_only_folders
            .unwrap_or_else(|| owned(DEFAULT_READ_ONLY_FOLDERS)),
        enabled_actions: cfg
            .enabled_actions
            .unwrap_or_else(|| owned(DEFAULT_ENABLED_ACTIONS)),
        partners: cfg.partners.unwrap_or_else(|| owned(DEFAULT_PARTNERS)),
        icons_dir: cfg.icons_dir.unwrap_or_else(|| "icons".to_string()),
        restricted_folder: cfg
            .restricted_folder
            .unwrap_or_else(|| "code-scanning".to_string()),
        source_branch: overrides
            .source_branch
            .clone()
            .or(cfg.source_branch)
            .unwrap_or_else(|| "main".to_string()),
        target_branch: overrides
            .target_branch
            .clone()
            .or(cfg.target_branch)
            .unwrap_or_else(|| "ghes".to_string()),
        codeowners_config: codeowners
            .config
            .unwrap_or_else(|| "script/sync-ghes/codeowners.json".to_string()),
        codeowners_output: codeowners
            .output
            .unwrap_or_else(|| ".github/CODEOWNERS".to_string()),
        placeholder,
        command_timeout: timeout_secs.map(Duration::from_secs),
    }
}
