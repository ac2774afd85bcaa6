//! Small helpers shared by the printers and the pipeline.

use owo_colors::OwoColorize;
use std::path::Path;

fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if color_enabled() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if color_enabled() {
        "note:".blue().bold().to_string()
    } else {
        "note:".to_string()
    }
}

/// Render `path` relative to the current working directory when possible.
pub fn rel_to_wd(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|wd| pathdiff::diff_paths(path, wd))
        .filter(|rel| !rel.as_os_str().is_empty())
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}

/// Forward-slash form of a relative path, as git expects on every platform.
pub fn git_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_rel_to_wd_keeps_relative_paths() {
        let wd = std::env::current_dir().unwrap();
        let abs = wd.join("ci").join("go.yml");
        assert_eq!(PathBuf::from(rel_to_wd(&abs)), PathBuf::from("ci/go.yml"));
    }

    #[test]
    fn test_git_path_uses_forward_slashes() {
        assert_eq!(
            git_path(Path::new("ci/properties/go.properties.json")),
            "ci/properties/go.properties.json"
        );
    }
}
