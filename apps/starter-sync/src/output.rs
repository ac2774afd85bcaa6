//! Output rendering for the check and sync commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-item fields and a top-level summary.

use crate::models::CheckResult;
use crate::sync::SyncReport;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn print_json(value: &JsonVal) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("{} {}", crate::utils::error_prefix(), e),
    }
}

/// Print the compatible/incompatible partition in the requested format.
pub fn print_check(res: &CheckResult, output: &str) {
    match output {
        "json" => print_json(&compose_check_json(res)),
        _ => {
            let color = use_colors(output);
            let groups = [
                (
                    format!(
                        "Found {} starter workflows compatible with the target:",
                        res.compatible_workflows.len()
                    ),
                    &res.compatible_workflows,
                ),
                (
                    format!(
                        "Ignored {} starter workflows incompatible with the target:",
                        res.incompatible_workflows.len()
                    ),
                    &res.incompatible_workflows,
                ),
            ];
            for (i, (title, items)) in groups.iter().enumerate() {
                if color && i == 0 {
                    println!("{}", title.green().bold());
                } else if color {
                    println!("{}", title.yellow().bold());
                } else {
                    println!("{}", title);
                }
                for w in items.iter() {
                    println!("  {}", w.key());
                }
            }
        }
    }
}

/// Print what a sync run changed.
pub fn print_sync(report: &SyncReport, output: &str) {
    match output {
        "json" => print_json(&compose_sync_json(report)),
        _ => {
            let color = use_colors(output);
            for p in &report.removed {
                if color {
                    println!("{} {}", "🗑️  removed:".red().bold(), p);
                } else {
                    println!("🗑️  removed: {}", p);
                }
            }
            for p in &report.restored {
                if color {
                    println!("{} {}", "📥 restored:".green().bold(), p);
                } else {
                    println!("📥 restored: {}", p);
                }
            }
            for p in &report.downgraded {
                if color {
                    println!("{} {}", "✏️  downgraded:".cyan().bold(), p);
                } else {
                    println!("✏️  downgraded: {}", p);
                }
            }
            let summary = format!(
                "— Summary — synced={} ignored={} restored={} downgraded={} placeholders={} codeowners={}",
                report.check.compatible_workflows.len(),
                report.check.incompatible_workflows.len(),
                report.restored.len(),
                report.downgraded.len(),
                report.placeholders,
                report.codeowners
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Compose check JSON object (pure) for testing purposes.
pub fn compose_check_json(res: &CheckResult) -> JsonVal {
    json!({
        "compatible": res.compatible_workflows,
        "incompatible": res.incompatible_workflows,
        "summary": {
            "compatible": res.compatible_workflows.len(),
            "incompatible": res.incompatible_workflows.len(),
            "total": res.compatible_workflows.len() + res.incompatible_workflows.len(),
        }
    })
}

/// Compose sync JSON object (pure) for testing purposes.
pub fn compose_sync_json(report: &SyncReport) -> JsonVal {
    json!({
        "compatible": report.check.compatible_workflows,
        "incompatible": report.check.incompatible_workflows,
        "removed": report.removed,
        "restored": report.restored,
        "downgraded": report.downgraded,
        "placeholders": report.placeholders,
        "codeowners": report.codeowners,
        "summary": {
            "synced": report.check.compatible_workflows.len(),
            "ignored": report.check.incompatible_workflows.len(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IconType, WorkflowDescriptor};

    fn desc(folder: &str, id: &str) -> WorkflowDescriptor {
        WorkflowDescriptor {
            folder: folder.into(),
            id: id.into(),
            icon_name: Some("octicon gear".into()),
            icon_type: IconType::Octicon,
        }
    }

    #[test]
    fn test_compose_check_json_shape() {
        let res = CheckResult {
            compatible_workflows: vec![desc("ci", "go"), desc("ci", "node")],
            incompatible_workflows: vec![desc("deployments", "azure")],
        };
        let out = compose_check_json(&res);
        assert_eq!(out["summary"]["compatible"], 2);
        assert_eq!(out["summary"]["total"], 3);
        assert_eq!(out["compatible"][0]["folder"], "ci");
        assert_eq!(out["compatible"][0]["iconType"], "octicon");
        assert_eq!(out["incompatible"][0]["id"], "azure");
    }

    #[test]
    fn test_compose_sync_json_shape() {
        let report = SyncReport {
            check: CheckResult {
                compatible_workflows: vec![desc("ci", "go")],
                incompatible_workflows: vec![],
            },
            removed: vec!["ci".into()],
            restored: vec!["ci/go.yml".into()],
            downgraded: vec![],
            placeholders: 1,
            codeowners: ".github/CODEOWNERS".into(),
        };
        let out = compose_sync_json(&report);
        assert_eq!(out["summary"]["synced"], 1);
        assert_eq!(out["restored"][0], "ci/go.yml");
        assert_eq!(out["placeholders"], 1);
    }
}
