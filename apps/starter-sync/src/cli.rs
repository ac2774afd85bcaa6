//! CLI argument parsing via `clap`.

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "starter-sync",
    version,
    about = "Sync starter workflows to a GitHub Enterprise Server branch",
    long_about = "starter-sync copies the starter workflows a GitHub Enterprise Server mirror can run from the source branch into the target branch, rewrites them for the target, and regenerates CODEOWNERS.\n\nConfiguration precedence: CLI > starter-sync.toml > defaults.",
    after_help = "Examples:\n  starter-sync check\n  starter-sync check --output json\n  starter-sync sync --target-branch ghes\n  starter-sync codeowners",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(long, short, global = true, action = clap::ArgAction::SetTrue, help = "Enable debug logging (RUST_LOG wins when set)")]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Args, Clone, Default)]
/// Options shared by every command that reads settings.
pub struct CommonArgs {
    #[arg(long, help = "Repository root (default: detected from current dir)")]
    pub repo_root: Option<String>,
    #[arg(long, help = "Settings file (default: starter-sync.toml|yaml at repo root)")]
    pub config: Option<String>,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current starter-sync version.")]
    Version,
    /// Scan and report only
    #[command(
        about = "Report compatible workflows",
        long_about = "Scan workflow folders and report which workflows would be synced. Never touches git or files.",
        after_help = "Examples:\n  starter-sync check\n  starter-sync check --output json"
    )]
    Check {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Run the full sync
    #[command(
        about = "Sync workflows into the target branch",
        long_about = "Switch to the target branch, remove regenerated folders, restore compatible workflows from the source branch, rewrite them and regenerate CODEOWNERS.",
        after_help = "Examples:\n  starter-sync sync\n  starter-sync sync --source-branch main --target-branch ghes --timeout-secs 120"
    )]
    Sync {
        #[command(flatten)]
        common: CommonArgs,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Branch to restore workflows from (default: main)")]
        source_branch: Option<String>,
        #[arg(long, help = "Branch to sync into (default: ghes)")]
        target_branch: Option<String>,
        #[arg(long, help = "Kill git commands running longer than this many seconds")]
        timeout_secs: Option<u64>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Do not append the placeholder step to synced workflows")]
        no_placeholder: bool,
    },
    /// Regenerate CODEOWNERS only
    #[command(
        about = "Regenerate CODEOWNERS",
        long_about = "Write the CODEOWNERS file from the JSON ownership rules."
    )]
    Codeowners {
        #[command(flatten)]
        common: CommonArgs,
    },
}
