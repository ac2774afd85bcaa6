//! starter-sync CLI binary entry point.
//! Resolves settings once, delegates to the library and prints results.

use anyhow::Context;
use clap::Parser;
use starter_sync::cli::{Cli, Commands, CommonArgs};
use starter_sync::config::{self, Overrides, Settings};
use starter_sync::{codeowners, output, scan, sync, utils};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = starter_sync::logging::init(cli.verbose) {
        eprintln!("{} {:#}", utils::error_prefix(), e);
    }
    if let Commands::Version = cli.cmd {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("{} failed to start runtime: {}", utils::error_prefix(), e);
            std::process::exit(1);
        }
    };
    if let Err(e) = runtime.block_on(run(cli.cmd)) {
        tracing::error!("{:#}", e);
        eprintln!("{} {:#}", utils::error_prefix(), e);
        std::process::exit(1);
    }
}

fn settings(common: &CommonArgs, overrides: Overrides) -> Settings {
    let overrides = Overrides {
        repo_root: common.repo_root.clone(),
        config: common.config.clone(),
        ..overrides
    };
    let s = match config::resolve_settings(&overrides) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            std::process::exit(2);
        }
    };
    // Friendly note if no settings file was found
    if common.config.is_none() && matches!(config::load_config(&s.repo_root), Ok(None)) {
        eprintln!(
            "{} No starter-sync.toml found; using defaults.",
            utils::note_prefix()
        );
    }
    s
}

fn check_output(mode: Option<String>) -> String {
    let mode = mode.unwrap_or_else(|| "human".to_string());
    if mode != "human" && mode != "json" {
        eprintln!(
            "{} unknown output mode '{}' (expected human|json)",
            utils::error_prefix(),
            mode
        );
        std::process::exit(2);
    }
    mode
}

async fn run(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Version => {}
        Commands::Check {
            common,
            output: mode,
        } => {
            let mode = check_output(mode);
            let s = settings(&common, Overrides::default());
            let result = scan::scan_workflows(&s).context("scanning workflows failed")?;
            output::print_check(&result, &mode);
        }
        Commands::Sync {
            common,
            output: mode,
            source_branch,
            target_branch,
            timeout_secs,
            no_placeholder,
        } => {
            let mode = check_output(mode);
            let s = settings(
                &common,
                Overrides {
                    source_branch,
                    target_branch,
                    timeout_secs,
                    no_placeholder,
                    ..Overrides::default()
                },
            );
            let report = sync::run_sync(&s, &mode)
                .await
                .context("unhandled error while syncing workflows")?;
            output::print_sync(&report, &mode);
        }
        Commands::Codeowners { common } => {
            let s = settings(&common, Overrides::default());
            codeowners::generate_codeowners(
                &s.repo_root.join(&s.codeowners_config),
                &s.repo_root.join(&s.codeowners_output),
            )
            .context("generating CODEOWNERS failed")?;
        }
    }
    Ok(())
}
