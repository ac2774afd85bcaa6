//! starter-sync core library.
//!
//! Programmatic APIs for syncing starter workflows from a source branch into
//! a GitHub Enterprise Server branch.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective settings resolution.
//! - `exec`: External command runner and the git facade.
//! - `properties`: Workflow metadata sidecar loading.
//! - `check`: Action allow-list check for one workflow.
//! - `scan`: Inventory scan partitioning workflows by policy.
//! - `rewrite`: Text and YAML document rewrites.
//! - `codeowners`: CODEOWNERS generation.
//! - `sync`: The end-to-end pipeline.
//! - `models`: Descriptors, sidecar and workflow models.
//! - `output`: Human/JSON printers.
//! - `logging`, `error`, `utils`: Supporting pieces.
pub mod check;
pub mod cli;
pub mod codeowners;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod models;
pub mod output;
pub mod properties;
pub mod rewrite;
pub mod scan;
pub mod sync;
pub mod utils;
