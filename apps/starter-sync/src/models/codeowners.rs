//! Ownership rules feeding the generated CODEOWNERS file.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CodeOwnersConfig {
    pub owners: Vec<OwnerRule>,
}

#[derive(Debug, Clone, Deserialize)]
/// One CODEOWNERS line: a path pattern and the teams owning it.
pub struct OwnerRule {
    pub pattern: String,
    pub teams: Vec<String>,
}
