//! Input/output locations handed to the ingestion and reporting collaborators.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default prefix for result tables.
pub const DEFAULT_OUTPUT_PREFIX: &str = "routing_patterns";

/// Where the source data lives and how result tables are named.
/// The engine itself never touches these paths.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IoConfig {
    /// Source workbook or export read by the ingestion collaborator.
    pub input_path: Option<PathBuf>,
    /// Prefix for result tables. Default: "routing_patterns".
    pub output_prefix: Option<String>,
}

impl IoConfig {
    /// Returns the effective output prefix.
    pub fn effective_output_prefix(&self) -> &str {
        self.output_prefix.as_deref().unwrap_or(DEFAULT_OUTPUT_PREFIX)
    }
}
