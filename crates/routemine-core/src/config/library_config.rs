//! Pattern library configuration.

use serde::{Deserialize, Serialize};

/// Configuration for library aggregation and reporting sizes.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryConfig {
    /// Example member part ids kept per pattern. Default: 8.
    pub example_limit: Option<usize>,
    /// Patterns listed in the run summary. Default: 10.
    pub summary_top: Option<usize>,
    /// Patterns for which per-part flows are prepared. Default: 6.
    pub top_flows: Option<usize>,
}

impl LibraryConfig {
    /// Returns the effective example cap, defaulting to 8.
    pub fn effective_example_limit(&self) -> usize {
        self.example_limit.unwrap_or(8)
    }

    /// Returns the effective summary size, defaulting to 10.
    pub fn effective_summary_top(&self) -> usize {
        self.summary_top.unwrap_or(10)
    }

    /// Returns the effective flow count, defaulting to 6.
    pub fn effective_top_flows(&self) -> usize {
        self.top_flows.unwrap_or(6)
    }
}
