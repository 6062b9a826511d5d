//! Clustering configuration.

use serde::{Deserialize, Serialize};

/// Default edit-distance threshold for joining an existing cluster.
pub const DEFAULT_MAX_EDIT_DISTANCE: u32 = 1;

/// Configuration for near-duplicate pattern clustering.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClusteringConfig {
    /// Run clustering after the library is built. Default: false.
    pub enabled: Option<bool>,
    /// Maximum token edit distance to a representative. Default: 1.
    /// Signed so that a negative value can be reported instead of failing to parse.
    pub max_edit_distance: Option<i64>,
}

impl ClusteringConfig {
    /// Returns whether clustering is enabled, defaulting to false.
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }

    /// Returns the raw threshold, defaulting to 1. Validated by `RouteMineConfig::validate`.
    pub fn effective_max_edit_distance(&self) -> i64 {
        self.max_edit_distance
            .unwrap_or(i64::from(DEFAULT_MAX_EDIT_DISTANCE))
    }
}
