//! Greedy first-match clustering of patterns by token edit distance.
//!
//! Patterns are visited in rank order. Each joins the first representative,
//! in creation order, within the threshold, or founds a new cluster. The
//! result depends on that order, so both orders are fixed.

use rayon::prelude::*;
use routemine_core::errors::AnalysisError;
use routemine_core::types::collections::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::distance::edit_distance;
use super::types::{rank_order, Pattern};

/// Representative count above which distances are computed in parallel.
pub const PARALLEL_SCAN_THRESHOLD: usize = 64;

/// A group of near-duplicate patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// 1-based, in creation order.
    pub cluster_id: u32,
    pub representative_id: String,
    pub representative_signature: String,
    /// Member pattern ids in clustering order; the representative is first.
    pub member_ids: Vec<String>,
}

/// Clusters plus a pattern id → cluster lookup.
#[derive(Debug, Clone, Default)]
pub struct Clustering {
    clusters: Vec<Cluster>,
    by_pattern: FxHashMap<String, usize>,
}

impl Clustering {
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// The cluster holding a pattern.
    pub fn cluster_of(&self, pattern_id: &str) -> Option<&Cluster> {
        self.by_pattern.get(pattern_id).map(|&i| &self.clusters[i])
    }
}

/// Greedy edit-distance clusterer with a validated threshold.
#[derive(Debug, Clone, Copy)]
pub struct PatternClusterer {
    max_edit_distance: usize,
}

impl PatternClusterer {
    /// Fails on a negative threshold.
    pub fn new(max_edit_distance: i64) -> Result<Self, AnalysisError> {
        let max_edit_distance =
            usize::try_from(max_edit_distance).map_err(|_| AnalysisError::InvalidConfiguration {
                option: "max_edit_distance".to_string(),
                value: max_edit_distance.to_string(),
            })?;
        Ok(Self { max_edit_distance })
    }

    pub fn max_edit_distance(&self) -> usize {
        self.max_edit_distance
    }

    /// Cluster patterns. Input order does not matter; patterns are ranked
    /// by total demand desc, member count desc, signature asc first.
    pub fn cluster(&self, patterns: &[Pattern]) -> Clustering {
        let mut ordered: Vec<&Pattern> = patterns.iter().collect();
        ordered.sort_by(|a, b| rank_order(a, b));

        let mut clusters: Vec<Cluster> = Vec::new();
        let mut representatives: Vec<&[String]> = Vec::new();
        let mut by_pattern: FxHashMap<String, usize> = FxHashMap::default();

        for pattern in ordered {
            let slot = match self.first_match(&representatives, &pattern.tokens) {
                Some(slot) => {
                    clusters[slot].member_ids.push(pattern.pattern_id.clone());
                    slot
                }
                None => {
                    clusters.push(Cluster {
                        cluster_id: (clusters.len() + 1) as u32,
                        representative_id: pattern.pattern_id.clone(),
                        representative_signature: pattern.signature.clone(),
                        member_ids: vec![pattern.pattern_id.clone()],
                    });
                    representatives.push(&pattern.tokens);
                    clusters.len() - 1
                }
            };
            by_pattern.insert(pattern.pattern_id.clone(), slot);
        }

        debug!(
            patterns = patterns.len(),
            clusters = clusters.len(),
            max_edit_distance = self.max_edit_distance,
            "Patterns clustered"
        );

        Clustering {
            clusters,
            by_pattern,
        }
    }

    /// Index of the first representative within the threshold.
    fn first_match(&self, representatives: &[&[String]], tokens: &[String]) -> Option<usize> {
        let within = |rep: &&[String]| edit_distance(*rep, tokens) <= self.max_edit_distance;
        if representatives.len() > PARALLEL_SCAN_THRESHOLD {
            representatives.par_iter().position_first(within)
        } else {
            representatives.iter().position(within)
        }
    }
}

/// Cluster patterns with the given threshold. A negative threshold is
/// rejected before any work is done.
pub fn cluster(patterns: &[Pattern], max_edit_distance: i64) -> Result<Clustering, AnalysisError> {
    Ok(PatternClusterer::new(max_edit_distance)?.cluster(patterns))
}
