//! Row types for the library, assignment, transition, and clustered tables.

use serde::Serialize;

use crate::graph::TransitionTable;
use crate::patterns::{Clustering, PatternLibrary};

/// The result tables a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    PatternLibrary,
    PartToPattern,
    Transitions,
    ClusteredLibrary,
}

impl TableKind {
    /// Table name under an output prefix, e.g. `routing_patterns_routing_library`.
    /// The writer appends its own extension.
    pub fn table_name(&self, prefix: &str) -> String {
        let suffix = match self {
            Self::PatternLibrary => "routing_library",
            Self::PartToPattern => "part_to_pattern",
            Self::Transitions => "routing_transitions",
            Self::ClusteredLibrary => "routing_library_clustered",
        };
        format!("{prefix}_{suffix}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternLibraryRow {
    pub pattern_id: String,
    pub signature: String,
    pub member_count: usize,
    pub total_demand: u64,
    pub demand_share_pct: f64,
    /// Comma-separated example part ids.
    pub example_members: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartAssignmentRow {
    pub part_id: String,
    pub pattern_id: String,
    pub signature: String,
    pub normalized_sequence: Vec<String>,
    pub demand: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionRow {
    pub from_token: String,
    pub to_token: String,
    pub aggregated_weight: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusteredLibraryRow {
    #[serde(flatten)]
    pub library: PatternLibraryRow,
    pub cluster_id: u32,
    pub cluster_representative_signature: String,
}

/// Round a percentage to 2 decimals for display.
pub fn round_share(share: f64) -> f64 {
    (share * 100.0).round() / 100.0
}

/// One row per pattern, in rank order.
pub fn pattern_library_rows(library: &PatternLibrary) -> Vec<PatternLibraryRow> {
    library
        .patterns()
        .iter()
        .map(|p| PatternLibraryRow {
            pattern_id: p.pattern_id.clone(),
            signature: p.signature.clone(),
            member_count: p.member_count(),
            total_demand: p.total_demand,
            demand_share_pct: round_share(p.demand_share),
            example_members: p.examples.join(", "),
        })
        .collect()
}

/// One row per part, in input order.
pub fn part_assignment_rows(library: &PatternLibrary) -> Vec<PartAssignmentRow> {
    library
        .assignments()
        .iter()
        .map(|a| PartAssignmentRow {
            part_id: a.part_id.clone(),
            pattern_id: a.pattern_id.clone(),
            signature: a.signature.clone(),
            normalized_sequence: a.tokens.clone(),
            demand: a.demand,
        })
        .collect()
}

/// One row per transition, weight desc.
pub fn transition_rows(table: &TransitionTable) -> Vec<TransitionRow> {
    table
        .transitions()
        .iter()
        .map(|t| TransitionRow {
            from_token: t.from.clone(),
            to_token: t.to.clone(),
            aggregated_weight: t.weight,
        })
        .collect()
}

/// Library rows annotated with their cluster, in rank order.
///
/// Patterns missing from `clustering` are skipped; a clustering built from
/// the same library covers every pattern.
pub fn clustered_library_rows(
    library: &PatternLibrary,
    clustering: &Clustering,
) -> Vec<ClusteredLibraryRow> {
    pattern_library_rows(library)
        .into_iter()
        .filter_map(|row| {
            let cluster = clustering.cluster_of(&row.pattern_id)?;
            Some(ClusteredLibraryRow {
                cluster_id: cluster.cluster_id,
                cluster_representative_signature: cluster.representative_signature.clone(),
                library: row,
            })
        })
        .collect()
}
