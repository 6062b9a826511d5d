//! End-to-end mining pipeline.
//!
//! normalize (parallel) → library → transitions → optional clustering →
//! flows → diagnostics. Everything is computed in memory; a fatal error
//! returns before any result is produced.

use std::fmt;

use routemine_core::config::{NormalizationConfig, RouteMineConfig};
use routemine_core::errors::{AnalysisError, ConfigError};
use routemine_core::types::collections::FxHashSet;
use tracing::{debug, info, warn};

use crate::graph::{build_transitions, TransitionTable};
use crate::routing::{
    assemble_parts, normalize_parts, AssemblyReport, DemandRecord, NormalizedPart, OperationRecord,
    Part,
};

use super::clustering::{Clustering, PatternClusterer};
use super::flow::{FlowBuilder, PatternFlow};
use super::grouper::{PatternLibraryBuilder, DEFAULT_EXAMPLE_LIMIT};
use super::types::PatternLibrary;

/// Default number of patterns listed in the summary.
pub const DEFAULT_SUMMARY_TOP: usize = 10;

/// Default number of patterns for which flows are built.
pub const DEFAULT_TOP_FLOWS: usize = 6;

/// Runs the mining phases over one dataset.
#[derive(Debug, Clone)]
pub struct RoutingMiner {
    normalization: NormalizationConfig,
    clustering_threshold: Option<i64>,
    example_limit: usize,
    summary_top: usize,
    top_flows: usize,
}

impl RoutingMiner {
    /// Create a miner with default library settings and clustering off.
    pub fn new(normalization: NormalizationConfig) -> Self {
        Self {
            normalization,
            clustering_threshold: None,
            example_limit: DEFAULT_EXAMPLE_LIMIT,
            summary_top: DEFAULT_SUMMARY_TOP,
            top_flows: DEFAULT_TOP_FLOWS,
        }
    }

    /// Create a miner with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(NormalizationConfig::default())
    }

    /// Create a miner from a resolved configuration.
    pub fn from_config(config: &RouteMineConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            normalization: config.normalization_config()?,
            clustering_threshold: config.clustering_threshold(),
            example_limit: config.library.effective_example_limit(),
            summary_top: config.library.effective_summary_top(),
            top_flows: config.library.effective_top_flows(),
        })
    }

    /// Enable clustering with the given threshold. Validated when the run starts.
    pub fn with_clustering(mut self, max_edit_distance: i64) -> Self {
        self.clustering_threshold = Some(max_edit_distance);
        self
    }

    pub fn with_example_limit(mut self, example_limit: usize) -> Self {
        self.example_limit = example_limit;
        self
    }

    pub fn with_summary_top(mut self, summary_top: usize) -> Self {
        self.summary_top = summary_top;
        self
    }

    /// Number of top patterns to build flows for; 0 disables flows.
    pub fn with_top_flows(mut self, top_flows: usize) -> Self {
        self.top_flows = top_flows;
        self
    }

    pub fn normalization(&self) -> &NormalizationConfig {
        &self.normalization
    }

    /// Assemble records into parts, then run.
    pub fn run_records(
        &self,
        operations: &[OperationRecord],
        demand: &[DemandRecord],
    ) -> Result<MiningResult, AnalysisError> {
        let clusterer = self.clusterer()?;
        let assembled = assemble_parts(operations, demand)?;
        Ok(self.mine(&assembled.parts, clusterer, Some(assembled.report)))
    }

    /// Run every phase over already-assembled parts.
    pub fn run(&self, parts: &[Part]) -> Result<MiningResult, AnalysisError> {
        let clusterer = self.clusterer()?;
        Ok(self.mine(parts, clusterer, None))
    }

    fn clusterer(&self) -> Result<Option<PatternClusterer>, AnalysisError> {
        self.clustering_threshold
            .map(PatternClusterer::new)
            .transpose()
    }

    fn mine(
        &self,
        parts: &[Part],
        clusterer: Option<PatternClusterer>,
        assembly: Option<AssemblyReport>,
    ) -> MiningResult {
        info!(parts = parts.len(), "Mining routing patterns");

        // Phase 1: Normalize
        let normalized = normalize_parts(parts, &self.normalization);
        debug!(parts = normalized.len(), "Phase 1: normalized");

        // Phase 2: Pattern library
        let library = PatternLibraryBuilder::new(self.example_limit).build(&normalized);
        info!(
            patterns = library.len(),
            total_demand = library.total_demand(),
            "Phase 2: pattern library"
        );

        // Phase 3: Transitions
        let transitions = build_transitions(&normalized);
        info!(transitions = transitions.len(), "Phase 3: transitions");

        // Phase 4: Clustering (optional)
        let clustering = clusterer.map(|c| c.cluster(library.patterns()));
        if let Some(ref clustering) = clustering {
            info!(clusters = clustering.len(), "Phase 4: clustering");
        }

        // Phase 5: Flows for the top patterns
        let flows = if self.top_flows > 0 {
            FlowBuilder::new(parts, &self.normalization).top_flows(&library, self.top_flows)
        } else {
            Vec::new()
        };
        debug!(flows = flows.len(), "Phase 5: pattern flows");

        // Phase 6: Diagnostics
        let diagnostics = self.compute_diagnostics(
            parts,
            &normalized,
            &library,
            &transitions,
            clustering.as_ref(),
            assembly.as_ref(),
        );
        if diagnostics.empty_route_parts > 0 {
            warn!(parts = diagnostics.empty_route_parts, "Parts with an empty normalized route");
        }

        MiningResult {
            normalized,
            library,
            transitions,
            clustering,
            flows,
            diagnostics,
        }
    }

    fn compute_diagnostics(
        &self,
        parts: &[Part],
        normalized: &[NormalizedPart],
        library: &PatternLibrary,
        transitions: &TransitionTable,
        clustering: Option<&Clustering>,
        assembly: Option<&AssemblyReport>,
    ) -> MiningDiagnostics {
        let distinct_raw_routes = parts
            .iter()
            .map(|p| p.raw_sequence().collect::<Vec<_>>())
            .collect::<FxHashSet<_>>()
            .len();

        let top_patterns = library
            .top(self.summary_top)
            .iter()
            .map(|p| PatternSummary {
                pattern_id: p.pattern_id.clone(),
                signature: p.signature.clone(),
                member_count: p.member_count(),
                total_demand: p.total_demand,
                demand_share: p.demand_share,
            })
            .collect();

        MiningDiagnostics {
            part_count: parts.len(),
            distinct_raw_routes,
            pattern_count: library.len(),
            empty_route_parts: normalized.iter().filter(|p| p.is_empty()).count(),
            zero_demand_parts: normalized.iter().filter(|p| p.demand == 0).count(),
            total_demand: library.total_demand(),
            transition_count: transitions.len(),
            cluster_count: clustering.map(Clustering::len),
            unknown_demand_parts: assembly.map(|a| a.unknown_demand_parts).unwrap_or(0),
            top_patterns,
        }
    }
}

impl Default for RoutingMiner {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Everything one run produces.
#[derive(Debug)]
pub struct MiningResult {
    /// Normalized parts, in input order.
    pub normalized: Vec<NormalizedPart>,
    pub library: PatternLibrary,
    pub transitions: TransitionTable,
    /// Present when clustering was enabled.
    pub clustering: Option<Clustering>,
    /// Flows for the top patterns that have transitions.
    pub flows: Vec<PatternFlow>,
    pub diagnostics: MiningDiagnostics,
}

/// One line of the run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternSummary {
    pub pattern_id: String,
    pub signature: String,
    pub member_count: usize,
    pub total_demand: u64,
    pub demand_share: f64,
}

/// Counts describing a run, plus the top patterns.
#[derive(Debug, Clone, PartialEq)]
pub struct MiningDiagnostics {
    pub part_count: usize,
    /// Distinct raw step sequences before normalization.
    pub distinct_raw_routes: usize,
    pub pattern_count: usize,
    /// Parts whose normalized route is empty.
    pub empty_route_parts: usize,
    pub zero_demand_parts: usize,
    pub total_demand: u64,
    pub transition_count: usize,
    /// `None` when clustering was not run.
    pub cluster_count: Option<usize>,
    /// Parts with demand but no routing; only known for record input.
    pub unknown_demand_parts: usize,
    pub top_patterns: Vec<PatternSummary>,
}

impl fmt::Display for MiningDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Summary ===")?;
        writeln!(
            f,
            "parts={}, raw_routes={}, patterns={}, empty_routes={}, zero_demand={}, total_demand={}, transitions={}",
            self.part_count,
            self.distinct_raw_routes,
            self.pattern_count,
            self.empty_route_parts,
            self.zero_demand_parts,
            self.total_demand,
            self.transition_count,
        )?;
        if let Some(clusters) = self.cluster_count {
            writeln!(f, "clusters={clusters}")?;
        }
        if self.unknown_demand_parts > 0 {
            writeln!(f, "unknown_demand_parts={}", self.unknown_demand_parts)?;
        }
        writeln!(f, "Top patterns by demand:")?;
        for p in &self.top_patterns {
            writeln!(
                f,
                "{}  demand={}  share={:.2}%  parts={}  {}",
                p.pattern_id, p.total_demand, p.demand_share, p.member_count, p.signature
            )?;
        }
        Ok(())
    }
}
