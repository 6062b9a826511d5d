//! Per-pattern machine-hour flows.
//!
//! For one pattern, every member part contributes one link per consecutive
//! pair of recorded operations, weighted by the hours the part spends on the
//! operation being left: `time_per_piece × demand`. Steps are canonicalized
//! (strip, uppercase, code map) but not dropped or collapsed, so the flow
//! shows every recorded visit.

use routemine_core::config::NormalizationConfig;
use routemine_core::types::collections::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::routing::Part;

use super::types::{Pattern, PatternLibrary};

/// One part's move between two steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowLink {
    pub part_id: String,
    /// Index into `PatternFlow::nodes`.
    pub source: usize,
    /// Index into `PatternFlow::nodes`.
    pub target: usize,
    pub time_per_piece: f64,
    pub demand: u64,
    pub hours: f64,
}

/// Nodes and links of one pattern's flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternFlow {
    pub pattern_id: String,
    pub signature: String,
    pub total_demand: u64,
    pub member_count: usize,
    /// Sorted, deduplicated step tokens.
    pub nodes: Vec<String>,
    pub links: Vec<FlowLink>,
}

impl PatternFlow {
    pub fn total_hours(&self) -> f64 {
        self.links.iter().map(|l| l.hours).sum()
    }

    /// Link endpoints as tokens.
    pub fn link_tokens(&self, link: &FlowLink) -> (&str, &str) {
        (self.nodes[link.source].as_str(), self.nodes[link.target].as_str())
    }
}

/// Builds flows from the parts a library was mined from.
pub struct FlowBuilder<'a> {
    parts: FxHashMap<&'a str, &'a Part>,
    config: &'a NormalizationConfig,
}

impl<'a> FlowBuilder<'a> {
    pub fn new(parts: &'a [Part], config: &'a NormalizationConfig) -> Self {
        let mut by_id: FxHashMap<&str, &Part> = FxHashMap::default();
        for part in parts {
            by_id.entry(part.part_id.as_str()).or_insert(part);
        }
        Self {
            parts: by_id,
            config,
        }
    }

    /// Flow for one pattern; `None` when its members have no transitions.
    pub fn flow(&self, pattern: &Pattern) -> Option<PatternFlow> {
        // (part, from, to, time_per_piece, demand)
        let mut raw_links: Vec<(&str, String, String, f64, u64)> = Vec::new();

        for member in &pattern.member_ids {
            let Some(part) = self.parts.get(member.as_str()) else {
                continue;
            };
            let tokens: Vec<String> = part
                .steps
                .iter()
                .map(|s| self.config.canonical_step(&s.token))
                .collect();
            for (i, pair) in tokens.windows(2).enumerate() {
                let time_per_piece = part.steps[i]
                    .timing
                    .map(|t| t.time_per_piece())
                    .unwrap_or(0.0);
                raw_links.push((
                    part.part_id.as_str(),
                    pair[0].clone(),
                    pair[1].clone(),
                    time_per_piece,
                    part.demand,
                ));
            }
        }

        if raw_links.is_empty() {
            return None;
        }

        let mut nodes: Vec<String> = raw_links
            .iter()
            .flat_map(|(_, from, to, _, _)| [from.clone(), to.clone()])
            .collect();
        nodes.sort();
        nodes.dedup();
        let node_index: FxHashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), i))
            .collect();

        let links = raw_links
            .iter()
            .map(|(part_id, from, to, time_per_piece, demand)| FlowLink {
                part_id: part_id.to_string(),
                source: node_index[from.as_str()],
                target: node_index[to.as_str()],
                time_per_piece: *time_per_piece,
                demand: *demand,
                hours: time_per_piece * *demand as f64,
            })
            .collect();

        Some(PatternFlow {
            pattern_id: pattern.pattern_id.clone(),
            signature: pattern.signature.clone(),
            total_demand: pattern.total_demand,
            member_count: pattern.member_count(),
            nodes,
            links,
        })
    }

    /// Flows for the `k` highest-ranked patterns, skipping those without links.
    pub fn top_flows(&self, library: &PatternLibrary, k: usize) -> Vec<PatternFlow> {
        library
            .top(k)
            .iter()
            .filter_map(|pattern| self.flow(pattern))
            .collect()
    }
}
