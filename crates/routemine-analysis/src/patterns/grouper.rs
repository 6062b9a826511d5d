//! Signature grouping with demand aggregation.

use routemine_core::types::collections::{FxHashMap, SmallVec8};
use tracing::{debug, warn};

use crate::routing::NormalizedPart;

use super::types::{rank_order, PartAssignment, Pattern, PatternLibrary};

/// Default number of example members kept per pattern.
pub const DEFAULT_EXAMPLE_LIMIT: usize = 8;

/// Groups normalized parts by signature into a ranked pattern library.
#[derive(Debug, Clone, Copy)]
pub struct PatternLibraryBuilder {
    example_limit: usize,
}

impl Default for PatternLibraryBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_EXAMPLE_LIMIT)
    }
}

impl PatternLibraryBuilder {
    pub fn new(example_limit: usize) -> Self {
        Self { example_limit }
    }

    /// Build the library.
    ///
    /// Every part lands in exactly one pattern and pattern demand sums to
    /// the total part demand. Shares divide by the grand total floored at 1,
    /// so an all-zero dataset yields 0% everywhere instead of NaN.
    pub fn build(&self, parts: &[NormalizedPart]) -> PatternLibrary {
        let mut slot_of: FxHashMap<String, usize> = FxHashMap::default();
        let mut groups: Vec<Pattern> = Vec::new();
        let mut part_slots: Vec<usize> = Vec::with_capacity(parts.len());

        for part in parts {
            let signature = part.signature();
            let slot = match slot_of.get(&signature) {
                Some(&slot) => slot,
                None => {
                    groups.push(Pattern {
                        pattern_id: String::new(),
                        signature: signature.clone(),
                        tokens: part.tokens.clone(),
                        member_ids: Vec::new(),
                        total_demand: 0,
                        demand_share: 0.0,
                        examples: SmallVec8::new(),
                    });
                    slot_of.insert(signature, groups.len() - 1);
                    groups.len() - 1
                }
            };
            let group = &mut groups[slot];
            group.member_ids.push(part.part_id.clone());
            group.total_demand += part.demand;
            if group.examples.len() < self.example_limit {
                group.examples.push(part.part_id.clone());
            }
            part_slots.push(slot);
        }

        let total_demand: u64 = groups.iter().map(|g| g.total_demand).sum();
        if total_demand == 0 && !parts.is_empty() {
            warn!(parts = parts.len(), "Grand total demand is zero; all shares are 0%");
        }
        let denominator = total_demand.max(1) as f64;

        // Rank, then map each group slot to its ranked position.
        let mut order: Vec<usize> = (0..groups.len()).collect();
        order.sort_by(|&a, &b| rank_order(&groups[a], &groups[b]));
        let mut rank_of = vec![0usize; groups.len()];
        for (rank, &slot) in order.iter().enumerate() {
            rank_of[slot] = rank;
        }

        let mut ranked: Vec<Option<Pattern>> = groups.into_iter().map(Some).collect();
        let mut patterns: Vec<Pattern> = Vec::with_capacity(ranked.len());
        for (rank, &slot) in order.iter().enumerate() {
            if let Some(mut pattern) = ranked[slot].take() {
                pattern.pattern_id = pattern_id(rank);
                pattern.demand_share = pattern.total_demand as f64 / denominator * 100.0;
                patterns.push(pattern);
            }
        }

        let assignments: Vec<PartAssignment> = parts
            .iter()
            .zip(&part_slots)
            .map(|(part, &slot)| {
                let pattern = &patterns[rank_of[slot]];
                PartAssignment {
                    part_id: part.part_id.clone(),
                    pattern_id: pattern.pattern_id.clone(),
                    signature: pattern.signature.clone(),
                    tokens: part.tokens.clone(),
                    demand: part.demand,
                }
            })
            .collect();

        let by_id = patterns
            .iter()
            .enumerate()
            .map(|(i, p)| (p.pattern_id.clone(), i))
            .collect();
        let by_signature = patterns
            .iter()
            .enumerate()
            .map(|(i, p)| (p.signature.clone(), i))
            .collect();
        let mut by_part: FxHashMap<String, usize> = FxHashMap::default();
        for (i, assignment) in assignments.iter().enumerate() {
            by_part.entry(assignment.part_id.clone()).or_insert(i);
        }

        debug!(
            parts = parts.len(),
            patterns = patterns.len(),
            total_demand,
            "Pattern library built"
        );

        PatternLibrary {
            patterns,
            assignments,
            total_demand,
            by_id,
            by_signature,
            by_part,
        }
    }
}

/// `P001`, `P002`, …; widens past `P999`.
fn pattern_id(rank: usize) -> String {
    format!("P{:03}", rank + 1)
}
