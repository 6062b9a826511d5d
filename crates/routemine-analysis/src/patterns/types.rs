//! Pattern library types.

use std::cmp::Ordering;

use routemine_core::types::collections::{FxHashMap, SmallVec8};
use serde::{Deserialize, Serialize};

/// A distinct normalized routing shared by one or more parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// `P001`, `P002`, … in rank order.
    pub pattern_id: String,
    pub signature: String,
    pub tokens: Vec<String>,
    /// Member part ids in input order.
    pub member_ids: Vec<String>,
    pub total_demand: u64,
    /// Percentage of the grand total demand, unrounded.
    pub demand_share: f64,
    /// First members, capped by the example limit.
    pub examples: SmallVec8<String>,
}

impl Pattern {
    pub fn member_count(&self) -> usize {
        self.member_ids.len()
    }

    /// The empty routing, shared by parts with no surviving steps.
    pub fn is_empty_route(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Rank order: total demand desc, member count desc, signature asc.
pub fn rank_order(a: &Pattern, b: &Pattern) -> Ordering {
    b.total_demand
        .cmp(&a.total_demand)
        .then_with(|| b.member_count().cmp(&a.member_count()))
        .then_with(|| a.signature.cmp(&b.signature))
}

/// Which pattern a part was assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartAssignment {
    pub part_id: String,
    pub pattern_id: String,
    pub signature: String,
    pub tokens: Vec<String>,
    pub demand: u64,
}

/// Ranked patterns plus the part → pattern assignment, with keyed lookups.
#[derive(Debug, Clone, Default)]
pub struct PatternLibrary {
    pub(crate) patterns: Vec<Pattern>,
    pub(crate) assignments: Vec<PartAssignment>,
    pub(crate) total_demand: u64,
    pub(crate) by_id: FxHashMap<String, usize>,
    pub(crate) by_signature: FxHashMap<String, usize>,
    pub(crate) by_part: FxHashMap<String, usize>,
}

impl PatternLibrary {
    /// Patterns in rank order.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// One assignment per input part, in input order.
    pub fn assignments(&self) -> &[PartAssignment] {
        &self.assignments
    }

    /// Sum of all part demand.
    pub fn total_demand(&self) -> u64 {
        self.total_demand
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, pattern_id: &str) -> Option<&Pattern> {
        self.by_id.get(pattern_id).map(|&i| &self.patterns[i])
    }

    pub fn by_signature(&self, signature: &str) -> Option<&Pattern> {
        self.by_signature.get(signature).map(|&i| &self.patterns[i])
    }

    /// The assignment of a part. For a repeated part id, the first one.
    pub fn assignment(&self, part_id: &str) -> Option<&PartAssignment> {
        self.by_part.get(part_id).map(|&i| &self.assignments[i])
    }

    /// The `k` highest-ranked patterns.
    pub fn top(&self, k: usize) -> &[Pattern] {
        &self.patterns[..k.min(self.patterns.len())]
    }
}
