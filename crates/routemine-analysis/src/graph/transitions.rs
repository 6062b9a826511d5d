//! Demand-weighted transitions between consecutive steps.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use routemine_core::types::collections::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::routing::NormalizedPart;

/// An aggregated `from → to` edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: String,
    pub to: String,
    /// Sum of the demand of every part making this move, once per occurrence.
    pub weight: u64,
}

/// Aggregated transitions, weight desc, ties in first-occurrence order.
#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
    transitions: Vec<Transition>,
}

/// Aggregate consecutive-step edges over all parts.
///
/// Parts with fewer than two tokens contribute nothing. Zero-demand parts
/// still create their edges, with weight 0.
pub fn build_transitions(parts: &[NormalizedPart]) -> TransitionTable {
    let mut slot_of: FxHashMap<(&str, &str), usize> = FxHashMap::default();
    let mut transitions: Vec<Transition> = Vec::new();

    for part in parts {
        for pair in part.tokens.windows(2) {
            let key = (pair[0].as_str(), pair[1].as_str());
            match slot_of.get(&key) {
                Some(&slot) => transitions[slot].weight += part.demand,
                None => {
                    slot_of.insert(key, transitions.len());
                    transitions.push(Transition {
                        from: pair[0].clone(),
                        to: pair[1].clone(),
                        weight: part.demand,
                    });
                }
            }
        }
    }

    // Stable: equal weights keep first-occurrence order.
    transitions.sort_by(|a, b| b.weight.cmp(&a.weight));

    debug!(transitions = transitions.len(), "Transition table built");
    TransitionTable { transitions }
}

impl TransitionTable {
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Aggregated weight of one edge, if present.
    pub fn weight(&self, from: &str, to: &str) -> Option<u64> {
        self.transitions
            .iter()
            .find(|t| t.from == from && t.to == to)
            .map(|t| t.weight)
    }

    pub fn total_weight(&self) -> u64 {
        self.transitions.iter().map(|t| t.weight).sum()
    }

    /// Directed petgraph view: one node per token, one edge per transition.
    pub fn to_graph(&self) -> TransitionGraph {
        let mut graph = TransitionGraph::new();
        for t in &self.transitions {
            let from = graph.add_step(&t.from);
            let to = graph.add_step(&t.to);
            graph.graph.add_edge(from, to, t.weight);
        }
        graph
    }
}

/// The transition table as a directed graph.
pub struct TransitionGraph {
    /// The underlying petgraph DiGraph; node weight is the step token.
    pub graph: DiGraph<String, u64>,
    /// Token → NodeIndex for O(1) lookup.
    pub node_index: FxHashMap<String, NodeIndex>,
}

impl TransitionGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_index: FxHashMap::default(),
        }
    }

    pub fn step_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn get_step(&self, token: &str) -> Option<NodeIndex> {
        self.node_index.get(token).copied()
    }

    fn add_step(&mut self, token: &str) -> NodeIndex {
        if let Some(&existing) = self.node_index.get(token) {
            return existing;
        }
        let idx = self.graph.add_node(token.to_string());
        self.node_index.insert(token.to_string(), idx);
        idx
    }

    /// Total weight leaving a step; 0 for an unknown step.
    pub fn outgoing_weight(&self, token: &str) -> u64 {
        self.directed_weight(token, Direction::Outgoing)
    }

    /// Total weight entering a step; 0 for an unknown step.
    pub fn incoming_weight(&self, token: &str) -> u64 {
        self.directed_weight(token, Direction::Incoming)
    }

    fn directed_weight(&self, token: &str, direction: Direction) -> u64 {
        self.get_step(token)
            .map(|idx| {
                self.graph
                    .edges_directed(idx, direction)
                    .map(|e| *e.weight())
                    .sum::<u64>()
            })
            .unwrap_or(0)
    }
}

impl Default for TransitionGraph {
    fn default() -> Self {
        Self::new()
    }
}
