//! Routing types: operation and demand records, parts, normalized parts.

use serde::{Deserialize, Serialize};

use super::normalizer;

/// Per-operation timing, used for machine-hour flows.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OperationTiming {
    pub setup_hours: f64,
    pub process_hours: f64,
    pub idle_hours: f64,
    /// Pieces moved per transport batch. 0 is treated as 1.
    pub max_transport_batch: u32,
}

impl OperationTiming {
    /// Hours per piece: process + idle + setup amortized over the transport batch.
    pub fn time_per_piece(&self) -> f64 {
        let batch = self.max_transport_batch.max(1);
        self.process_hours + self.idle_hours + self.setup_hours / f64::from(batch)
    }
}

/// One row of the routing sheet: a single operation of a part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    pub part_id: String,
    /// Operation serial number; orders the steps of a part.
    pub sequence_number: u32,
    /// Raw machine/step code as recorded.
    pub step: String,
    pub timing: Option<OperationTiming>,
}

impl OperationRecord {
    pub fn new(part_id: impl Into<String>, sequence_number: u32, step: impl Into<String>) -> Self {
        Self {
            part_id: part_id.into(),
            sequence_number,
            step: step.into(),
            timing: None,
        }
    }

    pub fn with_timing(mut self, timing: OperationTiming) -> Self {
        self.timing = Some(timing);
        self
    }
}

/// One order line. Quantities arrive signed; negatives are rejected at assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandRecord {
    pub part_id: String,
    pub quantity: i64,
}

impl DemandRecord {
    pub fn new(part_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            part_id: part_id.into(),
            quantity,
        }
    }
}

/// A single step of a part's routing, in sequence order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingStep {
    pub token: String,
    pub timing: Option<OperationTiming>,
}

/// A manufactured part: its ordered raw routing and total demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub part_id: String,
    pub steps: Vec<RoutingStep>,
    pub demand: u64,
}

impl Part {
    /// Build a part from raw step tokens without timing data.
    pub fn new<I, S>(part_id: impl Into<String>, raw_sequence: I, demand: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            part_id: part_id.into(),
            steps: raw_sequence
                .into_iter()
                .map(|token| RoutingStep {
                    token: token.into(),
                    timing: None,
                })
                .collect(),
            demand,
        }
    }

    /// The raw step tokens, in routing order.
    pub fn raw_sequence(&self) -> impl Iterator<Item = &str> + '_ {
        self.steps.iter().map(|s| s.token.as_str())
    }

    /// Whether any step carries timing data.
    pub fn has_timing(&self) -> bool {
        self.steps.iter().any(|s| s.timing.is_some())
    }
}

/// A part reduced to its canonical token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedPart {
    pub part_id: String,
    pub demand: u64,
    pub tokens: Vec<String>,
}

impl NormalizedPart {
    /// Tokens joined with `" -> "`; empty for an empty routing.
    pub fn signature(&self) -> String {
        normalizer::signature(&self.tokens)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
