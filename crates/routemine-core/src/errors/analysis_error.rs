//! Mining-engine errors.
//!
//! Normalization and aggregation are total over well-formed input; the only
//! failures are precondition violations detected before any output is built.

use super::error_code::{self, RouteMineErrorCode};

/// Errors raised by the mining engine.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Invalid configuration: option '{option}' received '{value}'")]
    InvalidConfiguration { option: String, value: String },

    #[error("Negative demand for part {part_id}: received {quantity}")]
    NegativeDemand { part_id: String, quantity: i64 },
}

impl RouteMineErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration { .. } => error_code::INVALID_CONFIGURATION,
            Self::NegativeDemand { .. } => error_code::NEGATIVE_DEMAND,
        }
    }
}
