//! Pipeline errors.

use super::error_code::RouteMineErrorCode;
use super::{AnalysisError, ConfigError};

/// Errors that abort a mining run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),
}

impl RouteMineErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Analysis(e) => e.error_code(),
        }
    }
}
