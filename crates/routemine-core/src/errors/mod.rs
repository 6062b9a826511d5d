//! Error handling for routemine.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod analysis_error;
pub mod config_error;
pub mod error_code;
pub mod pipeline_error;

pub use analysis_error::AnalysisError;
pub use config_error::ConfigError;
pub use error_code::RouteMineErrorCode;
pub use pipeline_error::PipelineError;
