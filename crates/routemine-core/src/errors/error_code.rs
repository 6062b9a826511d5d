//! RouteMineErrorCode trait for structured error reporting.

/// Every error enum implements this to expose a stable code string that
/// callers (report writers, command surfaces) can match on.
pub trait RouteMineErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted message: `[ERROR_CODE] message`.
    fn coded_message(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INVALID_CONFIGURATION: &str = "INVALID_CONFIGURATION";
pub const NEGATIVE_DEMAND: &str = "NEGATIVE_DEMAND";
