//! # routemine-core
//!
//! Shared foundation for the routemine routing-pattern miner: error enums with
//! stable error codes, layered TOML configuration, the closed
//! [`config::NormalizationConfig`], tracing setup, and collection aliases.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;
