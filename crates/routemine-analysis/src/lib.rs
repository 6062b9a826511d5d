//! # routemine-analysis
//!
//! Mining engine for part routings: record assembly, sequence normalization,
//! the demand-weighted pattern library, greedy edit-distance clustering,
//! the step transition graph, per-pattern machine-hour flows, and the
//! serializable result tables.

pub mod graph;
pub mod patterns;
pub mod reporting;
pub mod routing;
