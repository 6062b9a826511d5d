//! # routemine-bench
//!
//! Benchmarks for the routemine mining engine.
//!
//! Contains deterministic routing-dataset generators shared by the criterion
//! benchmarks under `benches/` and by tests that need realistic volume.

pub mod fixtures;
