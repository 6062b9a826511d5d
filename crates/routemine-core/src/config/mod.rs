//! Configuration system for routemine.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod clustering_config;
pub mod io_config;
pub mod library_config;
pub mod normalization_config;
pub mod routemine_config;

pub use clustering_config::ClusteringConfig;
pub use io_config::IoConfig;
pub use library_config::LibraryConfig;
pub use normalization_config::{NormalizationConfig, NormalizationOptions};
pub use routemine_config::{parse_drop_steps, parse_edit_distance, CliOverrides, RouteMineConfig};
