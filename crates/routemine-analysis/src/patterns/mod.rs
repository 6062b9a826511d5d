//! Pattern mining: signature grouping, edit-distance clustering, flows,
//! and the end-to-end mining pipeline.

pub mod types;
pub mod grouper;
pub mod distance;
pub mod clustering;
pub mod flow;
pub mod pipeline;

pub use types::{rank_order, PartAssignment, Pattern, PatternLibrary};
pub use grouper::PatternLibraryBuilder;
pub use distance::edit_distance;
pub use clustering::{cluster, Cluster, Clustering, PatternClusterer};
pub use flow::{FlowBuilder, FlowLink, PatternFlow};
pub use pipeline::{MiningDiagnostics, MiningResult, PatternSummary, RoutingMiner};
