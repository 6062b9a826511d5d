//! Routing records and normalization.
//!
//! Turns flat operation/demand records into per-part routings and reduces
//! each routing to its canonical token sequence.

pub mod assembly;
pub mod normalizer;
pub mod types;

pub use assembly::{assemble_parts, AssembledParts, AssemblyReport};
pub use normalizer::{normalize, normalize_parts, signature, SIGNATURE_SEPARATOR};
pub use types::{DemandRecord, NormalizedPart, OperationRecord, OperationTiming, Part, RoutingStep};
