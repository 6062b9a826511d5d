//! Serializable result tables. Persisting them is the caller's concern.

pub mod tables;

pub use tables::{
    clustered_library_rows, part_assignment_rows, pattern_library_rows, round_share,
    transition_rows, ClusteredLibraryRow, PartAssignmentRow, PatternLibraryRow, TableKind,
    TransitionRow,
};
