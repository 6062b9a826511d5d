//! Step transition graph.

pub mod transitions;

pub use transitions::{build_transitions, Transition, TransitionGraph, TransitionTable};
