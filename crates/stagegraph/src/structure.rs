//! Validated graph structure built from a raw description.
//!
//! [`StageGraph`] is the only input the layout phases see. It is built once
//! per description and never mutated afterwards.

mod graph;

pub use graph::{EdgeIndex, NodeIndex, Stage, StageGraph, Transition};
