// src/dag/mod.rs

//! Task composition.
//!
//! - [`node`] defines [`TaskNode`] and the `sequence` / `parallel`
//!   combinators.
//! - [`composites`] assembles the named composites (`default`, `watch`, ...)
//!   from the primitive tasks.
//! - [`graph`] flattens a node tree into ordering constraints, used for
//!   `--dry-run` output and for checking composition invariants.

pub mod composites;
pub mod graph;
pub mod node;

pub use composites::Composites;
pub use graph::ExecutionGraph;
pub use node::{TaskNode, parallel, sequence};
