//! Dependency graph for pypigraph.
//!
//! A [`DependencyGraph`] holds two symmetric adjacency mappings — which
//! packages a package requires, and which packages require it — keyed by
//! normalized package name. The graph is write-only during a crawl,
//! serialized once to a flat line-oriented snapshot, and thereafter loaded
//! read-only for querying; a loaded graph is never mutated, so any number of
//! readers can share it without synchronization.
//!
//! There is deliberately no process-wide default instance:
//! [`DependencyGraph::load`] is the only way to obtain a graph from disk,
//! and its failure is an ordinary error, not a startup abort.

pub mod error;
pub mod graph;
mod snapshot;

pub use error::{GraphError, Result};
pub use graph::DependencyGraph;
