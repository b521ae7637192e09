//! Error types for the reactive runtime.

use thiserror::Error;

use crate::graph::NodeId;

/// Errors surfaced by the reactive runtime.
///
/// These are always programmer errors in the wiring of the dependency graph;
/// the runtime has no recoverable failure modes of its own.
#[derive(Debug, Error)]
pub enum ReactiveError {
    /// A watcher was entered again while it was still being evaluated.
    ///
    /// This happens when a derived cell reads itself (directly or through a
    /// chain of other cells), or when an effect writes a cell it also reads.
    /// Without this check the evaluation would recurse without bound.
    #[error("cyclic dependency: node {0:?} was entered while it was still being evaluated")]
    CyclicDependency(NodeId),
}
