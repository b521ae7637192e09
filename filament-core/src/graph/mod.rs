//! Dependency Graph
//!
//! This module implements the dependency graph that tracks relationships
//! between reactive values and the computations watching them.
//!
//! # Overview
//!
//! The graph is a directed acyclic graph (DAG) where:
//!
//! - Nodes represent reactive values (cells) or computations (derived cells,
//!   effects)
//! - Edges represent dependencies discovered at evaluation time: if a
//!   watcher's function read cell B, there is an edge between B and the
//!   watcher
//!
//! When a cell is written, we traverse the graph outward from it, mark every
//! affected derived cell stale, and collect every affected effect exactly
//! once for re-execution.
//!
//! # Design Decisions
//!
//! 1. We use a centralized graph rather than distributed subscriber lists
//!    because it keeps the snapshot-then-sever propagation step atomic and
//!    makes disposal a single-point operation.
//!
//! 2. The graph is indexed by node ID for O(1) lookups.
//!
//! 3. We maintain both forward (watching) and reverse (watched-by) edges to
//!    enable efficient traversal in both directions. The reverse edges are
//!    insertion-ordered because effect execution order is part of the
//!    contract.

mod dependencies;
mod node;

pub use node::{Node, NodeId, NodeKind};

pub(crate) use dependencies::DependencyGraph;
