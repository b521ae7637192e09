//! Graph Nodes
//!
//! This module defines the node types that live in the dependency graph.
//! Every reactive primitive (value cell, derived cell, effect) owns exactly
//! one node; the node carries the primitive's edges, while the primitive
//! itself carries its value and behavior.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexSet;

/// Unique identifier for a node in the dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Generate a new unique node ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// The kind of node in the dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A source node (value cell). These are the roots of the graph.
    /// They have no dependencies, only watchers.
    Source,

    /// A derived node. It watches the cells its computation reads, and is
    /// itself watchable, so invalidation flows through it.
    Derived,

    /// An effect node. These are leaves of the graph: they watch cells but
    /// produce no readable value, so nothing ever watches them.
    Effect,
}

/// A node in the dependency graph.
///
/// Edges are stored in both directions so the graph can be traversed from a
/// changed cell out to its watchers, and so a watcher's stale edges can be
/// severed cheaply before it re-evaluates.
#[derive(Debug)]
pub struct Node {
    /// Unique identifier for this node.
    id: NodeId,

    /// What kind of node this is.
    kind: NodeKind,

    /// Cells this node read during its most recent evaluation.
    watching: HashSet<NodeId>,

    /// Watchers whose most recent evaluation read this node, in the order
    /// they subscribed. Insertion order drives effect execution order.
    watched_by: IndexSet<NodeId>,
}

impl Node {
    /// Create a new node with the given kind.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(),
            kind,
            watching: HashSet::new(),
            watched_by: IndexSet::new(),
        }
    }

    /// Create a new source (value cell) node.
    pub fn source() -> Self {
        Self::new(NodeKind::Source)
    }

    /// Create a new derived node.
    pub fn derived() -> Self {
        Self::new(NodeKind::Derived)
    }

    /// Create a new effect node.
    pub fn effect() -> Self {
        Self::new(NodeKind::Effect)
    }

    /// Get the node's ID.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the node's kind.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Record that this node read from `cell`.
    pub fn add_watching(&mut self, cell: NodeId) {
        self.watching.insert(cell);
    }

    /// Forget that this node read from `cell`.
    pub fn remove_watching(&mut self, cell: NodeId) {
        self.watching.remove(&cell);
    }

    /// Take this node's full set of read cells, leaving it empty.
    pub fn take_watching(&mut self) -> HashSet<NodeId> {
        std::mem::take(&mut self.watching)
    }

    /// Get the cells this node read during its most recent evaluation.
    pub fn watching(&self) -> &HashSet<NodeId> {
        &self.watching
    }

    /// Record that `watcher` read from this node.
    pub fn add_watcher(&mut self, watcher: NodeId) {
        self.watched_by.insert(watcher);
    }

    /// Remove `watcher` from this node's subscribers, preserving the
    /// subscription order of the rest.
    pub fn remove_watcher(&mut self, watcher: NodeId) {
        self.watched_by.shift_remove(&watcher);
    }

    /// Take this node's ordered watcher set, leaving it empty.
    pub fn take_watchers(&mut self) -> IndexSet<NodeId> {
        std::mem::take(&mut self.watched_by)
    }

    /// Get the watchers subscribed to this node, in subscription order.
    pub fn watchers(&self) -> &IndexSet<NodeId> {
        &self.watched_by
    }
}
