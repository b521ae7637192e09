//! Dependency Graph
//!
//! This module implements the dependency graph that connects reactive values
//! and the computations watching them.
//!
//! # How It Works
//!
//! 1. Before a watcher (derived cell or effect) evaluates, the graph severs
//!    every edge recorded by its previous evaluation and pushes the watcher
//!    onto the active-watcher stack.
//!
//! 2. While the watcher's function runs, every cell it reads calls
//!    [`DependencyGraph::record`], which wires an edge from the watcher at
//!    the top of the stack to the cell, in both directions.
//!
//! 3. When a cell is written, [`DependencyGraph::propagate`] walks outward
//!    from it: derived watchers are marked stale and walked through in turn,
//!    while effects are collected into one ordered, de-duplicated batch.
//!
//! Edges are rebuilt from scratch on every evaluation, so a conditional
//! branch that was not taken this time is simply not re-subscribed and can
//! never fire the watcher spuriously.
//!
//! # The Active-Watcher Stack
//!
//! The stack is re-entrant: a derived cell's recomputation can read another
//! derived cell whose own recomputation is still in progress. Reads always
//! credit the watcher at the top of the stack. The stack also doubles as the
//! cycle guard: a watcher that shows up again while it is still being
//! evaluated would recurse without bound, so that is a hard error.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::trace;

use super::node::{Node, NodeId, NodeKind};
use crate::error::ReactiveError;
use crate::reactive::Watcher;

/// The dependency graph shared by every primitive created from one runtime.
///
/// All methods take `&mut self`; the owning runtime serializes access behind
/// a single mutex and keeps every critical section short, so user functions
/// never run while the graph is locked.
pub struct DependencyGraph {
    /// All nodes in the graph, indexed by ID.
    nodes: HashMap<NodeId, Node>,

    /// Dispatch handles for the watcher nodes (derived cells and effects).
    /// Entries are held until the watcher is removed from the graph.
    watchers: HashMap<NodeId, Arc<dyn Watcher>>,

    /// The stack of currently evaluating watchers, innermost last.
    active: SmallVec<[NodeId; 8]>,
}

impl DependencyGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            watchers: HashMap::new(),
            active: SmallVec::new(),
        }
    }

    /// Add a node to the graph.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id();
        self.nodes.insert(id, node);
        id
    }

    /// Register the dispatch handle for a watcher node.
    pub fn register_watcher(&mut self, id: NodeId, watcher: Arc<dyn Watcher>) {
        self.watchers.insert(id, watcher);
    }

    /// Remove a node and every edge involving it, in both directions.
    ///
    /// Removing an unknown node is a no-op, so disposal is idempotent.
    pub fn remove_node(&mut self, id: NodeId) {
        self.watchers.remove(&id);

        if let Some(node) = self.nodes.remove(&id) {
            for cell in node.watching() {
                if let Some(cell_node) = self.nodes.get_mut(cell) {
                    cell_node.remove_watcher(id);
                }
            }
            for watcher in node.watchers() {
                if let Some(watcher_node) = self.nodes.get_mut(watcher) {
                    watcher_node.remove_watching(id);
                }
            }
        }
    }

    /// Begin tracing an evaluation of `watcher`.
    ///
    /// Severs the edges recorded by the watcher's previous evaluation (in
    /// both directions) and pushes the watcher onto the active stack. Fails
    /// if the watcher is already being evaluated.
    pub fn begin_trace(&mut self, watcher: NodeId) -> Result<(), ReactiveError> {
        if self.active.contains(&watcher) {
            return Err(ReactiveError::CyclicDependency(watcher));
        }

        if let Some(node) = self.nodes.get_mut(&watcher) {
            let stale_edges = node.take_watching();
            for cell in stale_edges {
                if let Some(cell_node) = self.nodes.get_mut(&cell) {
                    cell_node.remove_watcher(watcher);
                }
            }
        }

        self.active.push(watcher);
        Ok(())
    }

    /// Finish tracing an evaluation of `watcher`.
    pub fn end_trace(&mut self, watcher: NodeId) {
        let popped = self.active.pop();
        debug_assert_eq!(
            popped,
            Some(watcher),
            "trace stack mismatch: expected to pop {watcher:?}, got {popped:?}"
        );
    }

    /// Register `cell` as a dependency of the currently evaluating watcher.
    ///
    /// Does nothing when no watcher is evaluating: plain reads from outside
    /// the reactive system are untracked.
    pub fn record(&mut self, cell: NodeId) {
        let Some(&watcher) = self.active.last() else {
            return;
        };

        // A watcher disposed from within its own body stops collecting edges.
        let Some(watcher_node) = self.nodes.get_mut(&watcher) else {
            return;
        };
        watcher_node.add_watching(cell);

        if let Some(cell_node) = self.nodes.get_mut(&cell) {
            cell_node.add_watcher(watcher);
        }
    }

    /// Walk outward from a changed cell.
    ///
    /// Every subscription touched by the walk is severed (watchers
    /// re-subscribe on their next evaluation), every derived watcher is
    /// marked stale before any effect runs, and the effects reached by the
    /// walk are returned exactly once each, in the order first encountered.
    /// The caller runs them after releasing the graph lock.
    pub fn propagate(&mut self, cell: NodeId) -> Vec<Arc<dyn Watcher>> {
        let mut effects = Vec::new();
        let mut queued = HashSet::new();
        self.invalidate(cell, &mut effects, &mut queued);
        trace!(
            cell = cell.raw(),
            effects = effects.len(),
            "propagation walk complete"
        );
        effects
    }

    fn invalidate(
        &mut self,
        cell: NodeId,
        effects: &mut Vec<Arc<dyn Watcher>>,
        queued: &mut HashSet<NodeId>,
    ) {
        let watchers = match self.nodes.get_mut(&cell) {
            Some(node) => node.take_watchers(),
            None => return,
        };

        // Invalidate the snapshot's subscriptions before dispatching: each
        // watcher rebuilds its edges on its next evaluation.
        for watcher_id in &watchers {
            if let Some(watcher_node) = self.nodes.get_mut(watcher_id) {
                watcher_node.remove_watching(cell);
            }
        }

        for watcher_id in watchers {
            let Some(watcher) = self.watchers.get(&watcher_id).cloned() else {
                continue;
            };
            match watcher.kind() {
                NodeKind::Derived => {
                    // The cached value is now invalid, and so is anything
                    // computed from it.
                    watcher.mark_stale();
                    self.invalidate(watcher_id, effects, queued);
                }
                NodeKind::Effect => {
                    if queued.insert(watcher_id) {
                        effects.push(watcher);
                    }
                }
                NodeKind::Source => {}
            }
        }
    }

    /// Number of watchers currently subscribed to `cell`.
    pub fn watcher_count(&self, cell: NodeId) -> usize {
        self.nodes
            .get(&cell)
            .map(|node| node.watchers().len())
            .unwrap_or(0)
    }

    /// Total number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
