//! Reactive Runtime
//!
//! The runtime is the central coordinator that connects cells, derived
//! values, and effects. It owns the dependency graph and drives change
//! propagation when cells are written.
//!
//! # How It Works
//!
//! 1. When a primitive is created, it registers a node with the runtime's
//!    graph.
//!
//! 2. When a derived cell or effect evaluates, the runtime traces the
//!    evaluation: every cell read along the way becomes a dependency edge.
//!
//! 3. When a cell's value changes, the runtime:
//!    a. Walks the graph outward from the cell
//!    b. Marks every affected derived cell as stale
//!    c. Collects every affected effect exactly once, in subscription order
//!    d. Re-runs the collected effects after releasing the graph lock
//!
//! # Ownership
//!
//! There is no global runtime. `Runtime` is a cheap clone-able handle to one
//! graph; every primitive holds a clone of the handle it was created from,
//! and independent runtimes never interact. Mutations of the graph are
//! serialized behind a single mutex, and user functions always run with the
//! lock released.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::ReactiveError;
use crate::graph::{DependencyGraph, Node, NodeId, NodeKind};

use super::cell::Cell;
use super::derived::Derived;
use super::effect::Effect;

/// A trait for graph nodes that can be notified when a dependency changes.
///
/// The graph dispatches through this trait during propagation: derived cells
/// are flagged via [`Watcher::mark_stale`] while the walk is still running,
/// and effects are re-executed via [`Watcher::rerun`] once the walk is done.
pub trait Watcher: Send + Sync {
    /// Get the graph node ID for this watcher.
    fn id(&self) -> NodeId;

    /// Which variant this watcher is. Drives dispatch during propagation.
    fn kind(&self) -> NodeKind;

    /// Flag this watcher's cached value as outdated (derived cells).
    ///
    /// Must not recompute and must not touch the graph; the propagation walk
    /// handles reaching this watcher's own dependents.
    fn mark_stale(&self) {}

    /// Execute this watcher's function again (effects).
    fn rerun(&self, _runtime: &Runtime) -> Result<(), ReactiveError> {
        Ok(())
    }
}

/// Handle to an independent reactive runtime.
///
/// Cloning the handle shares the underlying graph. Dropping every handle
/// (including the clones held by cells, derived values, and undisposed
/// effects) releases the graph.
#[derive(Clone)]
pub struct Runtime {
    graph: Arc<Mutex<DependencyGraph>>,
}

impl Runtime {
    /// Create a new runtime with an empty dependency graph.
    pub fn new() -> Self {
        Self {
            graph: Arc::new(Mutex::new(DependencyGraph::new())),
        }
    }

    /// Create a mutable cell holding `initial`.
    pub fn create_cell<T>(&self, initial: T) -> Cell<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        Cell::new(self.clone(), initial)
    }

    /// Create a derived cell computing its value from other cells.
    ///
    /// The computation does not run until the first read.
    pub fn create_derived<T, F>(&self, compute: F) -> Derived<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Derived::new(self.clone(), compute)
    }

    /// Create an effect and run it once, synchronously, to establish its
    /// initial dependencies.
    ///
    /// The effect stays registered (and keeps re-running on changes) until
    /// [`Effect::dispose`] is called, even if the returned handle is dropped.
    pub fn create_effect<F>(&self, run: F) -> Effect
    where
        F: Fn() + Send + Sync + 'static,
    {
        Effect::new(self.clone(), run)
    }

    /// Total number of nodes registered in this runtime's graph.
    pub fn node_count(&self) -> usize {
        self.graph.lock().node_count()
    }

    /// Register a plain (non-watcher) node.
    pub(crate) fn insert_node(&self, node: Node) -> NodeId {
        self.graph.lock().add_node(node)
    }

    /// Register a watcher node together with its dispatch handle.
    pub(crate) fn insert_watcher(&self, node: Node, watcher: Arc<dyn Watcher>) -> NodeId {
        let mut graph = self.graph.lock();
        let id = graph.add_node(node);
        graph.register_watcher(id, watcher);
        id
    }

    /// Evaluate `f` as `watcher`, recording every cell it reads as a fresh
    /// dependency edge.
    ///
    /// The watcher's edges from its previous evaluation are dropped before
    /// `f` runs, and the active-watcher frame is popped even if `f` panics.
    pub(crate) fn trace<R>(
        &self,
        watcher: NodeId,
        f: impl FnOnce() -> R,
    ) -> Result<R, ReactiveError> {
        self.graph.lock().begin_trace(watcher)?;
        let _frame = TraceFrame {
            graph: &*self.graph,
            watcher,
        };
        Ok(f())
    }

    /// Register `cell` as a dependency of the currently evaluating watcher,
    /// if any.
    pub(crate) fn record(&self, cell: NodeId) {
        self.graph.lock().record(cell);
    }

    /// Propagate a change of `cell` through the graph and re-run every
    /// affected effect.
    ///
    /// Effects run with the graph lock released, so their reads re-subscribe
    /// normally and nested writes start their own complete pass.
    pub(crate) fn propagate(&self, cell: NodeId) -> Result<(), ReactiveError> {
        let effects = self.graph.lock().propagate(cell);
        for effect in effects {
            effect.rerun(self)?;
        }
        Ok(())
    }

    /// Remove a watcher and all of its edges from the graph.
    pub(crate) fn dispose(&self, watcher: NodeId) {
        debug!(watcher = watcher.raw(), "watcher removed from graph");
        self.graph.lock().remove_node(watcher);
    }

    /// Number of watchers currently subscribed to `cell`.
    pub(crate) fn watcher_count(&self, cell: NodeId) -> usize {
        self.graph.lock().watcher_count(cell)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("node_count", &self.node_count())
            .finish()
    }
}

/// Guard that pops the active-watcher frame when dropped.
///
/// This keeps the stack consistent even when the traced function panics.
struct TraceFrame<'a> {
    graph: &'a Mutex<DependencyGraph>,
    watcher: NodeId,
}

impl Drop for TraceFrame<'_> {
    fn drop(&mut self) {
        self.graph.lock().end_trace(self.watcher);
    }
}
