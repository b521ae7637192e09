//! Value Cell Implementation
//!
//! A `Cell` is the fundamental reactive primitive. It holds a value and is
//! the only place where change enters the system.
//!
//! # How Cells Work
//!
//! 1. When a cell is read while a watcher is evaluating, the runtime records
//!    that watcher as a subscriber of the cell.
//!
//! 2. When a cell is written, every subscriber is invalidated and every
//!    affected effect re-runs before `write` returns.
//!
//! 3. Every write counts as a change. There is no equality check, so writing
//!    a value equal to the current one still triggers a full propagation
//!    pass.

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use crate::graph::{Node, NodeId};

use super::runtime::Runtime;

/// A mutable reactive value.
///
/// Cloning a `Cell` produces another handle to the same value; all clones
/// read and write the same storage and share the same graph node.
///
/// # Example
///
/// ```
/// use filament_core::Runtime;
///
/// let rt = Runtime::new();
/// let count = rt.create_cell(0);
///
/// count.write(5);
/// assert_eq!(count.read(), 5);
/// ```
pub struct Cell<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// This cell's node in the dependency graph.
    id: NodeId,

    /// The current value.
    value: Arc<RwLock<T>>,

    /// The runtime this cell was created from.
    runtime: Runtime,
}

impl<T> Cell<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(runtime: Runtime, initial: T) -> Self {
        let node = Node::source();
        let id = node.id();
        runtime.insert_node(node);

        Self {
            id,
            value: Arc::new(RwLock::new(initial)),
            runtime,
        }
    }

    /// Get this cell's graph node ID.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the current value.
    ///
    /// If a watcher is currently evaluating, it is subscribed to this cell.
    pub fn read(&self) -> T {
        self.runtime.record(self.id);
        self.value.read().clone()
    }

    /// Get the current value without subscribing the active watcher.
    pub fn read_untracked(&self) -> T {
        self.value.read().clone()
    }

    /// Replace the stored value and propagate the change.
    ///
    /// Returns only after every transitively affected effect has finished
    /// executing. The new value is stored before propagation begins, so
    /// re-running effects always observe it.
    pub fn write(&self, value: T) {
        {
            let mut guard = self.value.write();
            *guard = value;
        }

        trace!(cell = self.id.raw(), "cell written, propagating");
        self.runtime
            .propagate(self.id)
            .unwrap_or_else(|err| panic!("{err}"));
    }

    /// Compute the next value from the current one, then write it.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let new_value = {
            let guard = self.value.read();
            f(&guard)
        };
        self.write(new_value);
    }

    /// Number of watchers currently subscribed to this cell.
    pub fn watcher_count(&self) -> usize {
        self.runtime.watcher_count(self.id)
    }
}

impl<T> Clone for Cell<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: Arc::clone(&self.value),
            runtime: self.runtime.clone(),
        }
    }
}

impl<T> Debug for Cell<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cell")
            .field("id", &self.id)
            .field("value", &self.read_untracked())
            .field("watcher_count", &self.watcher_count())
            .finish()
    }
}
