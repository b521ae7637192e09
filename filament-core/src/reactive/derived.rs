//! Derived Cell Implementation
//!
//! A `Derived` is a cached value computed from other cells. It re-evaluates
//! only when read while stale.
//!
//! # How Derived Cells Work
//!
//! 1. On first read, the computation runs and the result is cached.
//!
//! 2. While the cache is fresh, reads return the cached value without
//!    running the computation.
//!
//! 3. When any dependency changes, the propagation walk marks the derived
//!    cell stale. Nothing recomputes at that point.
//!
//! 4. The next read finds the stale flag and re-evaluates, rebuilding the
//!    cell's dependency edges from whatever the computation reads this time.
//!
//! A derived cell is both a watcher (of the cells its computation reads) and
//! a cell (readable, and invalidated through the graph), which is how
//! invalidation flows through chains of derived values.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use crate::error::ReactiveError;
use crate::graph::{Node, NodeId, NodeKind};

use super::runtime::{Runtime, Watcher};

/// Cache state of a derived cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedState {
    /// The computation has never run.
    Uninitialized,

    /// The cached value is up-to-date.
    Cached,

    /// A dependency changed since the cached value was computed; the next
    /// read will re-evaluate.
    Stale,
}

struct DerivedInner<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// This cell's node in the dependency graph.
    id: NodeId,

    /// The computation.
    compute: Box<dyn Fn() -> T + Send + Sync>,

    /// The cached value (None if never computed).
    value: RwLock<Option<T>>,

    /// Whether the cached value is outdated. Starts true so the first read
    /// evaluates.
    stale: AtomicBool,
}

impl<T> Watcher for DerivedInner<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn id(&self) -> NodeId {
        self.id
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Derived
    }

    fn mark_stale(&self) {
        trace!(derived = self.id.raw(), "derived value marked stale");
        self.stale.store(true, Ordering::SeqCst);
    }
}

/// A lazily recomputed value derived from other cells.
///
/// Cloning a `Derived` produces another handle to the same cached value and
/// graph node.
pub struct Derived<T>
where
    T: Clone + Send + Sync + 'static,
{
    inner: Arc<DerivedInner<T>>,
    runtime: Runtime,
}

impl<T> Derived<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new<F>(runtime: Runtime, compute: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let node = Node::derived();
        let id = node.id();
        let inner = Arc::new(DerivedInner {
            id,
            compute: Box::new(compute),
            value: RwLock::new(None),
            stale: AtomicBool::new(true),
        });
        runtime.insert_watcher(node, inner.clone());

        Self { inner, runtime }
    }

    /// Get this cell's graph node ID.
    pub fn id(&self) -> NodeId {
        self.inner.id
    }

    /// Get the current value, recomputing it first if it is stale.
    ///
    /// Panics if the computation turns out to depend on this cell itself;
    /// use [`Derived::try_read`] for the non-panicking form.
    pub fn read(&self) -> T {
        self.try_read().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Get the current value, recomputing it first if it is stale.
    pub fn try_read(&self) -> Result<T, ReactiveError> {
        if self.inner.stale.load(Ordering::SeqCst) {
            trace!(derived = self.inner.id.raw(), "recomputing stale derived");
            let value = self
                .runtime
                .trace(self.inner.id, || (self.inner.compute)())?;
            *self.inner.value.write() = Some(value);
            self.inner.stale.store(false, Ordering::SeqCst);
        }

        // Whether freshly computed or served from cache, the read itself is
        // recorded, so this cell propagates further when used inside another
        // derived cell or effect.
        self.runtime.record(self.inner.id);

        Ok(self
            .inner
            .value
            .read()
            .clone()
            .expect("refreshed derived cell holds a value"))
    }

    /// Get the current cache state.
    pub fn state(&self) -> DerivedState {
        let stale = self.inner.stale.load(Ordering::SeqCst);
        let has_value = self.inner.value.read().is_some();
        match (has_value, stale) {
            (false, _) => DerivedState::Uninitialized,
            (true, false) => DerivedState::Cached,
            (true, true) => DerivedState::Stale,
        }
    }
}

impl<T> Clone for Derived<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            runtime: self.runtime.clone(),
        }
    }
}

impl<T> Debug for Derived<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Derived")
            .field("id", &self.inner.id)
            .field("state", &self.state())
            .finish()
    }
}
