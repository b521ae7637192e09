//! Effect Implementation
//!
//! An `Effect` is a side-effecting computation that re-runs whenever one of
//! the cells it read last time changes.
//!
//! # How Effects Work
//!
//! 1. When created, the effect runs its function immediately to establish
//!    initial dependencies.
//!
//! 2. When any dependency changes, the propagation walk collects the effect
//!    and re-runs it exactly once per write, after every affected derived
//!    cell has been marked stale.
//!
//! 3. Each run rebuilds the effect's dependency edges from whatever it
//!    actually read this time.
//!
//! # Lifetime
//!
//! The runtime keeps every effect registered until it is disposed, even if
//! the owning code drops its handle. Components that create effects should
//! hold the handle and call [`Effect::dispose`] on their own teardown;
//! disposal is idempotent.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::trace;

use crate::error::ReactiveError;
use crate::graph::{Node, NodeId, NodeKind};

use super::runtime::{Runtime, Watcher};

struct EffectInner {
    /// This effect's node in the dependency graph.
    id: NodeId,

    /// The effect function. Its return value is discarded.
    run: Box<dyn Fn() + Send + Sync>,

    /// Whether the effect has been disposed.
    disposed: AtomicBool,

    /// Number of times the effect has run.
    run_count: AtomicUsize,
}

impl EffectInner {
    fn execute(&self, runtime: &Runtime) -> Result<(), ReactiveError> {
        if self.disposed.load(Ordering::SeqCst) {
            return Ok(());
        }

        trace!(effect = self.id.raw(), "running effect");
        runtime.trace(self.id, || (self.run)())?;
        self.run_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Watcher for EffectInner {
    fn id(&self) -> NodeId {
        self.id
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Effect
    }

    fn rerun(&self, runtime: &Runtime) -> Result<(), ReactiveError> {
        self.execute(runtime)
    }
}

/// A side-effecting computation that re-runs when its dependencies change.
///
/// Cloning an `Effect` produces another handle to the same registration;
/// disposing any clone disposes them all.
pub struct Effect {
    inner: Arc<EffectInner>,
    runtime: Runtime,
}

impl Effect {
    pub(crate) fn new<F>(runtime: Runtime, run: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let node = Node::effect();
        let id = node.id();
        let inner = Arc::new(EffectInner {
            id,
            run: Box::new(run),
            disposed: AtomicBool::new(false),
            run_count: AtomicUsize::new(0),
        });
        runtime.insert_watcher(node, inner.clone());

        let effect = Self { inner, runtime };

        // Runs immediately to establish dependencies.
        effect
            .inner
            .execute(&effect.runtime)
            .unwrap_or_else(|err| panic!("{err}"));

        effect
    }

    /// Get this effect's graph node ID.
    pub fn id(&self) -> NodeId {
        self.inner.id
    }

    /// Dispose of the effect.
    ///
    /// Removes the effect and all of its edges from the graph; it will never
    /// run again. Safe to call more than once.
    pub fn dispose(&self) {
        if !self.inner.disposed.swap(true, Ordering::SeqCst) {
            self.runtime.dispose(self.inner.id);
        }
    }

    /// Check if the effect has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    /// Get the number of times the effect has run.
    pub fn run_count(&self) -> usize {
        self.inner.run_count.load(Ordering::SeqCst)
    }
}

impl Clone for Effect {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            runtime: self.runtime.clone(),
        }
    }
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect")
            .field("id", &self.inner.id)
            .field("run_count", &self.run_count())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
