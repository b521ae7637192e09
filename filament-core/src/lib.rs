//! Filament Core
//!
//! This crate provides the core runtime for the Filament fine-grained
//! reactive library. It implements:
//!
//! - Reactive primitives (cells, derived values, effects)
//! - A dependency graph with automatic, evaluation-time dependency discovery
//! - Glitch-free change propagation with exactly-once effect delivery, even
//!   under diamond-shaped dependency graphs
//!
//! Propagation is fully synchronous: a write returns only after every
//! transitively affected effect has finished executing, and two sequential
//! writes always produce two complete, independent passes.
//!
//! # Architecture
//!
//! The crate is organized into a few modules:
//!
//! - `reactive`: the public primitives and the runtime that owns the graph
//! - `graph`: the dependency graph, its nodes, and the propagation walk
//! - `error`: the runtime's error type
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use filament_core::Runtime;
//!
//! let rt = Runtime::new();
//! let count = rt.create_cell(2);
//!
//! let doubled = {
//!     let count = count.clone();
//!     rt.create_derived(move || count.read() * 2)
//! };
//!
//! let log = Arc::new(Mutex::new(Vec::new()));
//! let _logger = {
//!     let doubled = doubled.clone();
//!     let log = log.clone();
//!     rt.create_effect(move || log.lock().push(doubled.read()))
//! };
//!
//! // The effect ran once at creation; the write re-runs it synchronously.
//! count.write(5);
//! assert_eq!(*log.lock(), vec![4, 10]);
//! ```

pub mod error;
pub mod graph;
pub mod reactive;

pub use error::ReactiveError;
pub use graph::{NodeId, NodeKind};
pub use reactive::{Cell, Derived, DerivedState, Effect, Runtime, Watcher};
