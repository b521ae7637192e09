//! Reactive Primitives
//!
//! This module implements the core reactive system: cells, derived values,
//! and effects. These primitives form the foundation of Filament's
//! fine-grained reactivity.
//!
//! # Concepts
//!
//! ## Cells
//!
//! A [`Cell`] is a container for mutable state. When a cell is read during
//! the evaluation of a derived value or effect, the cell automatically
//! registers that computation as a dependent. When the cell is written, all
//! dependents are invalidated and every affected effect re-runs before the
//! write returns.
//!
//! ## Derived Values
//!
//! A [`Derived`] is a value computed from other cells that caches its
//! result. It re-evaluates only when read after one of its dependencies
//! changed. Derived values that are never read never compute.
//!
//! ## Effects
//!
//! An [`Effect`] is a side-effecting computation that runs once at creation
//! and again whenever its dependencies change. Effects are used to
//! synchronize reactive state with external systems.
//!
//! # Implementation Notes
//!
//! Dependencies are discovered at evaluation time, not declared: the runtime
//! keeps a stack of currently evaluating watchers, and every cell read
//! records an edge from the watcher at the top of the stack. The edges are
//! rebuilt on every evaluation, which is what makes conditional dependencies
//! work.
//!
//! This approach (sometimes called "automatic dependency tracking" or
//! "transparent reactivity") is used by SolidJS, Vue 3, and Leptos.

mod cell;
mod derived;
mod effect;
mod runtime;

pub use cell::Cell;
pub use derived::{Derived, DerivedState};
pub use effect::Effect;
pub use runtime::{Runtime, Watcher};
