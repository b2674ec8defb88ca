#![forbid(unsafe_code)]

//! Observable cells and dependency tracking for Tether bindings.
//!
//! This crate provides the state side of the binding layer:
//!
//! - [`Binding`]: a shared, mutable value cell with change notification via
//!   subscriber callbacks.
//! - [`Tracker`]: an explicit tracking context that records which cells are
//!   read during a bounded evaluation window (a *tracking scope*).
//! - [`BindSrc`]: a bind source — either a direct cell reference or a
//!   dependency closure that reads cells through a [`TrackCx`] handle, so
//!   that evaluating the source once discovers its dependencies.
//!
//! # Architecture
//!
//! `Binding<T>` uses `Rc<RefCell<..>>` for single-threaded shared ownership.
//! There is no hidden global tracking state: the [`Tracker`] is created by
//! the embedding engine and handed down into evaluations as a [`TrackCx`].
//! Cell reads through `TrackCx` register the cell into the innermost open
//! scope; reads through a plain `get()` (or an untracked handle) register
//! nothing.
//!
//! # Invariants
//!
//! 1. `Binding::set` invokes every subscriber synchronously, in
//!    subscription order, with the new value. Every `set` notifies; there
//!    is no equality short-circuit.
//! 2. Subscriptions are add-only; no subscriber is ever silently dropped.
//! 3. A cell read twice inside one scope registers once (idempotent per
//!    read session).
//! 4. Scope entry and exit follow stack discipline; exiting (normally or
//!    via unwind) restores the previous tracking state.

pub mod binding;
pub mod source;
pub mod tracker;

pub use binding::{AnyBinding, Binding, BindingId};
pub use source::BindSrc;
pub use tracker::{DepSet, ScopeGuard, TrackCx, Tracker};
