#![forbid(unsafe_code)]

//! Dependency tracking scopes.
//!
//! A [`Tracker`] holds a stack of dependency-accumulation sets. Opening a
//! scope pushes a fresh, empty set; cells read through a [`TrackCx`] handle
//! register into the innermost set; closing the scope pops it and hands the
//! accumulated [`DepSet`] back to the caller.
//!
//! There is no hidden global: the tracker is owned by the embedding engine
//! and passed down explicitly. Nested scopes are safe — the inner scope
//! accumulates independently and the outer state is restored on exit,
//! including on unwind (the guard pops in `Drop`).
//!
//! # Invariants
//!
//! 1. A cell registers at most once per scope, in first-read order.
//! 2. Scope exit (via [`ScopeGuard::finish`] or `Drop`) restores the
//!    previous tracking state exactly.
//! 3. Reads outside any scope, or through [`TrackCx::untracked`], register
//!    nothing.

use std::cell::RefCell;
use std::fmt;

use ahash::AHashSet;

use crate::binding::{AnyBinding, BindingId};

/// Ordered, de-duplicated set of cells discovered during one scope.
#[derive(Default)]
pub struct DepSet {
    order: Vec<Box<dyn AnyBinding>>,
    seen: AHashSet<BindingId>,
}

impl fmt::Debug for DepSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DepSet").field("len", &self.len()).finish()
    }
}

impl DepSet {
    fn insert(&mut self, cell: &dyn AnyBinding) {
        if self.seen.insert(cell.id()) {
            self.order.push(cell.boxed_clone());
        }
    }

    /// Number of distinct cells discovered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing was discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether the cell with `id` was discovered.
    #[must_use]
    pub fn contains(&self, id: BindingId) -> bool {
        self.seen.contains(&id)
    }

    /// Discovered cells, in first-read order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn AnyBinding> {
        self.order.iter().map(|cell| cell.as_ref())
    }

    /// The first discovered cell, if any.
    #[must_use]
    pub fn first(&self) -> Option<&dyn AnyBinding> {
        self.order.first().map(|cell| cell.as_ref())
    }
}

/// Explicit tracking context: a stack of open scopes.
#[derive(Default)]
pub struct Tracker {
    scopes: RefCell<Vec<DepSet>>,
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("open_scopes", &self.scopes.borrow().len())
            .finish()
    }
}

impl Tracker {
    /// Create a tracker with no open scopes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh tracking scope.
    ///
    /// While the returned guard is held, cell reads through [`TrackCx`]
    /// handles of this tracker accumulate into the new scope. Call
    /// [`ScopeGuard::finish`] to retrieve the accumulated set; dropping the
    /// guard discards it (the previous scope, if any, is restored either
    /// way).
    #[must_use]
    pub fn enter_scope(&self) -> ScopeGuard<'_> {
        self.scopes.borrow_mut().push(DepSet::default());
        ScopeGuard {
            tracker: self,
            finished: false,
        }
    }

    /// Whether a scope is currently open.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        !self.scopes.borrow().is_empty()
    }

    /// A read-session handle recording into this tracker's innermost scope.
    #[must_use]
    pub fn cx(&self) -> TrackCx<'_> {
        TrackCx {
            tracker: Some(self),
        }
    }

    fn record(&self, cell: &dyn AnyBinding) {
        if let Some(top) = self.scopes.borrow_mut().last_mut() {
            top.insert(cell);
        }
    }
}

/// RAII guard for one open tracking scope.
pub struct ScopeGuard<'a> {
    tracker: &'a Tracker,
    finished: bool,
}

impl ScopeGuard<'_> {
    /// Close the scope and return the accumulated dependency set.
    #[must_use]
    pub fn finish(mut self) -> DepSet {
        self.finished = true;
        self.tracker
            .scopes
            .borrow_mut()
            .pop()
            .unwrap_or_default()
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.tracker.scopes.borrow_mut().pop();
        }
    }
}

/// Read-session handle passed into bind expressions.
///
/// Cell reads via [`Binding::get_in`](crate::Binding::get_in) record into
/// the tracker behind this handle; an untracked handle records nothing.
#[derive(Clone, Copy)]
pub struct TrackCx<'a> {
    tracker: Option<&'a Tracker>,
}

impl TrackCx<'static> {
    /// A handle that records nothing. Used for resync re-evaluations and
    /// any read outside a discovery pass.
    #[must_use]
    pub fn untracked() -> Self {
        Self { tracker: None }
    }
}

impl TrackCx<'_> {
    pub(crate) fn record(&self, cell: &dyn AnyBinding) {
        if let Some(tracker) = self.tracker {
            tracker.record(cell);
        }
    }
}

impl fmt::Debug for TrackCx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackCx")
            .field("tracking", &self.tracker.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
