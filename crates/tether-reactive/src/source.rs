#![forbid(unsafe_code)]

//! Bind sources: where a bound setter gets its value from.
//!
//! A [`BindSrc`] is either a direct reference to one cell or a dependency
//! closure reading cells through a [`TrackCx`] handle. Evaluating the
//! source inside a fresh tracking scope *is* the dependency discovery pass:
//! every cell the evaluation touches (directly or through helper functions
//! that also take the handle) registers itself into the scope.
//!
//! The two variants are constructed through two distinct named functions,
//! [`BindSrc::cell`] and [`BindSrc::expr`]. Only the `Cell` variant — a
//! direct single-variable read — is eligible for two-way sync; a computed
//! expression never is, even when it happens to read a single cell.

use std::fmt;
use std::rc::Rc;

use crate::binding::Binding;
use crate::tracker::{DepSet, TrackCx, Tracker};

/// A value source for a bound setter.
pub enum BindSrc<T> {
    /// A direct read of exactly one cell.
    Cell(Binding<T>),
    /// A computed expression over any number of cells.
    Expr(Rc<dyn Fn(&TrackCx) -> T>),
}

impl<T> Clone for BindSrc<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Cell(cell) => Self::Cell(cell.clone()),
            Self::Expr(f) => Self::Expr(Rc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for BindSrc<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell(_) => f.write_str("BindSrc::Cell"),
            Self::Expr(_) => f.write_str("BindSrc::Expr"),
        }
    }
}

impl<T: Clone + 'static> BindSrc<T> {
    /// A source that mirrors exactly one cell.
    #[must_use]
    pub fn cell(binding: &Binding<T>) -> Self {
        Self::Cell(binding.clone())
    }

    /// A source computed by a dependency closure.
    ///
    /// The closure must read cells through the handle it is given
    /// (`cell.get_in(cx)`), directly or via helpers that forward the
    /// handle; reads through plain `get()` are invisible to discovery.
    #[must_use]
    pub fn expr(f: impl Fn(&TrackCx) -> T + 'static) -> Self {
        Self::Expr(Rc::new(f))
    }

    /// Evaluate once against the given read-session handle.
    #[must_use]
    pub fn eval(&self, cx: &TrackCx<'_>) -> T {
        match self {
            Self::Cell(cell) => cell.get_in(cx),
            Self::Expr(f) => f(cx),
        }
    }

    /// Evaluate once without recording dependencies.
    #[must_use]
    pub fn eval_untracked(&self) -> T {
        self.eval(&TrackCx::untracked())
    }

    /// Evaluate once inside a fresh scope of `tracker`, returning the
    /// initial value and every cell the evaluation read.
    #[must_use]
    pub fn discover(&self, tracker: &Tracker) -> (T, DepSet) {
        let guard = tracker.enter_scope();
        let value = self.eval(&tracker.cx());
        (value, guard.finish())
    }

    /// Whether this source is a direct single-variable read.
    ///
    /// This is the gate for two-way sync: only a widget that mirrors
    /// exactly one state variable may push changes back into it.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        matches!(self, Self::Cell(_))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
