#![forbid(unsafe_code)]

//! Observable value cells.
//!
//! [`Binding<T>`] is a single mutable value box with subscriber callbacks.
//! Cloning a `Binding` creates a new handle to the **same** cell; identity
//! is derived from the shared allocation, so two handles to one cell
//! compare equal by [`BindingId`].
//!
//! # Invariants
//!
//! 1. The value is readable at any time.
//! 2. `set()` stores the value, then invokes all subscribers synchronously
//!    in subscription order with a reference to the new value.
//! 3. `connect()` is add-only; there is no removal path.
//! 4. A subscriber may re-enter `set()` on the same cell: notification
//!    iterates over a snapshot of the subscriber list taken at `set()`
//!    time, so re-entrant mutation cannot invalidate iteration.
//!
//! # Failure Modes
//!
//! - **Subscriber panics**: the value is already stored; remaining
//!   subscribers of that notification are skipped by the unwind.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::tracker::TrackCx;

/// Identity of a cell, derived from its shared allocation pointer.
///
/// Stable for the life of the cell; equal across clones of the same cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(usize);

type Subscriber<T> = Rc<dyn Fn(&T)>;

/// Shared interior for [`Binding<T>`].
struct BindingInner<T> {
    value: T,
    /// Subscribers in subscription order. Add-only.
    subscribers: Vec<Subscriber<T>>,
    /// Optional persistence hook invoked by `dump()`.
    dumper: Option<Rc<dyn Fn(&T)>>,
}

/// A shared observable value cell with change notification.
pub struct Binding<T> {
    inner: Rc<RefCell<BindingInner<T>>>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Binding")
            .field("value", &inner.value)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + 'static> Binding<T> {
    /// Create a new cell holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(BindingInner {
                value,
                subscribers: Vec::new(),
                dumper: None,
            })),
        }
    }

    /// Identity of this cell.
    #[must_use]
    pub fn id(&self) -> BindingId {
        BindingId(Rc::as_ptr(&self.inner) as *const () as usize)
    }

    /// Current value (cloned). Never registers into a tracking scope.
    #[must_use]
    pub fn get(&self) -> T {
        self.with(T::clone)
    }

    /// Current value (cloned), registering this cell into the active
    /// tracking scope of `cx` (a no-op for an untracked handle).
    #[must_use]
    pub fn get_in(&self, cx: &TrackCx<'_>) -> T {
        cx.record(self);
        self.get()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Store `value`, then notify every subscriber in subscription order.
    ///
    /// Subscribers added during notification are picked up by the next
    /// `set()`, not the current one.
    pub fn set(&self, value: T) {
        let subscribers = {
            let mut inner = self.inner.borrow_mut();
            inner.value = value.clone();
            inner.subscribers.clone()
        };
        for subscriber in subscribers {
            subscriber(&value);
        }
    }

    /// Add a subscriber. Add-only; subscribers cannot be removed.
    pub fn connect(&self, callback: impl Fn(&T) + 'static) {
        self.inner.borrow_mut().subscribers.push(Rc::new(callback));
    }

    /// Install the persistence hook invoked by [`dump`](Self::dump).
    pub fn set_dumper(&self, dumper: impl Fn(&T) + 'static) {
        self.inner.borrow_mut().dumper = Some(Rc::new(dumper));
    }

    /// Persist the current value through the installed dumper, if any.
    pub fn dump(&self) {
        let (dumper, value) = {
            let inner = self.inner.borrow();
            (inner.dumper.clone(), inner.value.clone())
        };
        if let Some(dumper) = dumper {
            dumper(&value);
        }
    }
}

/// Object-safe view of a cell, independent of its value type.
///
/// The tracker accumulates heterogeneous cells behind this trait so a
/// discovery pass can later connect resync callbacks to each of them.
pub trait AnyBinding {
    /// Identity of the underlying cell.
    fn id(&self) -> BindingId;
    /// Add a value-agnostic subscriber.
    fn connect_changed(&self, callback: Rc<dyn Fn()>);
    /// Persist the current value through the cell's dumper, if any.
    fn request_dump(&self);
    /// Clone this handle behind the trait.
    fn boxed_clone(&self) -> Box<dyn AnyBinding>;
}

impl<T: Clone + 'static> AnyBinding for Binding<T> {
    fn id(&self) -> BindingId {
        Binding::id(self)
    }

    fn connect_changed(&self, callback: Rc<dyn Fn()>) {
        self.connect(move |_| callback());
    }

    fn request_dump(&self) {
        self.dump();
    }

    fn boxed_clone(&self) -> Box<dyn AnyBinding> {
        Box::new(self.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn get_set_roundtrip() {
        let cell = Binding::new(1);
        assert_eq!(cell.get(), 1);
        cell.set(5);
        assert_eq!(cell.get(), 5);
    }

    #[test]
    fn with_reads_by_reference() {
        let cell = Binding::new(String::from("abc"));
        let len = cell.with(String::len);
        assert_eq!(len, 3);
    }

    #[test]
    fn clone_shares_cell() {
        let a = Binding::new(String::from("x"));
        let b = a.clone();
        assert_eq!(a.id(), b.id());
        b.set(String::from("y"));
        assert_eq!(a.get(), "y");
    }

    #[test]
    fn distinct_cells_distinct_ids() {
        let a = Binding::new(0);
        let b = Binding::new(0);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn subscribers_run_in_subscription_order() {
        let cell = Binding::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            cell.connect(move |v| log.borrow_mut().push((tag, *v)));
        }

        cell.set(7);
        assert_eq!(
            *log.borrow(),
            vec![("first", 7), ("second", 7), ("third", 7)]
        );
    }

    #[test]
    fn every_set_notifies_even_with_equal_value() {
        let cell = Binding::new(3);
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        cell.connect(move |_| hits_clone.set(hits_clone.get() + 1));

        cell.set(3);
        cell.set(3);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn reentrant_set_from_subscriber() {
        let cell = Binding::new(0);
        let cell_clone = cell.clone();
        // Bump once; the bound keeps the re-entrant set from recursing forever.
        cell.connect(move |v| {
            if *v < 10 {
                cell_clone.set(*v + 10);
            }
        });

        cell.set(1);
        assert_eq!(cell.get(), 11);
    }

    #[test]
    fn dump_invokes_installed_dumper() {
        let cell = Binding::new(42);
        let dumped = Rc::new(RefCell::new(Vec::new()));
        let dumped_clone = Rc::clone(&dumped);
        cell.set_dumper(move |v| dumped_clone.borrow_mut().push(*v));

        cell.dump();
        cell.set(7);
        cell.dump();
        assert_eq!(*dumped.borrow(), vec![42, 7]);
    }

    #[test]
    fn dump_without_dumper_is_noop() {
        let cell = Binding::new(1);
        cell.dump();
        assert_eq!(cell.get(), 1);
    }

    #[test]
    fn connect_changed_ignores_payload() {
        let cell = Binding::new(String::new());
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        AnyBinding::connect_changed(&cell, Rc::new(move || hits_clone.set(hits_clone.get() + 1)));

        cell.set(String::from("a"));
        cell.set(String::from("b"));
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn boxed_clone_preserves_identity() {
        let cell = Binding::new(5);
        let boxed = AnyBinding::boxed_clone(&cell);
        assert_eq!(boxed.id(), cell.id());
    }

    #[test]
    fn debug_format() {
        let cell = Binding::new(9);
        cell.connect(|_| {});
        let dbg = format!("{cell:?}");
        assert!(dbg.contains("Binding"));
        assert!(dbg.contains('9'));
    }
}
