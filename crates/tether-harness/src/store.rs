#![forbid(unsafe_code)]

//! A named-cell namespace standing in for the external binder collaborator.
//!
//! Cells defined through a [`Store`] get a dumper that appends to the
//! store's dump log and marks the cell's name in the dump filters, the
//! bookkeeping the real namespace performs when a two-way binding persists
//! its state.

use std::cell::RefCell;
use std::rc::Rc;

use ahash::{AHashMap, AHashSet};

use tether_hook::Value;
use tether_reactive::Binding;

/// A minimal observable-cell namespace with persistence bookkeeping.
#[derive(Default)]
pub struct Store {
    cells: RefCell<AHashMap<String, Binding<Value>>>,
    filters: Rc<RefCell<AHashSet<String>>>,
    dump_log: Rc<RefCell<Vec<(String, Value)>>>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or replace) the named cell, wiring its dumper into the
    /// store's log and filters.
    pub fn define(&self, name: &str, value: impl Into<Value>) -> Binding<Value> {
        let cell = Binding::new(value.into());

        let cell_name = name.to_string();
        let filters = Rc::clone(&self.filters);
        let dump_log = Rc::clone(&self.dump_log);
        cell.set_dumper(move |v| {
            filters.borrow_mut().insert(cell_name.clone());
            dump_log.borrow_mut().push((cell_name.clone(), v.clone()));
        });

        self.cells.borrow_mut().insert(name.to_string(), cell.clone());
        cell
    }

    /// The named cell, if defined.
    #[must_use]
    pub fn cell(&self, name: &str) -> Option<Binding<Value>> {
        self.cells.borrow().get(name).cloned()
    }

    /// Every `(name, value)` pair dumped so far, in dump order.
    #[must_use]
    pub fn dump_log(&self) -> Vec<(String, Value)> {
        self.dump_log.borrow().clone()
    }

    /// Names of cells that have been dumped at least once.
    #[must_use]
    pub fn dump_filters(&self) -> Vec<String> {
        let mut names: Vec<_> = self.filters.borrow().iter().cloned().collect();
        names.sort();
        names
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
