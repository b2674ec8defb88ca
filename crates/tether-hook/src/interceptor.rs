#![forbid(unsafe_code)]

//! Setter interception: recognizing bind sources and keeping them live.
//!
//! [`MethodHook`] wraps one original setter together with its binding
//! options. Invoking it with a plain [`Value`] is a transparent
//! pass-through. Invoking it with a [`BindSrc`] performs, in order:
//!
//! 1. One evaluation inside a fresh tracking scope — the initial value
//!    plus the set of cells the source reads.
//! 2. A resync subscription on every discovered cell: any future mutation
//!    re-evaluates the source untracked and re-applies the original setter
//!    to the same target.
//! 3. Reverse-path wiring (widget → state) when the options declare an
//!    updater signal, a read-back key exists, exactly one cell was
//!    discovered, and the source is a direct single-variable read.
//! 4. One immediate invocation of the original setter with the initial
//!    value, so the widget reflects starting state.
//!
//! Each `invoke` creates independent subscriptions; none are dropped.
//!
//! # Failure Modes
//!
//! - **Destroyed target**: the original setter arrives here already
//!   wrapped in the validity guard (see [`crate::install::guard_setter`]),
//!   so destroyed-target conditions surface as successful no-ops.
//! - **Resync errors**: a subscriber callback has no error channel back to
//!   the caller; non-benign resync failures are logged at error level.
//! - **Reverse wiring errors**: destroyed-target conditions skip the
//!   reverse path silently; anything else propagates from `invoke`.

use std::rc::Rc;

use tether_reactive::{BindSrc, Binding, TrackCx, Tracker};

use crate::cursor;
use crate::error::HookError;
use crate::host::{HostObject, SetterFn};
use crate::registry::HookEntry;
use crate::sched::Scheduler;
use crate::value::Value;

/// The argument of an intercepted setter call.
#[derive(Debug, Clone)]
pub enum SetterArg {
    /// A plain value: pass straight through to the original setter.
    Value(Value),
    /// A bind source: establish a live binding.
    Bind(BindSrc<Value>),
}

impl SetterArg {
    /// A plain value argument.
    #[must_use]
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    /// A computed-expression bind source.
    #[must_use]
    pub fn bind(f: impl Fn(&TrackCx) -> Value + 'static) -> Self {
        Self::Bind(BindSrc::expr(f))
    }

    /// A direct single-cell bind source (two-way eligible).
    #[must_use]
    pub fn bind_cell(cell: &Binding<Value>) -> Self {
        Self::Bind(BindSrc::cell(cell))
    }
}

/// An intercepted bound method: the original setter plus binding options.
///
/// Does not own the targets it is invoked on.
pub struct MethodHook {
    original: SetterFn,
    options: HookEntry,
}

impl MethodHook {
    #[must_use]
    pub fn new(original: SetterFn, options: HookEntry) -> Self {
        Self { original, options }
    }

    /// The binding options bound at wrap time.
    #[must_use]
    pub fn options(&self) -> &HookEntry {
        &self.options
    }

    /// Invoke the intercepted method on `target`.
    pub fn invoke(
        &self,
        target: &Rc<dyn HostObject>,
        tracker: &Tracker,
        scheduler: &Rc<dyn Scheduler>,
        arg: SetterArg,
    ) -> Result<(), HookError> {
        match arg {
            SetterArg::Value(value) => (self.original)(target.as_ref(), &value).map_err(Into::into),
            SetterArg::Bind(src) => self.bind(target, tracker, scheduler, &src),
        }
    }

    fn bind(
        &self,
        target: &Rc<dyn HostObject>,
        tracker: &Tracker,
        scheduler: &Rc<dyn Scheduler>,
        src: &BindSrc<Value>,
    ) -> Result<(), HookError> {
        let (initial, deps) = src.discover(tracker);
        tracing::debug!(
            class = target.class_path(),
            dependencies = deps.len(),
            "setter bound"
        );

        // Resync: any dependency mutation re-applies the setter with a
        // freshly computed value.
        for dep in deps.iter() {
            let original = Rc::clone(&self.original);
            let target = Rc::clone(target);
            let scheduler = Rc::clone(scheduler);
            let src = src.clone();
            let preserve_cursor = self.options.preserve_cursor;
            dep.connect_changed(Rc::new(move || {
                let value = src.eval_untracked();
                let result = if preserve_cursor {
                    cursor::call_preserving_cursor(&original, &target, &scheduler, &value)
                } else {
                    original(target.as_ref(), &value)
                };
                if let Err(err) = result {
                    if err.is_destroyed() {
                        tracing::debug!(class = target.class_path(), "resync on destroyed target");
                    } else {
                        tracing::error!(class = target.class_path(), error = %err, "resync failed");
                    }
                }
            }));
        }

        self.wire_reverse(target, scheduler, src, deps.len())?;

        (self.original)(target.as_ref(), &initial).map_err(Into::into)
    }

    /// Wire the widget → state path, when every gate passes:
    /// updater declared, read-back key available, exactly one dependency,
    /// and a direct single-variable source.
    fn wire_reverse(
        &self,
        target: &Rc<dyn HostObject>,
        scheduler: &Rc<dyn Scheduler>,
        src: &BindSrc<Value>,
        dependency_count: usize,
    ) -> Result<(), HookError> {
        let Some(updater) = self.options.updater.as_deref() else {
            return Ok(());
        };
        let read_back = self
            .options
            .getter
            .as_deref()
            .or(self.options.property.as_deref());
        let Some(read_back) = read_back else {
            return Ok(());
        };
        if dependency_count != 1 {
            return Ok(());
        }
        let BindSrc::Cell(cell) = src else {
            return Ok(());
        };

        let slot_target = Rc::clone(target);
        let slot_cell = cell.clone();
        let key = read_back.to_string();
        let slot = Rc::new(move |_payload: &Value| {
            if !slot_target.is_valid() {
                return;
            }
            if let Some(value) = slot_target.property(&key) {
                slot_cell.set(value);
            }
        });

        match target.connect_signal(updater, slot) {
            Ok(()) => {}
            Err(err) if err.is_destroyed() => return Ok(()),
            Err(err) => return Err(err.into()),
        }
        tracing::debug!(
            class = target.class_path(),
            signal = updater,
            "reverse binding wired"
        );

        // One-time persisted-state dump once the initial binding settles.
        let dump_cell = cell.clone();
        scheduler.schedule(Box::new(move || dump_cell.dump()));
        Ok(())
    }
}

/// The free-function interceptor variant: no target, no reverse path, no
/// cursor handling.
pub struct FnHook {
    original: Rc<dyn Fn(&Value)>,
}

impl FnHook {
    #[must_use]
    pub fn new(original: impl Fn(&Value) + 'static) -> Self {
        Self {
            original: Rc::new(original),
        }
    }

    /// Invoke the wrapped function: pass-through for plain values, live
    /// binding for bind sources.
    pub fn invoke(&self, tracker: &Tracker, arg: SetterArg) {
        match arg {
            SetterArg::Value(value) => (self.original)(&value),
            SetterArg::Bind(src) => {
                let (initial, deps) = src.discover(tracker);
                for dep in deps.iter() {
                    let original = Rc::clone(&self.original);
                    let src = src.clone();
                    dep.connect_changed(Rc::new(move || original(&src.eval_untracked())));
                }
                (self.original)(&initial);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
