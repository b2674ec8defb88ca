#![forbid(unsafe_code)]

//! Hook installation: turning registry entries into intercepted methods.
//!
//! [`install_hooks`] resolves every registry entry against the host
//! adapter's [`SetterTable`], wraps each resolved original first in the
//! validity guard and then in a [`MethodHook`], and collects the result
//! into a frozen [`HookSet`]. An entry whose class or method cannot be
//! resolved is logged and skipped; the remaining entries install normally,
//! so one bad configuration entry cannot block startup.
//!
//! [`HookEngine`] bundles the installed set with the tracker and scheduler
//! and is the single call-time entry point. It is built once at startup.

use std::rc::Rc;

use ahash::AHashMap;

use tether_reactive::Tracker;

use crate::error::HookError;
use crate::host::{HostObject, SetterFn, SetterTable};
use crate::interceptor::{MethodHook, SetterArg};
use crate::registry::HookRegistry;
use crate::sched::Scheduler;

/// Wrap a setter in the defensive validity guard.
///
/// The guarded setter never calls into a destroyed target: an invalid
/// target, or an error positively classified as a destroyed-target
/// condition, yields a successful no-op. Unrecognized errors pass through.
#[must_use]
pub fn guard_setter(inner: SetterFn) -> SetterFn {
    Rc::new(move |target: &dyn HostObject, value: &crate::value::Value| {
        if !target.is_valid() {
            tracing::debug!(class = target.class_path(), "setter skipped: target destroyed");
            return Ok(());
        }
        match inner(target, value) {
            Err(err) if err.is_destroyed() => {
                tracing::debug!(class = target.class_path(), "setter no-op: target destroyed mid-call");
                Ok(())
            }
            other => other,
        }
    })
}

/// The installed, frozen collection of intercepted methods.
///
/// Nested class → method maps so a call-time lookup borrows its keys
/// instead of allocating.
#[derive(Default)]
pub struct HookSet {
    classes: AHashMap<String, AHashMap<String, Rc<MethodHook>>>,
}

impl HookSet {
    /// The intercepted method for `class.method`, if installed.
    #[must_use]
    pub fn get(&self, class: &str, method: &str) -> Option<&Rc<MethodHook>> {
        self.classes.get(class)?.get(method)
    }

    /// Number of installed hooks across all classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.values().map(|methods| methods.len()).sum()
    }

    /// Whether nothing was installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        // Installation never inserts a class without at least one hook.
        self.classes.is_empty()
    }
}

/// Resolve every registry entry against the setter table and install the
/// intercepted methods. Unresolvable entries are reported and skipped.
#[must_use]
pub fn install_hooks(registry: &HookRegistry, setters: &SetterTable) -> HookSet {
    let mut classes: AHashMap<String, AHashMap<String, Rc<MethodHook>>> = AHashMap::new();

    for (class, method, entry) in registry.iter() {
        let Some(original) = setters.resolve(class, method) else {
            tracing::warn!(class, method, "hook entry skipped: no such setter");
            continue;
        };
        classes.entry(class.to_string()).or_default().insert(
            method.to_string(),
            Rc::new(MethodHook::new(guard_setter(original), entry.clone())),
        );
    }

    let set = HookSet { classes };
    tracing::debug!(installed = set.len(), "hook installation complete");
    set
}

/// The assembled binding engine: tracker, scheduler, and installed hooks.
pub struct HookEngine {
    tracker: Tracker,
    scheduler: Rc<dyn Scheduler>,
    hooks: HookSet,
}

impl HookEngine {
    /// Install hooks and assemble the engine. Called once at startup.
    #[must_use]
    pub fn new(
        registry: &HookRegistry,
        setters: &SetterTable,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            tracker: Tracker::new(),
            scheduler,
            hooks: install_hooks(registry, setters),
        }
    }

    /// The engine's tracking context.
    #[must_use]
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// The engine's deferred-execution primitive.
    #[must_use]
    pub fn scheduler(&self) -> &Rc<dyn Scheduler> {
        &self.scheduler
    }

    /// The installed hooks.
    #[must_use]
    pub fn hooks(&self) -> &HookSet {
        &self.hooks
    }

    /// Invoke the intercepted `class.method` on `target`.
    pub fn invoke(
        &self,
        class: &str,
        method: &str,
        target: &Rc<dyn HostObject>,
        arg: SetterArg,
    ) -> Result<(), HookError> {
        let hook = self
            .hooks
            .get(class, method)
            .ok_or_else(|| HookError::UnknownHook {
                class: class.to_string(),
                method: method.to_string(),
            })?;
        hook.invoke(target, &self.tracker, &self.scheduler, arg)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::config::{HookConfig, MethodFlags};
    use crate::error::HostError;
    use crate::host::{ClassMeta, SignalSlot, ToolkitMeta};
    use crate::value::Value;

    struct FakeToolkit(Vec<ClassMeta>);

    impl ToolkitMeta for FakeToolkit {
        fn classes(&self) -> Vec<ClassMeta> {
            self.0.clone()
        }
    }

    struct Target {
        valid: std::cell::Cell<bool>,
        log: RefCell<Vec<Value>>,
    }

    impl Target {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                valid: std::cell::Cell::new(true),
                log: RefCell::new(Vec::new()),
            })
        }
    }

    impl HostObject for Target {
        fn class_path(&self) -> &str {
            "widgets.Label"
        }
        fn is_valid(&self) -> bool {
            self.valid.get()
        }
        fn property(&self, _name: &str) -> Option<Value> {
            None
        }
        fn set_property(&self, _name: &str, value: Value) -> Result<(), HostError> {
            self.log.borrow_mut().push(value);
            Ok(())
        }
        fn connect_signal(&self, name: &str, _slot: SignalSlot) -> Result<(), HostError> {
            Err(HostError::UnknownSignal { name: name.into() })
        }
    }

    fn label_registry() -> HookRegistry {
        let toolkit = FakeToolkit(vec![ClassMeta {
            path: "widgets.Label".into(),
            methods: vec!["setText".into()],
            properties: vec![],
        }]);
        let config =
            HookConfig::new().with_method("widgets.Label", "setText", MethodFlags::default());
        HookRegistry::build(&config, &toolkit)
    }

    fn label_setters() -> SetterTable {
        let mut table = SetterTable::new();
        table.register("widgets.Label", "setText", |target, value| {
            target.set_property("text", Value::Str(value.to_string()))
        });
        table
    }

    #[test]
    fn resolved_entries_install() {
        let hooks = install_hooks(&label_registry(), &label_setters());
        assert_eq!(hooks.len(), 1);
        assert!(hooks.get("widgets.Label", "setText").is_some());
    }

    #[test]
    fn unresolved_entries_are_skipped_without_raising() {
        // Registry names a setter the table does not provide.
        let registry = label_registry();
        let empty = SetterTable::new();

        let hooks = install_hooks(&registry, &empty);
        assert!(hooks.is_empty());
    }

    #[test]
    fn one_bad_entry_leaves_the_rest_patched() {
        let toolkit = FakeToolkit(vec![
            ClassMeta {
                path: "widgets.Label".into(),
                methods: vec!["setText".into()],
                properties: vec![],
            },
            ClassMeta {
                path: "widgets.Phantom".into(),
                methods: vec!["setGhost".into()],
                properties: vec![],
            },
        ]);
        let config = HookConfig::new()
            .with_method("widgets.Label", "setText", MethodFlags::default())
            .with_method("widgets.Phantom", "setGhost", MethodFlags::default());
        let registry = HookRegistry::build(&config, &toolkit);

        let hooks = install_hooks(&registry, &label_setters());
        assert_eq!(hooks.len(), 1);
        assert!(hooks.get("widgets.Label", "setText").is_some());
        assert!(hooks.get("widgets.Phantom", "setGhost").is_none());
    }

    #[test]
    fn hooks_across_classes_count_and_resolve() {
        let toolkit = FakeToolkit(vec![
            ClassMeta {
                path: "widgets.Label".into(),
                methods: vec!["setText".into()],
                properties: vec![],
            },
            ClassMeta {
                path: "widgets.Slider".into(),
                methods: vec!["setValue".into()],
                properties: vec!["value".into()],
            },
        ]);
        let config = HookConfig::new()
            .with_method("widgets.Label", "setText", MethodFlags::default())
            .with_method("widgets.Slider", "setValue", MethodFlags::default());
        let registry = HookRegistry::build(&config, &toolkit);

        let mut setters = label_setters();
        setters.register("widgets.Slider", "setValue", |target, value| {
            target.set_property("value", value.clone())
        });

        let hooks = install_hooks(&registry, &setters);
        assert_eq!(hooks.len(), 2);
        assert!(!hooks.is_empty());
        assert!(hooks.get("widgets.Label", "setText").is_some());
        assert!(hooks.get("widgets.Slider", "setValue").is_some());
        assert!(hooks.get("widgets.Slider", "setText").is_none());
    }

    #[test]
    fn guard_skips_invalid_target() {
        let target = Target::new();
        let guarded = guard_setter(Rc::new(|target: &dyn HostObject, value: &Value| {
            target.set_property("text", value.clone())
        }));

        target.valid.set(false);
        guarded(target.as_ref(), &Value::Int(1)).unwrap();
        assert!(target.log.borrow().is_empty());
    }

    #[test]
    fn guard_converts_destroyed_error_to_noop() {
        let target = Target::new();
        let guarded = guard_setter(Rc::new(|_t: &dyn HostObject, _v: &Value| {
            Err(HostError::backend("widget already deleted"))
        }));

        guarded(target.as_ref(), &Value::Int(1)).unwrap();
    }

    #[test]
    fn guard_propagates_unrecognized_errors() {
        let target = Target::new();
        let guarded = guard_setter(Rc::new(|_t: &dyn HostObject, _v: &Value| {
            Err(HostError::backend("out of memory"))
        }));

        assert!(guarded(target.as_ref(), &Value::Int(1)).is_err());
    }

    #[test]
    fn engine_invoke_dispatches_to_installed_hook() {
        let engine = HookEngine::new(
            &label_registry(),
            &label_setters(),
            Rc::new(crate::sched::QueueScheduler::new()),
        );
        let target = Target::new();
        let as_host: Rc<dyn HostObject> = target.clone();

        engine
            .invoke("widgets.Label", "setText", &as_host, SetterArg::value(1))
            .unwrap();
        assert_eq!(*target.log.borrow(), vec![Value::Str("1".into())]);
    }

    #[test]
    fn engine_invoke_unknown_hook_errors() {
        let engine = HookEngine::new(
            &label_registry(),
            &label_setters(),
            Rc::new(crate::sched::QueueScheduler::new()),
        );
        let target = Target::new();
        let as_host: Rc<dyn HostObject> = target;

        let err = engine
            .invoke("widgets.Dial", "setValue", &as_host, SetterArg::value(1))
            .unwrap_err();
        assert!(matches!(err, HookError::UnknownHook { .. }));
    }
}
