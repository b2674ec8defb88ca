#![forbid(unsafe_code)]

//! The host toolkit capability surface.
//!
//! The binding engine never talks to a concrete widget type. It sees the
//! toolkit through three seams:
//!
//! - [`HostObject`]: one live widget — validity, property access, signal
//!   connection.
//! - [`ToolkitMeta`]: static class metadata (declared methods and
//!   properties) the registry builder introspects at startup.
//! - [`SetterTable`]: the host adapter's table of original setter
//!   functions, which installation resolves hook entries against.

use std::rc::Rc;

use ahash::AHashMap;

use crate::error::HostError;
use crate::value::Value;

/// A signal subscriber: receives the signal payload.
pub type SignalSlot = Rc<dyn Fn(&Value)>;

/// One live widget, seen through the capability surface.
pub trait HostObject {
    /// The `"<Module>.<Class>"` path of this object's class.
    fn class_path(&self) -> &str;

    /// Whether the native object behind this handle is still alive.
    fn is_valid(&self) -> bool;

    /// Read a named property. `None` when the property does not exist or
    /// the object is no longer valid.
    fn property(&self, name: &str) -> Option<Value>;

    /// Write a named property.
    fn set_property(&self, name: &str, value: Value) -> Result<(), HostError>;

    /// Connect a slot to a named signal.
    fn connect_signal(&self, name: &str, slot: SignalSlot) -> Result<(), HostError>;
}

/// Static metadata for one toolkit class.
#[derive(Debug, Clone)]
pub struct ClassMeta {
    /// `"<Module>.<Class>"` path.
    pub path: String,
    /// Declared method names.
    pub methods: Vec<String>,
    /// Declared (notifiable) property names.
    pub properties: Vec<String>,
}

/// Static class metadata exposed by the host toolkit.
pub trait ToolkitMeta {
    /// Every class eligible for hooking.
    fn classes(&self) -> Vec<ClassMeta>;
}

/// An original setter: applies one value to one target.
pub type SetterFn = Rc<dyn Fn(&dyn HostObject, &Value) -> Result<(), HostError>>;

/// The host adapter's table of original setters, keyed by class path and
/// method name.
#[derive(Default)]
pub struct SetterTable {
    entries: AHashMap<(String, String), SetterFn>,
}

impl SetterTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the original setter for `class.method`.
    pub fn register(
        &mut self,
        class: impl Into<String>,
        method: impl Into<String>,
        setter: impl Fn(&dyn HostObject, &Value) -> Result<(), HostError> + 'static,
    ) {
        self.entries
            .insert((class.into(), method.into()), Rc::new(setter));
    }

    /// Resolve the original setter for `class.method`, if registered.
    #[must_use]
    pub fn resolve(&self, class: &str, method: &str) -> Option<SetterFn> {
        self.entries
            .get(&(class.to_string(), method.to_string()))
            .map(Rc::clone)
    }

    /// Number of registered setters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no setters are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setter_table_registers_and_resolves() {
        let mut table = SetterTable::new();
        table.register("widgets.Label", "setText", |target, value| {
            target.set_property("text", Value::Str(value.to_string()))
        });

        assert_eq!(table.len(), 1);
        assert!(table.resolve("widgets.Label", "setText").is_some());
        assert!(table.resolve("widgets.Label", "setValue").is_none());
        assert!(table.resolve("widgets.Slider", "setText").is_none());
    }
}
