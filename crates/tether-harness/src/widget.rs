#![forbid(unsafe_code)]

//! In-memory widgets implementing the host capability surface.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ahash::AHashMap;

use tether_hook::{ClassMeta, HostError, HostObject, SetterTable, SignalSlot, ToolkitMeta, Value};

/// An in-memory widget: properties, signals, and a validity flag.
pub struct MockWidget {
    class: String,
    valid: Cell<bool>,
    properties: RefCell<AHashMap<String, Value>>,
    /// Declared signals and their connected slots.
    signals: RefCell<AHashMap<String, Vec<SignalSlot>>>,
}

impl MockWidget {
    /// A widget of `class` with the given initial properties and declared
    /// signals.
    #[must_use]
    pub fn new(class: &str, properties: &[(&str, Value)], signals: &[&str]) -> Rc<Self> {
        Rc::new(Self {
            class: class.to_string(),
            valid: Cell::new(true),
            properties: RefCell::new(
                properties
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.clone()))
                    .collect(),
            ),
            signals: RefCell::new(signals.iter().map(|s| (s.to_string(), Vec::new())).collect()),
        })
    }

    /// A `widgets.Label` with a `text` property and no signals.
    #[must_use]
    pub fn label() -> Rc<Self> {
        Self::new("widgets.Label", &[("text", Value::Str(String::new()))], &[])
    }

    /// A `widgets.LineEdit` with `text` / `cursorPosition` properties and a
    /// `textChanged` signal.
    #[must_use]
    pub fn line_edit() -> Rc<Self> {
        Self::new(
            "widgets.LineEdit",
            &[
                ("text", Value::Str(String::new())),
                ("cursorPosition", Value::Int(0)),
            ],
            &["textChanged"],
        )
    }

    /// A `widgets.Slider` with a `value` property and a `valueChanged`
    /// signal.
    #[must_use]
    pub fn slider() -> Rc<Self> {
        Self::new("widgets.Slider", &[("value", Value::Int(0))], &["valueChanged"])
    }

    /// A `widgets.CheckBox` with a `checked` property and a
    /// `checkedChanged` signal.
    #[must_use]
    pub fn check_box() -> Rc<Self> {
        Self::new(
            "widgets.CheckBox",
            &[("checked", Value::Bool(false))],
            &["checkedChanged"],
        )
    }

    /// Simulate native-object destruction.
    pub fn destroy(&self) {
        self.valid.set(false);
    }

    /// Emit a declared signal to every connected slot.
    pub fn emit(&self, signal: &str, payload: &Value) {
        let slots = self
            .signals
            .borrow()
            .get(signal)
            .cloned()
            .unwrap_or_default();
        for slot in slots {
            slot(payload);
        }
    }

    /// Simulate a user-driven change: store the property, then emit
    /// `<property>Changed` with the new value.
    pub fn user_edit(&self, property: &str, value: Value) {
        self.properties
            .borrow_mut()
            .insert(property.to_string(), value.clone());
        self.emit(&format!("{property}Changed"), &value);
    }

    /// Read a property directly, bypassing the validity check.
    #[must_use]
    pub fn raw_property(&self, name: &str) -> Option<Value> {
        self.properties.borrow().get(name).cloned()
    }
}

impl HostObject for MockWidget {
    fn class_path(&self) -> &str {
        &self.class
    }

    fn is_valid(&self) -> bool {
        self.valid.get()
    }

    fn property(&self, name: &str) -> Option<Value> {
        if !self.valid.get() {
            return None;
        }
        self.properties.borrow().get(name).cloned()
    }

    fn set_property(&self, name: &str, value: Value) -> Result<(), HostError> {
        if !self.valid.get() {
            return Err(HostError::destroyed(format!(
                "{}: object destroyed",
                self.class
            )));
        }
        self.properties.borrow_mut().insert(name.to_string(), value);
        Ok(())
    }

    fn connect_signal(&self, name: &str, slot: SignalSlot) -> Result<(), HostError> {
        if !self.valid.get() {
            return Err(HostError::destroyed(format!(
                "{}: object destroyed",
                self.class
            )));
        }
        match self.signals.borrow_mut().get_mut(name) {
            Some(slots) => {
                slots.push(slot);
                Ok(())
            }
            None => Err(HostError::UnknownSignal { name: name.into() }),
        }
    }
}

/// Metadata and original setters for the mock widget set.
///
/// The Label declares no notifiable properties (its text has no change
/// signal), so `setText` on a Label never gains an updater; LineEdit,
/// Slider, and CheckBox follow the `property x ⇄ setter setX` convention
/// and do.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockToolkit;

impl MockToolkit {
    /// Original setters for every hookable method of the mock set.
    #[must_use]
    pub fn setters() -> SetterTable {
        let mut table = SetterTable::new();
        // Labels render any payload as text.
        table.register("widgets.Label", "setText", |target, value| {
            target.set_property("text", Value::Str(value.to_string()))
        });
        table.register("widgets.LineEdit", "setText", |target, value| {
            target.set_property("text", Value::Str(value.to_string()))
        });
        table.register("widgets.Slider", "setValue", |target, value| {
            target.set_property("value", value.clone())
        });
        // Check boxes coerce non-boolean payloads to unchecked.
        table.register("widgets.CheckBox", "setChecked", |target, value| {
            target.set_property("checked", Value::Bool(value.as_bool().unwrap_or(false)))
        });
        table
    }
}

impl ToolkitMeta for MockToolkit {
    fn classes(&self) -> Vec<ClassMeta> {
        vec![
            ClassMeta {
                path: "widgets.Label".into(),
                methods: vec!["setText".into()],
                properties: vec![],
            },
            ClassMeta {
                path: "widgets.LineEdit".into(),
                methods: vec!["setText".into(), "setCursorPosition".into()],
                properties: vec!["text".into()],
            },
            ClassMeta {
                path: "widgets.Slider".into(),
                methods: vec!["setValue".into(), "setRange".into()],
                properties: vec!["value".into()],
            },
            ClassMeta {
                path: "widgets.CheckBox".into(),
                methods: vec!["setChecked".into()],
                properties: vec!["checked".into()],
            },
        ]
    }
}
