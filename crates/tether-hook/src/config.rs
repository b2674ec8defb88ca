#![forbid(unsafe_code)]

//! The declarative hook configuration table.
//!
//! A [`HookConfig`] names which methods on which classes are eligible for
//! interception, keyed `"<Module>.<Class>"` → method name → per-method
//! flags. It is the only configuration surface of the engine: read once at
//! startup (from code via the builder, or from JSON), then handed to
//! [`HookRegistry::build`](crate::registry::HookRegistry::build) and never
//! consulted again.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-method interception flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodFlags {
    /// Preserve the text cursor position across resync invocations.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub preserve_cursor: bool,
    /// Property key read back for the reverse path, tried before the
    /// registry-derived property name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub getter: Option<String>,
}

/// Declarative hook table: class path → method name → flags.
///
/// Keys are `BTreeMap`s so iteration (and therefore registry construction)
/// is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HookConfig {
    classes: BTreeMap<String, BTreeMap<String, MethodFlags>>,
}

impl HookConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: mark `class.method` as hookable with the given flags.
    #[must_use]
    pub fn with_method(
        mut self,
        class: impl Into<String>,
        method: impl Into<String>,
        flags: MethodFlags,
    ) -> Self {
        self.classes
            .entry(class.into())
            .or_default()
            .insert(method.into(), flags);
        self
    }

    /// Flags for `class.method`, if configured.
    #[must_use]
    pub fn method(&self, class: &str, method: &str) -> Option<&MethodFlags> {
        self.classes.get(class)?.get(method)
    }

    /// Number of configured methods across all classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.values().map(BTreeMap::len).sum()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse a table from its JSON form:
    /// `{"widgets.Label": {"setText": {}}, ...}`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The default table covering common widget setters.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new()
            .with_method("widgets.Label", "setText", MethodFlags::default())
            .with_method(
                "widgets.LineEdit",
                "setText",
                MethodFlags {
                    preserve_cursor: true,
                    getter: None,
                },
            )
            .with_method("widgets.Slider", "setValue", MethodFlags::default())
            .with_method("widgets.SpinBox", "setValue", MethodFlags::default())
            .with_method("widgets.CheckBox", "setChecked", MethodFlags::default())
            .with_method("widgets.ProgressBar", "setValue", MethodFlags::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_lookup() {
        let config = HookConfig::new()
            .with_method("widgets.Label", "setText", MethodFlags::default())
            .with_method(
                "widgets.LineEdit",
                "setText",
                MethodFlags {
                    preserve_cursor: true,
                    getter: None,
                },
            );

        assert_eq!(config.len(), 2);
        assert!(config.method("widgets.Label", "setText").is_some());
        assert!(
            config
                .method("widgets.LineEdit", "setText")
                .is_some_and(|flags| flags.preserve_cursor)
        );
        assert!(config.method("widgets.Label", "setValue").is_none());
    }

    #[test]
    fn json_roundtrip() {
        let json = r#"
        {
            "widgets.Slider": { "setValue": {} },
            "widgets.LineEdit": { "setText": { "preserve_cursor": true } }
        }
        "#;
        let config = HookConfig::from_json(json).unwrap();
        assert_eq!(config.len(), 2);
        assert!(
            config
                .method("widgets.LineEdit", "setText")
                .is_some_and(|flags| flags.preserve_cursor)
        );

        let reparsed =
            HookConfig::from_json(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn builtin_covers_core_setters() {
        let config = HookConfig::builtin();
        assert!(config.method("widgets.Label", "setText").is_some());
        assert!(config.method("widgets.Slider", "setValue").is_some());
        assert!(
            config
                .method("widgets.LineEdit", "setText")
                .is_some_and(|flags| flags.preserve_cursor)
        );
    }
}
