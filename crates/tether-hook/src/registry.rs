#![forbid(unsafe_code)]

//! The hook registry: config × toolkit metadata, assembled once.
//!
//! [`HookRegistry::build`] walks the toolkit's class metadata. Every
//! declared method with a configuration entry becomes a [`HookEntry`]
//! carrying the config flags. A merge pass then walks the class's declared
//! properties: property `x` implies the conventional setter name `setX`;
//! if that setter has an entry, the entry gains `updater = "xChanged"` and
//! `property = "x"`. Reverse binding is therefore available only for
//! properties whose setter follows the naming convention.
//!
//! The registry is read-only after construction.

use ahash::AHashMap;

use crate::config::HookConfig;
use crate::host::ToolkitMeta;

/// Binding options for one intercepted method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookEntry {
    /// Signal that announces widget-side changes of the bound property.
    /// `None` means one-way (state → widget) binding only.
    pub updater: Option<String>,
    /// Property whose value the updater signal conveys. Always present
    /// when `updater` is.
    pub property: Option<String>,
    /// Property key read back before `property` for the reverse path.
    pub getter: Option<String>,
    /// Preserve the text cursor position across resync invocations.
    pub preserve_cursor: bool,
}

/// Frozen mapping of class path → method name → [`HookEntry`].
#[derive(Debug, Default)]
pub struct HookRegistry {
    classes: AHashMap<String, AHashMap<String, HookEntry>>,
}

impl HookRegistry {
    /// Assemble the registry from the declarative table and the toolkit's
    /// class metadata.
    #[must_use]
    pub fn build(config: &HookConfig, toolkit: &dyn ToolkitMeta) -> Self {
        let mut classes: AHashMap<String, AHashMap<String, HookEntry>> = AHashMap::new();

        for class in toolkit.classes() {
            let mut methods: AHashMap<String, HookEntry> = AHashMap::new();

            for method in &class.methods {
                if let Some(flags) = config.method(&class.path, method) {
                    methods.insert(
                        method.clone(),
                        HookEntry {
                            getter: flags.getter.clone(),
                            preserve_cursor: flags.preserve_cursor,
                            ..HookEntry::default()
                        },
                    );
                }
            }

            // Property merge: "property x" ⇄ "setter setX".
            for property in &class.properties {
                let setter = setter_name(property);
                if let Some(entry) = methods.get_mut(&setter) {
                    entry.updater = Some(format!("{property}Changed"));
                    entry.property = Some(property.clone());
                }
            }

            if !methods.is_empty() {
                classes.insert(class.path.clone(), methods);
            }
        }

        Self { classes }
    }

    /// The entry for `class.method`, if any.
    #[must_use]
    pub fn entry(&self, class: &str, method: &str) -> Option<&HookEntry> {
        self.classes.get(class)?.get(method)
    }

    /// Every `(class path, method name, entry)` triple.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &HookEntry)> {
        self.classes.iter().flat_map(|(class, methods)| {
            methods
                .iter()
                .map(move |(method, entry)| (class.as_str(), method.as_str(), entry))
        })
    }

    /// Number of entries across all classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.values().map(|methods| methods.len()).sum()
    }

    /// Whether the registry holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Conventional setter name for a property: `set` + upper-cased first
/// character.
pub(crate) fn setter_name(property: &str) -> String {
    let mut chars = property.chars();
    match chars.next() {
        Some(first) => format!("set{}{}", first.to_uppercase(), chars.as_str()),
        None => String::from("set"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
