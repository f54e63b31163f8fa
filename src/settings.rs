//! Application settings and the shared process-wide store.
//!
//! An application declares configuration in a [`SettingsNamespace`]. At
//! install time every constant-like entry (a name that is entirely
//! upper-case) is propagated into one process-wide store, where rules and
//! serializers can read it later through [`get`].
//!
//! The store is written once per application load and read thereafter. The
//! last-loaded application wins on colliding names; concurrent installs are
//! not coordinated here and must be serialized by the caller.

use std::collections::BTreeMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use crate::encoding;

/// A configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
    /// Raw bytes of unknown encoding; decoded to [`SettingValue::Text`]
    /// during propagation.
    Bytes(Vec<u8>),
}

/// The settings an application ships with, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct SettingsNamespace {
    entries: Vec<(String, SettingValue)>,
}

impl SettingsNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: SettingValue) -> Self {
        self.entries.push((name.into(), value));
        self
    }

    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, SettingValue::Text(value.into()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

static SHARED: Lazy<RwLock<BTreeMap<String, SettingValue>>> =
    Lazy::new(|| RwLock::new(BTreeMap::new()));

/// Read a value from the shared store.
pub fn get(name: &str) -> Option<SettingValue> {
    let shared = SHARED.read().unwrap_or_else(|poisoned| poisoned.into_inner());
    shared.get(name).cloned()
}

/// Snapshot the whole shared store (diagnostics and tests).
pub fn snapshot() -> BTreeMap<String, SettingValue> {
    let shared = SHARED.read().unwrap_or_else(|poisoned| poisoned.into_inner());
    shared.clone()
}

/// Copy every constant-like entry of `namespace` into the shared store.
///
/// A name qualifies when it equals its own upper-casing, so `FOO` and
/// `FOO_BAR2` are propagated while `_private` and `Mixed` are not. Textual
/// values pass through encoding canonicalization on the way in; byte values
/// are flexible-decoded to text.
pub(crate) fn propagate(namespace: &SettingsNamespace) {
    let mut shared = SHARED.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    for (name, value) in namespace.iter() {
        if name.is_empty() || name != name.to_uppercase() {
            continue;
        }
        let value = match value {
            SettingValue::Text(text) => {
                SettingValue::Text(encoding::canonicalize(text).into_owned())
            }
            SettingValue::Bytes(bytes) => {
                let text = encoding::flexible_decode(bytes);
                SettingValue::Text(encoding::canonicalize(&text).into_owned())
            }
            other => other.clone(),
        };
        shared.insert(name.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn propagates_only_upper_case_names() {
        let namespace = SettingsNamespace::new()
            .text("PROP_FOO", "bar")
            .set("_private", SettingValue::Integer(1))
            .text("MixedCase", "nope");
        propagate(&namespace);

        assert_eq!(get("PROP_FOO"), Some(SettingValue::Text("bar".into())));
        assert_eq!(get("_private"), None);
        assert_eq!(get("MixedCase"), None);
    }

    #[test]
    fn last_load_wins() {
        propagate(&SettingsNamespace::new().text("PROP_WINNER", "first"));
        propagate(&SettingsNamespace::new().text("PROP_WINNER", "second"));
        assert_eq!(get("PROP_WINNER"), Some(SettingValue::Text("second".into())));
    }

    #[test]
    fn bytes_are_decoded_and_text_canonicalized() {
        let namespace = SettingsNamespace::new()
            .set("PROP_RAW", SettingValue::Bytes(b"caf\xe9".to_vec()))
            .text("PROP_CRLF", "a\r\nb");
        propagate(&namespace);

        assert_eq!(get("PROP_RAW"), Some(SettingValue::Text("café".into())));
        assert_eq!(get("PROP_CRLF"), Some(SettingValue::Text("a\nb".into())));
    }
}
