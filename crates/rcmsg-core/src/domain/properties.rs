//! Looked-up property values and the per-variant field contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::FetchFailure;

/// Property values returned by a client lookup, keyed by property name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, serde_json::Value>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: serde_json::Value) {
        self.0.insert(name.into(), value);
    }

    pub fn with(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, serde_json::Value)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, serde_json::Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Properties {
    type Item = (String, serde_json::Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, serde_json::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Top-level names a serialized message already uses for its own fields.
pub const RESERVED_FIELDS: &[&str] = &[
    "raw",
    "type",
    "error",
    "errmsg",
    "errdetails",
    "retries",
    "_cached",
];

/// Whether a looked-up property may sit next to the message's own fields.
///
/// `_`-prefixed names are internal; they are only shown when they hold text.
fn is_publishable(name: &str, value: &serde_json::Value) -> bool {
    if RESERVED_FIELDS.contains(&name) {
        return false;
    }
    !name.starts_with('_') || value.is_string()
}

/// Public field set of one message variant.
///
/// Each variant declares its fields as a plain struct; the derived
/// `Serialize` impl is flattened into the message's serialized view, so
/// nothing is discovered at runtime.
///
/// # Trait Bounds
/// - `Serialize`: flattened into [`MessageView`](crate::message::MessageView)
/// - `Clone`: a lookup is applied to a copy and kept only if it all fits
/// - `Default`: a freshly parsed message starts with empty details
/// - `Send + Sync + 'static`: messages move between worker tasks
pub trait Details: Serialize + Clone + Default + Send + Sync + 'static {
    /// Fold looked-up properties into the variant's fields.
    fn apply(&mut self, properties: Properties) -> Result<(), FetchFailure>;
}

/// The untyped variant: looked-up properties are kept as-is, except names
/// that would shadow the message's own serialized fields.
impl Details for Properties {
    fn apply(&mut self, properties: Properties) -> Result<(), FetchFailure> {
        for (name, value) in properties {
            if is_publishable(&name, &value) {
                self.0.insert(name, value);
            } else {
                debug!(property = %name, "dropping property that shadows a message field");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn properties_apply_merges_values() {
        let mut details = Properties::new().with("title", json!("Page"));
        details
            .apply(Properties::new().with("diffSize", json!(42)))
            .unwrap();

        assert_eq!(details.len(), 2);
        assert_eq!(details.get("diffSize"), Some(&json!(42)));
    }

    #[rstest]
    #[case::base_field("error", json!(false))]
    #[case::type_tag("type", json!("log"))]
    #[case::retry_count("retries", json!(7))]
    #[case::cache_slot("_cached", json!("text"))]
    #[case::internal_list("_properties", json!(["x"]))]
    #[case::internal_object("_client", json!({"name": "x"}))]
    fn properties_apply_drops_shadowing_names(
        #[case] name: &str,
        #[case] value: serde_json::Value,
    ) {
        let mut details = Properties::new();
        details
            .apply(Properties::new().with(name, value).with("diffSize", json!(3)))
            .unwrap();

        assert_eq!(details.get(name), None);
        assert_eq!(details.get("diffSize"), Some(&json!(3)));
    }

    #[test]
    fn properties_apply_keeps_internal_text() {
        let mut details = Properties::new();
        details
            .apply(Properties::new().with("_note", json!("from cache")))
            .unwrap();
        assert_eq!(details.get("_note"), Some(&json!("from cache")));
    }

    #[test]
    fn properties_serialize_as_flat_object() {
        let props = Properties::new()
            .with("b", json!(2))
            .with("a", json!(1));
        // BTreeMap keeps key order deterministic.
        assert_eq!(serde_json::to_string(&props).unwrap(), r#"{"a":1,"b":2}"#);
    }
}
