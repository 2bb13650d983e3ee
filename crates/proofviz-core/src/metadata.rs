//! Open key/value attachment carried by every proof step.
//!
//! The upstream analyzer and validator attach whatever fields they like to a
//! node (`valid`, `critique`, ...). The layout core never looks inside the
//! bag; it only stores it and merges newer bags into older ones.

use indexmap::IndexMap;
use log::trace;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Insertion-ordered metadata bag.
///
/// # Examples
///
/// ```
/// use proofviz_core::metadata::Metadata;
/// use serde_json::json;
///
/// let mut stored = Metadata::new();
/// stored.insert("valid", json!(false));
/// stored.insert("critique", json!("missing case n = 0"));
///
/// let mut update = Metadata::new();
/// update.insert("valid", json!(true));
///
/// stored.merge(&update);
/// assert_eq!(stored.get("valid"), Some(&json!(true)));
/// assert_eq!(stored.get("critique"), Some(&json!("missing case n = 0")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(IndexMap<String, Value>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Shallow merge: keys in `incoming` overwrite, keys absent from
    /// `incoming` keep their stored value. Nested objects are replaced
    /// wholesale, not merged.
    pub fn merge(&mut self, incoming: &Metadata) {
        for (key, value) in &incoming.0 {
            trace!(key = key.as_str(); "Merging metadata key");
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Returns a new bag holding `self` merged with `incoming`.
    pub fn merged(&self, incoming: &Metadata) -> Self {
        let mut merged = self.clone();
        merged.merge(incoming);
        merged
    }
}

impl FromIterator<(String, Value)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<IndexMap<String, Value>> for Metadata {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self(map)
    }
}
