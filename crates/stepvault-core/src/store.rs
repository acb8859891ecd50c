//! Persistent key-value store mirrored into the step log.

use std::collections::BTreeMap;

use serde_json::Value;

/// Fixed header for the full-store rendering mirrored into log index 0.
pub const PERSISTENT_MEMORY_HEADER: &str = "PERSISTENT MEMORY:\n";

/// Session-lifetime key-value store. Last write wins; no eviction, no
/// size bound, no disk persistence. A BTreeMap keeps the mirrored
/// rendering deterministic across writes.
#[derive(Debug, Clone, Default)]
pub struct PersistentStore {
    entries: BTreeMap<String, Value>,
}

impl PersistentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `key -> value`, overwriting any prior value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    /// Stored value for `key`, if it was ever written. A missing key is
    /// an expected outcome, not an error.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Fixed-format rendering of the entire store, one `key = value`
    /// line per entry in key order under the `PERSISTENT MEMORY` header.
    pub fn render(&self) -> String {
        let mut out = String::from(PERSISTENT_MEMORY_HEADER);
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push_str(" = ");
            out.push_str(&value.to_string());
            out.push('\n');
        }
        out
    }
}
