//! Long-term profile store.

use crate::models::Record;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Durable per-entity derived facts.
///
/// Profiles are merged on write and never deleted.
#[derive(Debug, Default)]
pub struct LongTermMemory {
    profiles: RwLock<HashMap<String, Record>>,
}

impl LongTermMemory {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `profile` into the stored profile for `id`.
    ///
    /// Keys present in `profile` overwrite; keys absent from it are kept.
    pub fn upsert_profile(&self, id: &str, profile: Record) {
        let mut profiles = self
            .profiles
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let stored = profiles.entry(id.to_string()).or_default();
        for (key, value) in profile {
            stored.insert(key, value);
        }
    }

    /// Returns the profile for `id`, or an empty mapping.
    #[must_use]
    pub fn get_profile(&self, id: &str) -> Record {
        self.profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the number of stored profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no profile is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_unknown_id_is_empty() {
        let ltm = LongTermMemory::new();
        assert!(ltm.get_profile("ghost").is_empty());
    }

    #[test]
    fn test_disjoint_upserts_union() {
        let ltm = LongTermMemory::new();
        ltm.upsert_profile("L1", record(json!({"label": "Cold Lead"})));
        ltm.upsert_profile("L1", record(json!({"owner": "sam"})));

        let profile = ltm.get_profile("L1");
        assert_eq!(profile["label"], json!("Cold Lead"));
        assert_eq!(profile["owner"], json!("sam"));
    }

    #[test]
    fn test_overlapping_upsert_overwrites() {
        let ltm = LongTermMemory::new();
        ltm.upsert_profile("L1", record(json!({"score": 10, "label": "Cold Lead"})));
        ltm.upsert_profile("L1", record(json!({"score": 75})));

        let profile = ltm.get_profile("L1");
        assert_eq!(profile["score"], json!(75));
        assert_eq!(profile["label"], json!("Cold Lead"));
        assert_eq!(ltm.len(), 1);
    }

    #[test]
    fn test_returned_profile_is_a_copy() {
        let ltm = LongTermMemory::new();
        ltm.upsert_profile("L1", record(json!({"score": 10})));
        let mut copy = ltm.get_profile("L1");
        copy.insert("score".to_string(), json!(99));
        assert_eq!(ltm.get_profile("L1")["score"], json!(10));
    }
}
