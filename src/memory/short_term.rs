//! Short-term context store.

use crate::models::Record;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Transient per-entity working state.
///
/// Writes replace the stored context wholesale; nothing expires.
#[derive(Debug, Default)]
pub struct ShortTermMemory {
    contexts: RwLock<HashMap<String, Record>>,
}

impl ShortTermMemory {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the context for `id`.
    pub fn set_context(&self, id: &str, context: Record) {
        self.contexts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), context);
    }

    /// Returns the context for `id`, or an empty mapping.
    #[must_use]
    pub fn get_context(&self, id: &str) -> Record {
        self.contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the number of entities with a stored context.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if no context is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
