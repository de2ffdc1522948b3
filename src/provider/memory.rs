//! In-memory provider.

use super::{DataProvider, Frame, Table};
use crate::models::Record;
use crate::{Error, Result};
use std::collections::BTreeMap;

/// Provider holding tables registered in code.
///
/// Useful in tests and when rows come from another system already
/// materialized.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    tables: BTreeMap<String, Table>,
}

impl InMemoryProvider {
    /// Creates a provider with no tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table, replacing any table of the same name.
    pub fn insert(&mut self, name: impl Into<String>, table: Table) {
        self.tables.insert(name.into(), table);
    }

    /// Registers a tabular table.
    #[must_use]
    pub fn with_frame(mut self, name: impl Into<String>, frame: Frame) -> Self {
        self.insert(name, Table::Frame(frame));
        self
    }

    /// Registers a row-sequence table.
    #[must_use]
    pub fn with_rows(mut self, name: impl Into<String>, rows: Vec<Record>) -> Self {
        self.insert(name, Table::Rows(rows));
        self
    }
}

impl DataProvider for InMemoryProvider {
    fn list_tables(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    fn query(&self, table: &str, filters: Option<&Record>) -> Result<Table> {
        let stored = self
            .tables
            .get(table)
            .ok_or_else(|| Error::TableNotFound(table.to_string()))?;

        Ok(match filters {
            Some(filters) if !filters.is_empty() => stored.filter_eq(filters),
            _ => stored.clone(),
        })
    }
}
