//! Data providers.
//!
//! Agents read tabular data through the [`DataProvider`] trait and never
//! touch files themselves. A query yields a [`Table`], which is either a
//! column-addressable [`Frame`] or a plain sequence of row mappings.
//!
//! # Implementations
//!
//! | Provider | Source |
//! |----------|--------|
//! | [`CsvDirectoryProvider`] | every `*.csv` file in a directory, read once |
//! | [`InMemoryProvider`] | tables registered in code |

mod csv;
mod memory;

pub use self::csv::{CsvDirectoryProvider, infer_cell, read_frame};
pub use memory::InMemoryProvider;

use crate::Result;
use crate::models::Record;
use serde_json::Value;

/// Source of named tables.
pub trait DataProvider: Send + Sync {
    /// Returns the table names in sorted order.
    fn list_tables(&self) -> Vec<String>;

    /// Queries a table, keeping rows whose fields equal every filter value.
    ///
    /// Filters on fields the table does not have are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::TableNotFound`] if the table does not exist.
    fn query(&self, table: &str, filters: Option<&Record>) -> Result<Table>;

    /// Returns true if the table exists.
    fn has_table(&self, table: &str) -> bool {
        self.list_tables().iter().any(|t| t == table)
    }
}

/// Result of a provider query.
#[derive(Debug, Clone, PartialEq)]
pub enum Table {
    /// Tabular form with named columns.
    Frame(Frame),
    /// Sequence of row mappings.
    Rows(Vec<Record>),
}

impl Table {
    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Frame(frame) => frame.len(),
            Self::Rows(rows) => rows.len(),
        }
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the table has a field named `name`.
    ///
    /// A frame has the field when it has the column; a row sequence has it
    /// when at least one row carries the key.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        match self {
            Self::Frame(frame) => frame.has_column(name),
            Self::Rows(rows) => rows.iter().any(|row| row.contains_key(name)),
        }
    }

    /// Returns every row as a mapping.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        match self {
            Self::Frame(frame) => frame.records(),
            Self::Rows(rows) => rows.clone(),
        }
    }

    /// Keeps the rows matching every filter on an existing field.
    #[must_use]
    pub fn filter_eq(&self, filters: &Record) -> Self {
        match self {
            Self::Frame(frame) => Self::Frame(frame.filter_eq(filters)),
            Self::Rows(rows) => {
                let active: Vec<(&String, &Value)> = filters
                    .iter()
                    .filter(|(name, _)| self.has_field(name))
                    .collect();
                Self::Rows(
                    rows.iter()
                        .filter(|row| {
                            active
                                .iter()
                                .all(|(name, want)| row.get(name.as_str()) == Some(*want))
                        })
                        .cloned()
                        .collect(),
                )
            },
        }
    }
}

/// Tabular data with ordered, named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Frame {
    /// Creates an empty frame with the given columns.
    #[must_use]
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding with nulls or truncating to the column count.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    /// Adds a row and returns the frame.
    #[must_use]
    pub fn with_row(mut self, row: Vec<Value>) -> Self {
        self.push_row(row);
        self
    }

    /// Returns the column names in order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns true if the frame has a column named `name`.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Returns the position of a column.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns the values of one column, top to bottom.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the frame has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns row `idx` as a mapping.
    #[must_use]
    pub fn record(&self, idx: usize) -> Option<Record> {
        let row = self.rows.get(idx)?;
        Some(
            self.columns
                .iter()
                .cloned()
                .zip(row.iter().cloned())
                .collect(),
        )
    }

    /// Returns every row as a mapping.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        (0..self.rows.len())
            .filter_map(|idx| self.record(idx))
            .collect()
    }

    /// Keeps the rows matching every filter on an existing column.
    #[must_use]
    pub fn filter_eq(&self, filters: &Record) -> Self {
        let active: Vec<(usize, &Value)> = filters
            .iter()
            .filter_map(|(name, want)| self.column_index(name).map(|idx| (idx, want)))
            .collect();

        Self {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| active.iter().all(|(idx, want)| &row[*idx] == *want))
                .cloned()
                .collect(),
        }
    }
}
