//! CSV directory provider.
//!
//! Loads every `*.csv` file of a directory into memory once. The file stem
//! becomes the table name and the header row the column names.

use super::{DataProvider, Frame, Table};
use crate::models::Record;
use crate::{Error, Result};
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Provider backed by a directory of CSV files.
#[derive(Debug, Clone)]
pub struct CsvDirectoryProvider {
    /// Directory the tables were read from.
    data_dir: PathBuf,
    /// Loaded tables by name.
    tables: BTreeMap<String, Frame>,
}

impl CsvDirectoryProvider {
    /// Reads every CSV file in `data_dir`.
    ///
    /// Files that fail to parse are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if `data_dir` is not a readable directory.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        if !data_dir.is_dir() {
            return Err(Error::OperationFailed {
                operation: "open_data_dir".to_string(),
                cause: format!("data dir not found: {}", data_dir.display()),
            });
        }

        let entries = std::fs::read_dir(&data_dir).map_err(|e| Error::OperationFailed {
            operation: "read_data_dir".to_string(),
            cause: format!("{}: {e}", data_dir.display()),
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "csv"))
            .collect();
        paths.sort();

        let mut tables = BTreeMap::new();
        for path in paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match load_file(&path) {
                Ok(frame) => {
                    tracing::debug!(table = name, rows = frame.len(), "Loaded CSV table");
                    tables.insert(name.to_string(), frame);
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to read CSV table");
                },
            }
        }

        metrics::counter!("provider_tables_loaded_total").increment(tables.len() as u64);

        Ok(Self { data_dir, tables })
    }

    /// Returns the directory the tables were read from.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl DataProvider for CsvDirectoryProvider {
    fn list_tables(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    fn query(&self, table: &str, filters: Option<&Record>) -> Result<Table> {
        let frame = self
            .tables
            .get(table)
            .ok_or_else(|| Error::TableNotFound(table.to_string()))?;

        Ok(match filters {
            Some(filters) if !filters.is_empty() => Table::Frame(frame.filter_eq(filters)),
            _ => Table::Frame(frame.clone()),
        })
    }
}

fn load_file(path: &Path) -> Result<Frame> {
    let file = File::open(path).map_err(|e| Error::OperationFailed {
        operation: "open_csv".to_string(),
        cause: format!("{}: {e}", path.display()),
    })?;
    read_frame(BufReader::new(file))
}

/// Parses CSV text with a header row into a frame.
///
/// # Errors
///
/// Returns an error if the header or any record cannot be read.
pub fn read_frame<R: Read>(reader: R) -> Result<Frame> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| Error::OperationFailed {
            operation: "read_csv_headers".to_string(),
            cause: e.to_string(),
        })?
        .clone();

    let mut frame = Frame::new(headers.iter());
    for record in csv_reader.records() {
        let record = record.map_err(|e| Error::OperationFailed {
            operation: "read_csv".to_string(),
            cause: e.to_string(),
        })?;
        frame.push_row(record.iter().map(infer_cell).collect());
    }

    Ok(frame)
}

/// Converts one CSV cell into a typed value.
///
/// Empty cells become null; `true`/`false` (any case) become booleans;
/// integers and finite floats become numbers; anything else stays text.
#[must_use]
pub fn infer_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if cell.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if cell.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Some(n) = cell.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(cell.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    #[test]
    fn test_infer_cell() {
        assert_eq!(infer_cell(""), json!(null));
        assert_eq!(infer_cell("TRUE"), json!(true));
        assert_eq!(infer_cell("false"), json!(false));
        assert_eq!(infer_cell("42"), json!(42));
        assert_eq!(infer_cell("-7"), json!(-7));
        assert_eq!(infer_cell("0.25"), json!(0.25));
        assert_eq!(infer_cell("NaN"), json!("NaN"));
        assert_eq!(infer_cell("L001"), json!("L001"));
    }

    #[test]
    fn test_read_frame() {
        let input = "lead_id,campaign_id,engagement_score,email\n\
                     L1,c1,25,a@b.com\n\
                     L2,,abc,\n";
        let frame = read_frame(Cursor::new(input)).unwrap();

        assert_eq!(frame.columns(), ["lead_id", "campaign_id", "engagement_score", "email"]);
        assert_eq!(frame.len(), 2);
        let second = frame.record(1).unwrap();
        assert_eq!(second["campaign_id"], json!(null));
        assert_eq!(second["engagement_score"], json!("abc"));
        assert_eq!(frame.record(0).unwrap()["engagement_score"], json!(25));
    }

    #[test]
    fn test_read_frame_ragged_rows() {
        let input = "a,b,c\n1,2\n3,4,5,6\n";
        let frame = read_frame(Cursor::new(input)).unwrap();
        assert_eq!(frame.record(0).unwrap()["c"], json!(null));
        assert_eq!(frame.record(1).unwrap()["c"], json!(5));
    }

    #[test]
    fn test_open_missing_dir() {
        let result = CsvDirectoryProvider::open("/definitely/not/here");
        assert!(matches!(result, Err(Error::OperationFailed { .. })));
    }

    #[test]
    fn test_open_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("leads.csv"), "lead_id,email\nL1,a@b.com\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let provider = CsvDirectoryProvider::open(dir.path()).unwrap();
        assert_eq!(provider.list_tables(), vec!["leads".to_string()]);
        assert!(provider.has_table("leads"));
        assert_eq!(provider.data_dir(), dir.path());

        let table = provider.query("leads", None).unwrap();
        assert_eq!(table.len(), 1);
        assert!(matches!(
            provider.query("campaign_daily", None),
            Err(Error::TableNotFound(name)) if name == "campaign_daily"
        ));
    }

    #[test]
    fn test_query_with_filters() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("campaign_daily.csv"),
            "campaign_id,impressions\nA,100\nB,50\nA,20\n",
        )
        .unwrap();

        let provider = CsvDirectoryProvider::open(dir.path()).unwrap();
        let mut filters = Record::new();
        filters.insert("campaign_id".to_string(), json!("A"));
        let table = provider.query("campaign_daily", Some(&filters)).unwrap();
        assert_eq!(table.len(), 2);
    }
}
