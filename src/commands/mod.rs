//! Command handlers module.
//!
//! - `data.rs`: provider commands (tables, query)
//! - `agent.rs`: one-shot agent dispatch (call)
//! - `run.rs`: pipeline run and stdio relay (run, serve)
//! - `config.rs`: configuration display

mod agent;
mod config;
mod data;
mod run;

pub use agent::cmd_call;
pub use config::cmd_config;
pub use data::{cmd_query, cmd_tables};
pub use run::{cmd_run, cmd_serve};

use anyhow::Context;
use leadflow::config::LeadflowConfig;
use leadflow::models::Record;
use leadflow::provider::{CsvDirectoryProvider, DataProvider};
use serde_json::Value;
use std::sync::Arc;

/// Opens the CSV provider for the configured data directory.
fn open_provider(config: &LeadflowConfig) -> anyhow::Result<Arc<dyn DataProvider>> {
    let provider = CsvDirectoryProvider::open(&config.data_dir)
        .with_context(|| format!("opening data dir {}", config.data_dir.display()))?;
    Ok(Arc::new(provider))
}

/// Parses `name=value` pairs into a record.
///
/// Values are read as JSON when they parse, otherwise kept as strings, so
/// `top_n=2` is a number and `lead_id=L001` a string.
fn parse_assignments(pairs: &[String]) -> leadflow::Result<Record> {
    pairs
        .iter()
        .map(|pair| {
            let (name, raw) = pair.split_once('=').ok_or_else(|| {
                leadflow::Error::InvalidInput(format!("expected name=value, got '{pair}'"))
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(leadflow::Error::InvalidInput(format!(
                    "empty name in '{pair}'"
                )));
            }
            let value =
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
            Ok((name.to_string(), value))
        })
        .collect()
}

/// Prints a value as pretty JSON.
fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
