//! Provider commands.

use super::{open_provider, parse_assignments, print_json};
use leadflow::config::LeadflowConfig;
use serde_json::json;

/// Tables command.
pub fn cmd_tables(config: &LeadflowConfig) -> anyhow::Result<()> {
    let provider = open_provider(config)?;
    let tables = provider.list_tables();
    if tables.is_empty() {
        println!("No tables in {}", config.data_dir.display());
    }
    for table in tables {
        println!("{table}");
    }
    Ok(())
}

/// Query command.
pub fn cmd_query(config: &LeadflowConfig, table: &str, filters: &[String]) -> anyhow::Result<()> {
    let filters = parse_assignments(filters)?;
    let provider = open_provider(config)?;
    let records = provider
        .query(table, Some(&filters).filter(|f| !f.is_empty()))?
        .records();
    print_json(&json!({ "count": records.len(), "records": records }))
}
