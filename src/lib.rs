//! # Leadflow
//!
//! Agent memory and dispatch framework for a small sales pipeline.
//!
//! Three agents share one framework: a lead triage agent that scores and
//! labels leads, an engagement agent that plans and sends outreach, and a
//! campaign optimization agent that ranks campaigns by conversion rate.
//! Every agent owns four memory stores and answers JSON-shaped requests
//! through an explicit method registry.
//!
//! ## Features
//!
//! - Four-layer agent memory (short-term, long-term, episodic, semantic)
//! - Registry-based dispatch with an episode recorded per handled call
//! - Pluggable data providers (CSV directory, in-memory tables)
//! - Demo pipeline run with a JSON run log
//! - Line-delimited JSON-RPC relay over stdio
//!
//! ## Example
//!
//! ```rust,ignore
//! use leadflow::{Agent, Request};
//! use leadflow::provider::CsvDirectoryProvider;
//! use std::sync::Arc;
//!
//! let provider = Arc::new(CsvDirectoryProvider::open("./data")?);
//! let triage = Agent::lead_triage(provider);
//! let reply = triage.handle(&Request::new("classify_lead").with_param("lead_id", "L001"))?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod agents;
pub mod config;
pub mod memory;
pub mod models;
pub mod observability;
pub mod pipeline;
pub mod provider;
pub mod server;

pub use agents::{Agent, AgentRole};
pub use config::LeadflowConfig;
pub use memory::{
    AgentMemory, EpisodicMemory, LongTermMemory, SemanticMemory, ShortTermMemory, TripleKeys,
};
pub use models::{Episode, Record, Reply, Request};
pub use pipeline::{Pipeline, RunLog, RunOutcome};
pub use provider::{DataProvider, Frame, Table};

/// Error type for leadflow operations.
///
/// Expected domain conditions (unknown method, lead not found, malformed
/// numeric fields) never appear here: they are encoded in a [`Reply`].
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Request params do not fit the handler, malformed CLI or relay input |
/// | `TableNotFound` | A data provider is queried for a table it does not hold |
/// | `OperationFailed` | I/O errors, config parsing, CSV parsing, logging init |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - Request params carry unknown names or wrongly-typed values
    /// - A `--param` or `--filter` CLI argument is not `key=value`
    /// - A relay request is missing a required field
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested table does not exist in the data provider.
    #[error("table {0} not found")]
    TableNotFound(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - The data directory cannot be read
    /// - A config file cannot be read or parsed
    /// - The run log cannot be written
    /// - The logging subscriber cannot be installed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for leadflow operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "invalid input: test error");

        let err = Error::TableNotFound("leads".to_string());
        assert_eq!(err.to_string(), "table leads not found");

        let err = Error::OperationFailed {
            operation: "test".to_string(),
            cause: "failed".to_string(),
        };
        assert_eq!(err.to_string(), "operation 'test' failed: failed");
    }
}
