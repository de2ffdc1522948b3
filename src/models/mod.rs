//! Data models for leadflow.
//!
//! This module contains the request/reply envelopes, episode records, and
//! the typed payloads each policy produces.

mod campaign;
mod episode;
mod lead;
mod outreach;
mod request;

pub use campaign::{CampaignEvaluation, CampaignRank};
pub use episode::Episode;
pub use lead::{INQUIRY_THRESHOLD, LeadLabel, LeadProfile, QUALIFIED_THRESHOLD};
pub use outreach::{EMAIL_CHANNEL, OutreachPlan, SendReceipt};
pub use request::{Reply, Request};

use crate::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// A name → value mapping: one table row, one context, or one profile.
pub type Record = Map<String, Value>;

/// Returns the store key for an entity id.
///
/// Strings are used verbatim; every other JSON value uses its JSON text, so
/// the numeric id `101` and the string id `"101"` share a key.
#[must_use]
pub fn entity_key(id: &Value) -> String {
    display_value(id)
}

/// Renders a value as text: strings verbatim, everything else as JSON.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Serializes a payload into a mapping.
///
/// # Errors
///
/// Returns an error if the payload cannot be serialized or is not a JSON
/// object.
pub fn to_record(payload: &impl Serialize) -> Result<Record> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(Error::OperationFailed {
            operation: "encode_record".to_string(),
            cause: format!("expected a JSON object, got {other}"),
        }),
        Err(e) => Err(Error::OperationFailed {
            operation: "encode_record".to_string(),
            cause: e.to_string(),
        }),
    }
}

/// Returns the current local time as an ISO-8601 string with microseconds.
#[must_use]
pub fn now_iso() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Returns `false` for null, `false`, zero, empty strings and empty
/// collections, `true` for everything else.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
