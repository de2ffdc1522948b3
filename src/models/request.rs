//! Request and reply envelopes.

use super::{Record, to_record};
use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A call into an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Method name, resolved against the agent's registry.
    pub method: String,
    /// Named parameters for the handler.
    #[serde(default)]
    pub params: Record,
}

impl Request {
    /// Creates a request with no parameters.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: Record::new(),
        }
    }

    /// Adds a named parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// Outcome of a call.
///
/// Serializes as the bare policy mapping on success and as
/// `{"error": message}` on a handled failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// A handled failure.
    Failure {
        /// Human-readable failure message.
        error: String,
    },
    /// A policy-specific mapping.
    Success(Record),
}

impl Reply {
    /// Creates a failure reply.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            error: message.into(),
        }
    }

    /// Creates a success reply from a payload that serializes to a mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not serialize to a JSON object.
    pub fn success(payload: &impl Serialize) -> Result<Self> {
        to_record(payload).map(Self::Success)
    }

    /// Returns true for a failure reply.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Returns the failure message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure { error } => Some(error),
            Self::Success(_) => None,
        }
    }

    /// Looks up a field of a success reply.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Success(map) => map.get(key),
            Self::Failure { .. } => None,
        }
    }

    /// Converts the reply into its JSON form.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Failure { error } => serde_json::json!({ "error": error }),
            Self::Success(map) => Value::Object(map.clone()),
        }
    }
}
