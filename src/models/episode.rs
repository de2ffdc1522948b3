//! Episode records for the episodic log.

use super::{Record, Reply, now_iso};
use serde::Serialize;
use serde_json::Value;

/// An immutable, timestamped entry in an agent's episodic log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Episode {
    /// One call handled by the dispatch core.
    Dispatch {
        /// Name of the agent that handled the call.
        agent: String,
        /// Method name as requested.
        method: String,
        /// Parameters as requested.
        params: Record,
        /// The reply returned to the caller.
        result: Reply,
        /// Completion time.
        time: String,
    },
    /// An event a policy records on its own behalf.
    Event {
        /// Event name (e.g. `"sent"`).
        event: String,
        /// The lead the event concerns.
        lead_id: Value,
        /// Message attached to the event.
        message: Value,
        /// Event time.
        time: String,
    },
}

impl Episode {
    /// Creates a dispatch episode stamped with the current time.
    #[must_use]
    pub fn dispatch(agent: &str, method: &str, params: Record, result: Reply) -> Self {
        Self::Dispatch {
            agent: agent.to_string(),
            method: method.to_string(),
            params,
            result,
            time: now_iso(),
        }
    }

    /// Creates a `"sent"` event stamped with the current time.
    #[must_use]
    pub fn sent(lead_id: Value, message: Value) -> Self {
        Self::Event {
            event: "sent".to_string(),
            lead_id,
            message,
            time: now_iso(),
        }
    }

    /// Returns the method name for dispatch episodes.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        match self {
            Self::Dispatch { method, .. } => Some(method),
            Self::Event { .. } => None,
        }
    }

    /// Returns the event name for policy events.
    #[must_use]
    pub fn event(&self) -> Option<&str> {
        match self {
            Self::Event { event, .. } => Some(event),
            Self::Dispatch { .. } => None,
        }
    }

    /// Returns the episode timestamp.
    #[must_use]
    pub fn time(&self) -> &str {
        match self {
            Self::Dispatch { time, .. } | Self::Event { time, .. } => time,
        }
    }
}
