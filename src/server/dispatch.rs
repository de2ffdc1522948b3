//! Relay method dispatch.
//!
//! ```text
//! RelayMethod (enum)
//!   ├── Tables         "tables"
//!   ├── Query          "query"
//!   ├── AgentCall      "agent/call"
//!   ├── AgentEpisodes  "agent/episodes"
//!   └── Unknown(String)
//! ```
//!
//! To add a method, add a variant, extend the `From<&str>` parsing, and
//! handle it in `RelayServer::dispatch_method`.

use std::fmt;

/// Relay method identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RelayMethod {
    /// List provider tables.
    Tables,
    /// Query a provider table.
    Query,
    /// Dispatch a request on a named agent.
    AgentCall,
    /// Read an agent's recent episodes.
    AgentEpisodes,
    /// Unknown method (for error reporting).
    Unknown(String),
}

impl RelayMethod {
    /// Returns the wire name of the method.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Tables => "tables",
            Self::Query => "query",
            Self::AgentCall => "agent/call",
            Self::AgentEpisodes => "agent/episodes",
            Self::Unknown(s) => s.as_str(),
        }
    }

    /// Returns true if this is a known method.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<&str> for RelayMethod {
    fn from(s: &str) -> Self {
        match s {
            "tables" => Self::Tables,
            "query" => Self::Query,
            "agent/call" => Self::AgentCall,
            "agent/episodes" => Self::AgentEpisodes,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for RelayMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known() {
        for name in ["tables", "query", "agent/call", "agent/episodes"] {
            let method = RelayMethod::from(name);
            assert!(method.is_known());
            assert_eq!(method.as_str(), name);
        }
    }

    #[test]
    fn test_parse_unknown() {
        let method = RelayMethod::from("tools/list");
        assert_eq!(method, RelayMethod::Unknown("tools/list".to_string()));
        assert!(!method.is_known());
        assert_eq!(method.to_string(), "tools/list");
    }
}
