//! Stdio relay.
//!
//! Line-delimited JSON-RPC 2.0 over stdin/stdout that routes requests to the
//! pipeline's agents. One request per line, one response per line; blank
//! lines are skipped.
//!
//! | Method | Params | Result |
//! |--------|--------|--------|
//! | `tables` | none | `{tables}` |
//! | `query` | `{table, filters?}` | `{count, records}` |
//! | `agent/call` | `{agent, method, params?}` | the agent's reply |
//! | `agent/episodes` | `{agent, n?}` | `{episodes}` |
//!
//! Agents are addressed by name (`LeadTriage`) or role alias (`triage`).

mod dispatch;

pub use dispatch::RelayMethod;

use crate::agents::{Agent, AgentRole};
use crate::memory::DEFAULT_RECENT;
use crate::models::{Record, Request};
use crate::pipeline::Pipeline;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::io::{BufRead, Write};

/// Invalid JSON.
pub const PARSE_ERROR: i32 = -32700;
/// Unknown relay method.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Params that do not fit the method, or an unknown agent.
pub const INVALID_PARAMS: i32 = -32602;
/// Collaborator failure.
pub const INTERNAL_ERROR: i32 = -32603;
/// Query on a table the provider does not hold.
pub const TABLE_NOT_FOUND: i32 = -32004;

/// Result type for method dispatch.
type DispatchResult = std::result::Result<Value, (i32, String)>;

/// JSON-RPC request.
#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    #[serde(rename = "jsonrpc", default)]
    _jsonrpc: Option<String>,
    id: Option<Value>,
    method: String,
    params: Option<Value>,
}

/// JSON-RPC response.
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC error.
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct QueryParams {
    table: String,
    #[serde(default)]
    filters: Option<Record>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AgentCallParams {
    agent: String,
    method: String,
    #[serde(default)]
    params: Record,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EpisodesParams {
    agent: String,
    #[serde(default = "default_recent")]
    n: usize,
}

const fn default_recent() -> usize {
    DEFAULT_RECENT
}

/// Relay over a pipeline's agents.
///
/// Agent memory lives as long as the server.
pub struct RelayServer {
    pipeline: Pipeline,
}

impl RelayServer {
    /// Creates a relay over `pipeline`.
    #[must_use]
    pub const fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    /// Returns the underlying pipeline.
    #[must_use]
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Serves stdin until end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if stdin cannot be read or stdout cannot be written.
    pub fn run_stdio(&self) -> Result<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Serves requests from `reader`, writing responses to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or writing fails.
    pub fn serve<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> Result<()> {
        tracing::info!("Relay listening on stdio");
        for line in reader.lines() {
            let line = line.map_err(|e| Error::OperationFailed {
                operation: "read_stdin".to_string(),
                cause: e.to_string(),
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let response = self.handle_request(&line);

            writeln!(writer, "{response}").map_err(|e| Error::OperationFailed {
                operation: "write_stdout".to_string(),
                cause: e.to_string(),
            })?;

            writer.flush().map_err(|e| Error::OperationFailed {
                operation: "flush_stdout".to_string(),
                cause: e.to_string(),
            })?;
        }
        tracing::info!("Relay input closed");
        Ok(())
    }

    /// Handles one request line and returns the response line.
    #[must_use]
    pub fn handle_request(&self, request: &str) -> String {
        let parsed: std::result::Result<JsonRpcRequest, _> = serde_json::from_str(request);

        let (method_label, status, response) = match parsed {
            Ok(req) => {
                tracing::debug!(method = %req.method, "Processing relay request");
                let result = self.dispatch_method(&req.method, req.params);
                let status = if result.is_ok() { "success" } else { "error" };
                (req.method, status, Self::format_response(req.id, result))
            },
            Err(e) => (
                "parse_error".to_string(),
                "error",
                Self::format_error(None, PARSE_ERROR, &format!("Parse error: {e}")),
            ),
        };

        metrics::counter!(
            "relay_requests_total",
            "method" => method_label,
            "status" => status
        )
        .increment(1);

        response
    }

    fn dispatch_method(&self, method: &str, params: Option<Value>) -> DispatchResult {
        match RelayMethod::from(method) {
            RelayMethod::Tables => Ok(json!({ "tables": self.pipeline.provider().list_tables() })),
            RelayMethod::Query => self.handle_query(params),
            RelayMethod::AgentCall => self.handle_agent_call(params),
            RelayMethod::AgentEpisodes => self.handle_agent_episodes(params),
            RelayMethod::Unknown(name) => Err((METHOD_NOT_FOUND, format!("Method not found: {name}"))),
        }
    }

    fn handle_query(&self, params: Option<Value>) -> DispatchResult {
        let args: QueryParams = parse_params(params)?;
        let table = self
            .pipeline
            .provider()
            .query(&args.table, args.filters.as_ref())
            .map_err(error_to_rpc)?;
        let records = table.records();
        Ok(json!({ "count": records.len(), "records": records }))
    }

    fn handle_agent_call(&self, params: Option<Value>) -> DispatchResult {
        let args: AgentCallParams = parse_params(params)?;
        let agent = self.find_agent(&args.agent)?;
        let reply = agent
            .handle(&Request {
                method: args.method,
                params: args.params,
            })
            .map_err(error_to_rpc)?;
        Ok(reply.to_value())
    }

    fn handle_agent_episodes(&self, params: Option<Value>) -> DispatchResult {
        let args: EpisodesParams = parse_params(params)?;
        let agent = self.find_agent(&args.agent)?;
        let episodes = agent.memory().episodic.recent(args.n);
        serde_json::to_value(episodes)
            .map(|episodes| json!({ "episodes": episodes }))
            .map_err(|e| (INTERNAL_ERROR, e.to_string()))
    }

    /// Resolves an agent by exact name, then by role alias.
    fn find_agent(&self, name: &str) -> std::result::Result<&Agent, (i32, String)> {
        let agents = self.pipeline.agents();
        agents
            .iter()
            .find(|a| a.name() == name)
            .or_else(|| {
                let role = AgentRole::parse(name)?;
                agents.iter().find(|a| a.role() == role)
            })
            .copied()
            .ok_or_else(|| (INVALID_PARAMS, format!("Unknown agent: {name}")))
    }

    fn format_response(id: Option<Value>, result: DispatchResult) -> String {
        match result {
            Ok(value) => {
                let response = JsonRpcResponse {
                    jsonrpc: "2.0".to_string(),
                    id,
                    result: Some(value),
                    error: None,
                };
                serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
            },
            Err((code, message)) => Self::format_error(id, code, &message),
        }
    }

    fn format_error(id: Option<Value>, code: i32, message: &str) -> String {
        let response = JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.to_string(),
            }),
        };
        serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(
    params: Option<Value>,
) -> std::result::Result<T, (i32, String)> {
    let params = params.unwrap_or_else(|| Value::Object(Record::new()));
    serde_json::from_value(params).map_err(|e| (INVALID_PARAMS, format!("Invalid params: {e}")))
}

#[allow(clippy::needless_pass_by_value)]
fn error_to_rpc(e: Error) -> (i32, String) {
    let code = match &e {
        Error::InvalidInput(_) => INVALID_PARAMS,
        Error::TableNotFound(_) => TABLE_NOT_FOUND,
        Error::OperationFailed { .. } => INTERNAL_ERROR,
    };
    (code, e.to_string())
}
