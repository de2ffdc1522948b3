//! Agents and the dispatch core.
//!
//! An [`Agent`] owns an [`AgentMemory`], a handle to a [`DataProvider`], and
//! a [`MethodRegistry`] chosen by its [`AgentRole`].
//!
//! # Dispatch
//!
//! ```text
//! Request { method, params }
//!   ├── registry lookup ── miss ──> Reply::Failure("method <m> not implemented")
//!   ├── handler(agent, params) ── Err ──> propagated, nothing recorded
//!   ├── Episode::Dispatch appended
//!   └── Reply returned unchanged
//! ```
//!
//! # Roles
//!
//! | Role | Default name | Methods |
//! |------|--------------|---------|
//! | `LeadTriage` | `LeadTriage` | `classify_lead` |
//! | `Engagement` | `Engagement` | `prepare_outreach`, `send_outreach` |
//! | `CampaignOptimization` | `CampaignOpt` | `evaluate_campaigns` |

pub mod campaign;
pub mod engagement;
mod registry;
pub mod triage;

pub use registry::{Handler, MethodRegistry};

use crate::memory::AgentMemory;
use crate::models::{Episode, Record, Reply, Request};
use crate::provider::DataProvider;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::instrument;

/// The decision policy an agent runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentRole {
    /// Scores and labels leads.
    LeadTriage,
    /// Plans and sends outreach.
    Engagement,
    /// Ranks campaigns by conversion rate.
    CampaignOptimization,
}

impl AgentRole {
    /// Returns every role.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::LeadTriage, Self::Engagement, Self::CampaignOptimization]
    }

    /// Returns the agent name used when none is given.
    #[must_use]
    pub const fn default_name(self) -> &'static str {
        match self {
            Self::LeadTriage => "LeadTriage",
            Self::Engagement => "Engagement",
            Self::CampaignOptimization => "CampaignOpt",
        }
    }

    /// Parses a role from a name or short alias (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "triage" | "leadtriage" => Some(Self::LeadTriage),
            "engagement" | "engage" => Some(Self::Engagement),
            "campaignopt" | "campaign" | "opt" | "campaignoptimization" => {
                Some(Self::CampaignOptimization)
            },
            _ => None,
        }
    }

    /// Builds the method registry for this role.
    #[must_use]
    pub fn registry(self) -> MethodRegistry {
        match self {
            Self::LeadTriage => {
                MethodRegistry::new().register("classify_lead", triage::classify_lead)
            },
            Self::Engagement => MethodRegistry::new()
                .register("prepare_outreach", engagement::prepare_outreach)
                .register("send_outreach", engagement::send_outreach),
            Self::CampaignOptimization => {
                MethodRegistry::new().register("evaluate_campaigns", campaign::evaluate_campaigns)
            },
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.default_name())
    }
}

/// An agent: a named policy with its own memory.
pub struct Agent {
    name: String,
    role: AgentRole,
    memory: AgentMemory,
    provider: Arc<dyn DataProvider>,
    registry: MethodRegistry,
    dispatch: Mutex<()>,
}

impl Agent {
    /// Creates an agent with empty memory.
    #[must_use]
    pub fn new(name: impl Into<String>, role: AgentRole, provider: Arc<dyn DataProvider>) -> Self {
        Self {
            name: name.into(),
            role,
            memory: AgentMemory::new(),
            provider,
            registry: role.registry(),
            dispatch: Mutex::new(()),
        }
    }

    /// Creates a lead triage agent named `LeadTriage`.
    #[must_use]
    pub fn lead_triage(provider: Arc<dyn DataProvider>) -> Self {
        Self::with_role(AgentRole::LeadTriage, provider)
    }

    /// Creates an engagement agent named `Engagement`.
    #[must_use]
    pub fn engagement(provider: Arc<dyn DataProvider>) -> Self {
        Self::with_role(AgentRole::Engagement, provider)
    }

    /// Creates a campaign optimization agent named `CampaignOpt`.
    #[must_use]
    pub fn campaign_optimization(provider: Arc<dyn DataProvider>) -> Self {
        Self::with_role(AgentRole::CampaignOptimization, provider)
    }

    /// Creates an agent named after its role.
    #[must_use]
    pub fn with_role(role: AgentRole, provider: Arc<dyn DataProvider>) -> Self {
        Self::new(role.default_name(), role, provider)
    }

    /// Returns the agent name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the agent role.
    #[must_use]
    pub const fn role(&self) -> AgentRole {
        self.role
    }

    /// Returns the agent's memory stores.
    #[must_use]
    pub const fn memory(&self) -> &AgentMemory {
        &self.memory
    }

    /// Returns the data provider.
    #[must_use]
    pub fn provider(&self) -> &dyn DataProvider {
        self.provider.as_ref()
    }

    /// Handles one request.
    ///
    /// Unknown methods yield a failure reply and record nothing. Every
    /// handled call, successful or not, appends one dispatch episode.
    ///
    /// Calls on one agent run one at a time: the memory writes and episodes
    /// of a call are never interleaved with those of another.
    ///
    /// # Errors
    ///
    /// Returns an error if the params do not fit the handler or a
    /// collaborator (the data provider) fails. No episode is recorded then.
    #[instrument(skip(self, request), fields(agent = %self.name, method = %request.method))]
    pub fn handle(&self, request: &Request) -> Result<Reply> {
        let Some(handler) = self.registry.get(&request.method) else {
            tracing::warn!("Method not implemented");
            self.count_request(&request.method, "unknown");
            return Ok(Reply::failure(format!(
                "method {} not implemented",
                request.method
            )));
        };

        let _guard = self.dispatch.lock().unwrap_or_else(PoisonError::into_inner);
        let result = match handler(self, &request.params) {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!(error = %e, "Handler failed");
                self.count_request(&request.method, "error");
                return Err(e);
            },
        };

        self.memory.episodic.add_episode(Episode::dispatch(
            &self.name,
            &request.method,
            request.params.clone(),
            result.clone(),
        ));
        self.count_request(
            &request.method,
            if result.is_failure() { "failure" } else { "success" },
        );
        tracing::debug!(failed = result.is_failure(), "Request handled");

        Ok(result)
    }

    /// Handles a request built from a method name and params.
    ///
    /// # Errors
    ///
    /// See [`Agent::handle`].
    pub fn call(&self, method: &str, params: Record) -> Result<Reply> {
        self.handle(&Request {
            method: method.to_string(),
            params,
        })
    }

    fn count_request(&self, method: &str, status: &'static str) {
        metrics::counter!(
            "agent_requests_total",
            "agent" => self.name.clone(),
            "method" => method.to_string(),
            "status" => status
        )
        .increment(1);
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Decodes request params into a handler's argument struct.
fn parse_args<T: DeserializeOwned>(params: &Record) -> Result<T> {
    serde_json::from_value(Value::Object(params.clone()))
        .map_err(|e| Error::InvalidInput(e.to_string()))
}
