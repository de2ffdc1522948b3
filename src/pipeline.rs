//! Demo pipeline run.
//!
//! Drives the three agents over a sample of leads and writes a JSON run log:
//!
//! 1. Load the semantic triples table (if present) into every agent
//! 2. Pick up to `sample_size` distinct lead ids
//! 3. Per lead: `classify_lead`, `prepare_outreach`, `send_outreach`
//! 4. `evaluate_campaigns` once with `top_n`
//! 5. Write `{run_id, time, actions}` to `run_log_path`

use crate::agents::Agent;
use crate::agents::triage::{LEADS_TABLE, lead_id_column};
use crate::config::LeadflowConfig;
use crate::memory::TripleKeys;
use crate::models::{Record, Reply, now_iso};
use crate::provider::{DataProvider, Table};
use crate::{Error, Result};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

/// One step of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRecord {
    /// Short agent label: `triage`, `engagement` or `campaign_opt`.
    pub agent: String,
    /// Lead the step ran for; absent for campaign evaluation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead: Option<Value>,
    /// The agent's reply, keyed by step kind.
    #[serde(flatten)]
    pub outcome: ActionOutcome,
}

/// Reply of a step, serialized under a key naming the step kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Classification or evaluation result.
    Result(Reply),
    /// Planned outreach.
    Plan(Reply),
    /// Send receipt.
    Sent(Reply),
}

impl ActionOutcome {
    /// Returns the wrapped reply.
    #[must_use]
    pub const fn reply(&self) -> &Reply {
        match self {
            Self::Result(reply) | Self::Plan(reply) | Self::Sent(reply) => reply,
        }
    }
}

/// Log of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunLog {
    /// Unique id of the run.
    pub run_id: String,
    /// Completion time.
    pub time: String,
    /// Steps in execution order.
    pub actions: Vec<ActionRecord>,
}

impl RunLog {
    /// Writes the log as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).map_err(|e| Error::OperationFailed {
            operation: "encode_run_log".to_string(),
            cause: e.to_string(),
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
                operation: "write_run_log".to_string(),
                cause: format!("{}: {e}", parent.display()),
            })?;
        }
        std::fs::write(path, text).map_err(|e| Error::OperationFailed {
            operation: "write_run_log".to_string(),
            cause: format!("{}: {e}", path.display()),
        })
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// The leads table is missing or empty; nothing was written.
    NoLeads,
    /// The run finished and its log was written.
    Completed(RunLog),
}

/// The three agents wired to one data provider.
pub struct Pipeline {
    provider: Arc<dyn DataProvider>,
    config: LeadflowConfig,
    triage: Agent,
    engagement: Agent,
    optimizer: Agent,
}

impl Pipeline {
    /// Builds the agents over `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn DataProvider>, config: LeadflowConfig) -> Self {
        Self {
            triage: Agent::lead_triage(Arc::clone(&provider)),
            engagement: Agent::engagement(Arc::clone(&provider)),
            optimizer: Agent::campaign_optimization(Arc::clone(&provider)),
            provider,
            config,
        }
    }

    /// Returns the data provider.
    #[must_use]
    pub fn provider(&self) -> &dyn DataProvider {
        self.provider.as_ref()
    }

    /// Returns the effective configuration.
    #[must_use]
    pub const fn config(&self) -> &LeadflowConfig {
        &self.config
    }

    /// Returns the lead triage agent.
    #[must_use]
    pub const fn triage(&self) -> &Agent {
        &self.triage
    }

    /// Returns the engagement agent.
    #[must_use]
    pub const fn engagement(&self) -> &Agent {
        &self.engagement
    }

    /// Returns the campaign optimization agent.
    #[must_use]
    pub const fn optimizer(&self) -> &Agent {
        &self.optimizer
    }

    /// Returns every agent.
    #[must_use]
    pub fn agents(&self) -> [&Agent; 3] {
        [&self.triage, &self.engagement, &self.optimizer]
    }

    /// Loads the semantic triples table into every agent.
    ///
    /// Returns the number of triples each agent received; zero when the
    /// table does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider query fails.
    pub fn load_semantic(&self) -> Result<usize> {
        let table = self.config.semantic_table.as_str();
        if !self.provider.has_table(table) {
            tracing::debug!(table, "No semantic table");
            return Ok(0);
        }
        let rows = self.provider.query(table, None)?.records();
        let keys = TripleKeys::default();
        let mut loaded = 0;
        for agent in self.agents() {
            loaded = agent.memory().semantic.load_triples(&rows, &keys);
        }
        tracing::debug!(table, triples = loaded, "Loaded semantic triples");
        Ok(loaded)
    }

    /// Picks up to `sample_size` distinct non-null lead ids in order of
    /// appearance. `None` when the leads table is missing or empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider query fails.
    pub fn sample_leads(&self) -> Result<Option<Vec<Value>>> {
        if !self.provider.has_table(LEADS_TABLE) {
            return Ok(None);
        }
        let leads = self.provider.query(LEADS_TABLE, None)?;
        if leads.is_empty() {
            return Ok(None);
        }
        Ok(Some(sample_ids(&leads, self.config.sample_size)))
    }

    /// Runs the pipeline and writes the run log.
    ///
    /// # Errors
    ///
    /// Returns an error if a provider query fails, an agent rejects a
    /// request, or the run log cannot be written.
    #[instrument(skip(self), fields(sample_size = self.config.sample_size, top_n = self.config.top_n))]
    pub fn run(&self) -> Result<RunOutcome> {
        self.load_semantic()?;

        let Some(leads) = self.sample_leads()? else {
            tracing::info!("No leads table or it is empty");
            return Ok(RunOutcome::NoLeads);
        };
        tracing::info!(leads = leads.len(), "Sampled leads");

        let mut actions = Vec::with_capacity(leads.len() * 3 + 1);
        for lead in leads {
            actions.extend(self.process_lead(&lead)?);
        }

        let evaluation = self.optimizer.call(
            "evaluate_campaigns",
            params([("top_n", json!(self.config.top_n))]),
        )?;
        actions.push(ActionRecord {
            agent: "campaign_opt".to_string(),
            lead: None,
            outcome: ActionOutcome::Result(evaluation),
        });

        let log = RunLog {
            run_id: uuid::Uuid::new_v4().to_string(),
            time: now_iso(),
            actions,
        };
        log.write_to(&self.config.run_log_path)?;
        tracing::info!(
            run_id = %log.run_id,
            actions = log.actions.len(),
            path = %self.config.run_log_path.display(),
            "Run complete"
        );

        Ok(RunOutcome::Completed(log))
    }

    fn process_lead(&self, lead: &Value) -> Result<[ActionRecord; 3]> {
        let classified = self
            .triage
            .call("classify_lead", params([("lead_id", lead.clone())]))?;
        let plan = self
            .engagement
            .call("prepare_outreach", params([("lead_id", lead.clone())]))?;
        let message = plan.get("message").cloned().unwrap_or(Value::Null);
        let sent = self.engagement.call(
            "send_outreach",
            params([("lead_id", lead.clone()), ("message", message)]),
        )?;

        let step = |agent: &str, outcome| ActionRecord {
            agent: agent.to_string(),
            lead: Some(lead.clone()),
            outcome,
        };
        Ok([
            step("triage", ActionOutcome::Result(classified)),
            step("engagement", ActionOutcome::Plan(plan)),
            step("engagement", ActionOutcome::Sent(sent)),
        ])
    }
}

fn params<const N: usize>(entries: [(&str, Value); N]) -> Record {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Distinct non-null lead ids in order of appearance, at most `limit`.
fn sample_ids(leads: &Table, limit: usize) -> Vec<Value> {
    let ids: Vec<Value> = match leads {
        Table::Frame(frame) => lead_id_column(frame.columns())
            .and_then(|column| frame.column(column))
            .map(|values| values.into_iter().cloned().collect())
            .unwrap_or_default(),
        Table::Rows(rows) => rows
            .iter()
            .filter_map(|row| row.get("lead_id").or_else(|| row.get("id")).cloned())
            .collect(),
    };

    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| !id.is_null() && seen.insert(id.to_string()))
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Frame, InMemoryProvider};

    fn provider() -> Arc<dyn DataProvider> {
        let leads = Frame::new(["Lead ID", "campaign_id", "engagement_score", "email"])
            .with_row(vec![json!("L1"), json!("c1"), json!(25), json!("a@b.com")])
            .with_row(vec![json!("L2"), json!(null), json!(5), json!("nobody")])
            .with_row(vec![json!("L1"), json!("c1"), json!(25), json!("a@b.com")])
            .with_row(vec![json!(null), json!("c2"), json!(0), json!(null)])
            .with_row(vec![json!("L3"), json!("c2"), json!(40), json!("c@d.org")]);
        let daily = Frame::new(["campaign_id", "impressions", "conversions"])
            .with_row(vec![json!("c1"), json!(100), json!(10)])
            .with_row(vec![json!("c2"), json!(100), json!(30)]);
        let triples = Frame::new(["head", "relation", "tail"]).with_row(vec![
            json!("email_marketing"),
            json!("topic"),
            json!("Spring Sale"),
        ]);
        Arc::new(
            InMemoryProvider::new()
                .with_frame("leads", leads)
                .with_frame("campaign_daily", daily)
                .with_frame("semantic_kg_triples", triples),
        )
    }

    #[test]
    fn test_sample_ids_distinct_non_null() {
        let table = Table::Frame(
            Frame::new(["id"])
                .with_row(vec![json!(2)])
                .with_row(vec![json!(null)])
                .with_row(vec![json!("2")])
                .with_row(vec![json!(2)])
                .with_row(vec![json!(3)]),
        );
        assert_eq!(sample_ids(&table, 5), vec![json!(2), json!("2"), json!(3)]);
        assert_eq!(sample_ids(&table, 1), vec![json!(2)]);
    }

    #[test]
    fn test_action_record_shape() {
        let record = ActionRecord {
            agent: "engagement".to_string(),
            lead: Some(json!("L1")),
            outcome: ActionOutcome::Sent(Reply::failure("x")),
        };
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"agent": "engagement", "lead": "L1", "sent": {"error": "x"}})
        );

        let evaluation = ActionRecord {
            agent: "campaign_opt".to_string(),
            lead: None,
            outcome: ActionOutcome::Result(Reply::failure("y")),
        };
        assert_eq!(
            serde_json::to_value(&evaluation).unwrap(),
            json!({"agent": "campaign_opt", "result": {"error": "y"}})
        );
    }

    #[test]
    fn test_run_writes_log() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("run_log.json");
        let pipeline = Pipeline::new(
            provider(),
            LeadflowConfig::new().with_run_log_path(&out).with_sample_size(5),
        );

        let RunOutcome::Completed(log) = pipeline.run().unwrap() else {
            panic!("expected a completed run");
        };
        assert_eq!(log.actions.len(), 3 * 3 + 1);
        assert_eq!(log.actions[0].lead, Some(json!("L1")));
        assert_eq!(log.actions[3].lead, Some(json!("L2")));
        assert_eq!(log.actions[6].lead, Some(json!("L3")));
        assert_eq!(
            log.actions[1].outcome.reply().get("message"),
            Some(&json!("Hi! Personalized note about Spring Sale. (lead L1)"))
        );
        assert_eq!(
            log.actions[9].outcome.reply().get("top_campaigns"),
            Some(&json!([
                {"campaign_id": "c2", "conv_rate": 0.3},
                {"campaign_id": "c1", "conv_rate": 0.1}
            ]))
        );

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["run_id"], json!(log.run_id));
        assert_eq!(written["actions"][2]["sent"]["status"], json!("sent"));

        // classify + prepare + send (two episodes) per lead
        assert_eq!(pipeline.triage().memory().episodic.len(), 3);
        assert_eq!(pipeline.engagement().memory().episodic.len(), 9);
        assert_eq!(pipeline.optimizer().memory().episodic.len(), 1);
    }

    #[test]
    fn test_no_leads() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("run_log.json");
        let provider: Arc<dyn DataProvider> = Arc::new(
            InMemoryProvider::new().with_frame("leads", Frame::new(["lead_id"])),
        );
        let pipeline = Pipeline::new(provider, LeadflowConfig::new().with_run_log_path(&out));

        assert_eq!(pipeline.run().unwrap(), RunOutcome::NoLeads);
        assert!(!out.exists());
    }
}
