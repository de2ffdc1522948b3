//! Engagement policy.
//!
//! Plans an outreach message from the semantic graph and records sends.

use super::{Agent, parse_args};
use crate::Result;
use crate::models::{
    EMAIL_CHANNEL, Episode, OutreachPlan, Record, Reply, SendReceipt, display_value, entity_key,
    now_iso,
};
use serde::Deserialize;
use serde_json::Value;

/// Semantic head whose first neighbor supplies the topic hint.
pub const TOPIC_HEAD: &str = "email_marketing";

/// Topic used when the graph has no hint.
pub const DEFAULT_TOPIC: &str = "Product Intro";

/// Status reported for every send.
pub const SENT_STATUS: &str = "sent";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PrepareArgs {
    #[serde(default)]
    lead_id: Value,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SendArgs {
    #[serde(default)]
    lead_id: Value,
    #[serde(default)]
    message: Value,
}

/// Handler for `prepare_outreach`.
pub(super) fn prepare_outreach(agent: &Agent, params: &Record) -> Result<Reply> {
    let args: PrepareArgs = parse_args(params)?;
    let key = entity_key(&args.lead_id);

    let profile = agent.memory().long_term.get_profile(&key);
    let context = agent.memory().short_term.get_context(&key);
    tracing::debug!(
        lead_id = %key,
        profile_keys = profile.len(),
        context_keys = context.len(),
        "Loaded lead state"
    );

    let hint = topic_hint(agent);
    let plan = OutreachPlan {
        message: compose_message(&hint, &args.lead_id),
        lead_id: args.lead_id,
        channel: EMAIL_CHANNEL.to_string(),
        planned_at: now_iso(),
    };

    tracing::info!(lead_id = %key, topic = %hint, "Prepared outreach");
    Reply::success(&plan)
}

/// Handler for `send_outreach`.
///
/// Delivery is simulated and always succeeds. Records a `sent` event on top
/// of the dispatch episode.
pub(super) fn send_outreach(agent: &Agent, params: &Record) -> Result<Reply> {
    let args: SendArgs = parse_args(params)?;
    let key = entity_key(&args.lead_id);
    let now = now_iso();

    let mut context = Record::new();
    context.insert("last_message".to_string(), args.message.clone());
    context.insert("last_sent".to_string(), Value::String(now.clone()));
    agent.memory().short_term.set_context(&key, context);

    agent
        .memory()
        .episodic
        .add_episode(Episode::sent(args.lead_id.clone(), args.message));

    tracing::info!(lead_id = %key, "Sent outreach");
    Reply::success(&SendReceipt {
        lead_id: args.lead_id,
        status: SENT_STATUS.to_string(),
        time: now,
    })
}

/// Returns the tail of the first `email_marketing` neighbor, if any.
fn topic_hint(agent: &Agent) -> String {
    agent
        .memory()
        .semantic
        .neighbors(TOPIC_HEAD)
        .into_iter()
        .next()
        .map_or_else(|| DEFAULT_TOPIC.to_string(), |(_, tail)| tail)
}

/// Builds the outreach text for a lead.
#[must_use]
pub fn compose_message(hint: &str, lead_id: &Value) -> String {
    format!(
        "Hi! Personalized note about {hint}. (lead {})",
        display_value(lead_id)
    )
}
