//! Lead triage policy.
//!
//! Scores a lead from its row in the `leads` table and labels it.
//!
//! | Signal | Points |
//! |--------|--------|
//! | truthy `campaign_id` | +40 |
//! | truthy `engagement_score` that parses as an integer | + that integer |
//! | truthy `email` containing `@` | +10 |
//!
//! Labels follow [`LeadLabel::from_score`].

use super::{Agent, parse_args};
use crate::Result;
use crate::models::{
    LeadLabel, LeadProfile, Record, Reply, display_value, entity_key, is_truthy, now_iso,
    to_record,
};
use crate::provider::Table;
use serde::Deserialize;
use serde_json::{Value, json};

/// Table holding one row per lead.
pub const LEADS_TABLE: &str = "leads";

/// Failure message for an id with no row.
pub const LEAD_NOT_FOUND: &str = "lead not found";

/// Points for a lead attached to a campaign.
pub const CAMPAIGN_POINTS: i64 = 40;

/// Points for a lead with a usable email address.
pub const EMAIL_POINTS: i64 = 10;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassifyArgs {
    #[serde(default)]
    lead_id: Value,
}

/// Handler for `classify_lead`.
pub(super) fn classify_lead(agent: &Agent, params: &Record) -> Result<Reply> {
    let args: ClassifyArgs = parse_args(params)?;
    let leads = agent.provider().query(LEADS_TABLE, None)?;

    let Some(row) = find_lead_row(&leads, &args.lead_id) else {
        tracing::info!(lead_id = %display_value(&args.lead_id), "Lead not found");
        return Ok(Reply::failure(LEAD_NOT_FOUND));
    };

    let score = score_lead(&row);
    let label = LeadLabel::from_score(score);
    let profile = LeadProfile {
        lead_id: args.lead_id.clone(),
        label,
        score,
        last_classified: now_iso(),
    };
    let record = to_record(&profile)?;

    let key = entity_key(&args.lead_id);
    agent.memory().long_term.upsert_profile(&key, record.clone());

    let mut context = Record::new();
    context.insert("last_label".to_string(), json!(label));
    context.insert("last_score".to_string(), json!(score));
    agent.memory().short_term.set_context(&key, context);

    tracing::info!(lead_id = %key, score, label = %label, "Classified lead");
    Ok(Reply::Success(record))
}

/// Picks the lead identifier column of a frame.
///
/// The first column whose name contains both `lead` and `id`
/// (case-insensitive) wins; otherwise the first column.
#[must_use]
pub fn lead_id_column(columns: &[String]) -> Option<&str> {
    columns
        .iter()
        .find(|c| {
            let lower = c.to_lowercase();
            lower.contains("lead") && lower.contains("id")
        })
        .or_else(|| columns.first())
        .map(String::as_str)
}

/// Finds the first row for `lead_id`.
///
/// Frames match on [`lead_id_column`]. Row sequences match on a `lead_id`
/// or `id` field; a row carrying neither never matches. A null id matches
/// nothing.
#[must_use]
pub fn find_lead_row(table: &Table, lead_id: &Value) -> Option<Record> {
    if lead_id.is_null() {
        return None;
    }
    match table {
        Table::Frame(frame) => {
            let column = lead_id_column(frame.columns())?;
            let values = frame.column(column)?;
            let idx = values.iter().position(|v| *v == lead_id)?;
            frame.record(idx)
        },
        Table::Rows(rows) => rows
            .iter()
            .find(|row| {
                row.get("lead_id") == Some(lead_id) || row.get("id") == Some(lead_id)
            })
            .cloned(),
    }
}

/// Scores a lead row.
#[must_use]
pub fn score_lead(row: &Record) -> i64 {
    let truthy = |key: &str| row.get(key).filter(|v| is_truthy(v));
    let mut score: i64 = 0;

    if truthy("campaign_id").is_some() {
        score = score.saturating_add(CAMPAIGN_POINTS);
    }
    if let Some(points) = truthy("engagement_score").and_then(parse_engagement) {
        score = score.saturating_add(points);
    }
    if truthy("email").is_some_and(|email| display_value(email).contains('@')) {
        score = score.saturating_add(EMAIL_POINTS);
    }

    score
}

/// Reads an engagement score as an integer.
///
/// Integers pass through, finite floats truncate toward zero, booleans
/// count as 0 or 1, and strings are trimmed then parsed as a signed base-10
/// integer. Anything else yields `None`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_engagement(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
