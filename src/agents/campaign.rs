//! Campaign optimization policy.
//!
//! Ranks campaigns by mean daily conversion rate. Tables without both
//! `impressions` and `conversions` fall back to listing campaign ids.

use super::{Agent, parse_args};
use crate::Result;
use crate::models::{CampaignEvaluation, CampaignRank, Record, Reply};
use crate::provider::Table;
use serde::Deserialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Table holding daily campaign measurements.
pub const CAMPAIGN_TABLE: &str = "campaign_daily";

/// Number of campaigns returned when `top_n` is not given.
pub const DEFAULT_TOP_N: usize = 3;

const fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EvaluateArgs {
    #[serde(default = "default_top_n")]
    top_n: usize,
}

/// Handler for `evaluate_campaigns`.
pub(super) fn evaluate_campaigns(agent: &Agent, params: &Record) -> Result<Reply> {
    let args: EvaluateArgs = parse_args(params)?;
    let table = agent.provider().query(CAMPAIGN_TABLE, None)?;

    let evaluation = rank_campaigns(&table, args.top_n);
    tracing::info!(
        top_n = args.top_n,
        returned = evaluation.top_campaigns.len(),
        "Evaluated campaigns"
    );
    Reply::success(&evaluation)
}

/// Ranks the campaigns of a `campaign_daily` table.
#[must_use]
pub fn rank_campaigns(table: &Table, top_n: usize) -> CampaignEvaluation {
    let top_campaigns = if table.has_field("impressions") && table.has_field("conversions") {
        rank_by_rate(&table.records(), top_n)
    } else {
        distinct_campaigns(&table.records(), top_n)
    };
    CampaignEvaluation { top_campaigns }
}

/// Conversion rate of one row, undefined for zero impressions.
#[must_use]
pub fn conversion_rate(row: &Record) -> Option<f64> {
    let impressions = row.get("impressions").and_then(numeric)?;
    let conversions = row.get("conversions").and_then(numeric)?;
    if impressions == 0.0 {
        return None;
    }
    Some(conversions / impressions)
}

fn numeric(value: &Value) -> Option<f64> {
    value.as_f64().filter(|f| f.is_finite())
}

fn campaign_id(row: &Record) -> Option<&Value> {
    row.get("campaign_id").filter(|id| !id.is_null())
}

/// Grouping key for campaign ids.
///
/// Numbers group and order by value, ahead of strings; `1` and `"1"` are
/// distinct campaigns. Other JSON values group by their JSON text.
#[derive(Debug, Clone)]
enum GroupKey {
    Number(f64),
    Text(String),
    Other(String),
}

impl GroupKey {
    fn of(id: &Value) -> Self {
        match id {
            Value::Number(n) => n.as_f64().map_or_else(|| Self::Other(n.to_string()), Self::Number),
            Value::String(s) => Self::Text(s.clone()),
            other => Self::Other(other.to_string()),
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Text(_) => 1,
            Self::Other(_) => 2,
        }
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) | (Self::Other(a), Self::Other(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

struct Group {
    id: Value,
    sum: f64,
    count: u32,
}

impl Group {
    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}

fn rank_by_rate(rows: &[Record], top_n: usize) -> Vec<CampaignRank> {
    let mut groups: BTreeMap<GroupKey, Group> = BTreeMap::new();
    for row in rows {
        let Some(id) = campaign_id(row) else {
            continue;
        };
        let group = groups.entry(GroupKey::of(id)).or_insert_with(|| Group {
            id: id.clone(),
            sum: 0.0,
            count: 0,
        });
        if let Some(rate) = conversion_rate(row) {
            group.sum += rate;
            group.count += 1;
        }
    }

    let mut ranked: Vec<(Value, Option<f64>)> = groups
        .into_values()
        .map(|group| {
            let mean = group.mean();
            (group.id, mean)
        })
        .collect();
    ranked.sort_by(|(_, a), (_, b)| match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    ranked
        .into_iter()
        .take(top_n)
        .map(|(id, rate)| CampaignRank::rated(id, rate))
        .collect()
}

fn distinct_campaigns(rows: &[Record], top_n: usize) -> Vec<CampaignRank> {
    let mut seen = BTreeSet::new();
    rows.iter()
        .filter_map(campaign_id)
        .filter(|id| seen.insert(GroupKey::of(id)))
        .take(top_n)
        .map(|id| CampaignRank::unrated(id.clone()))
        .collect()
}
