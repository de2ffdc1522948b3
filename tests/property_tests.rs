//! Property-based tests for the agent memory stores.
//!
//! Uses proptest to verify invariants across random inputs:
//! - Unseen ids read as empty mappings
//! - Profiles merge shallowly, contexts replace
//! - `recent(n)` returns the last `min(n, m)` episodes in order
//! - Adjacency keeps insertion order and duplicates
//! - Scoring never panics and labels follow thresholds

// Property tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used)]

use leadflow::agents::triage::score_lead;
use leadflow::models::LeadLabel;
use leadflow::{
    Episode, EpisodicMemory, LongTermMemory, Record, Reply, SemanticMemory, ShortTermMemory,
    TripleKeys,
};
use proptest::prelude::*;
use serde_json::{Value, json};
use std::collections::BTreeMap;

fn record(entries: &BTreeMap<String, i64>) -> Record {
    entries.iter().map(|(k, v)| (k.clone(), json!(v))).collect()
}

fn arb_entries() -> impl Strategy<Value = BTreeMap<String, i64>> {
    prop::collection::btree_map("[a-z]{1,6}", any::<i64>(), 0..8)
}

fn arb_cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|i| json!(i)),
        (-1.0e6f64..1.0e6).prop_map(|f| json!(f)),
        ".{0,12}".prop_map(Value::String),
    ]
}

proptest! {
    /// Property: reads of an unseen id never fail and are empty.
    #[test]
    fn prop_unseen_ids_are_empty(id in ".{0,20}") {
        prop_assert!(ShortTermMemory::new().get_context(&id).is_empty());
        prop_assert!(LongTermMemory::new().get_profile(&id).is_empty());
    }

    /// Property: upsert merges, later keys win, earlier keys survive.
    #[test]
    fn prop_upsert_is_shallow_merge(first in arb_entries(), second in arb_entries()) {
        let store = LongTermMemory::new();
        store.upsert_profile("L1", record(&first));
        store.upsert_profile("L1", record(&second));

        let mut expected = first.clone();
        expected.extend(second.clone());
        prop_assert_eq!(store.get_profile("L1"), record(&expected));
    }

    /// Property: set_context replaces the whole context.
    #[test]
    fn prop_set_context_replaces(first in arb_entries(), second in arb_entries()) {
        let store = ShortTermMemory::new();
        store.set_context("L1", record(&first));
        store.set_context("L1", record(&second));
        prop_assert_eq!(store.get_context("L1"), record(&second));
    }

    /// Property: recent(n) is the chronological tail of length min(n, m).
    #[test]
    fn prop_recent_is_tail(m in 0usize..40, n in 0usize..50) {
        let log = EpisodicMemory::new();
        for i in 0..m {
            log.add_episode(Episode::sent(json!(i), json!("msg")));
        }

        let recent = log.recent(n);
        prop_assert_eq!(recent.len(), m.min(n));
        let ids: Vec<Value> = recent
            .iter()
            .map(|e| serde_json::to_value(e).unwrap()["lead_id"].clone())
            .collect();
        let expected: Vec<Value> = (m - m.min(n)..m).map(|i| json!(i)).collect();
        prop_assert_eq!(ids, expected);
    }

    /// Property: neighbors keep insertion order and duplicates.
    #[test]
    fn prop_neighbors_preserve_order(tails in prop::collection::vec("[a-c]{1,2}", 0..20)) {
        let rows: Vec<Record> = tails
            .iter()
            .map(|t| {
                json!({"head": "h", "relation": "r", "tail": t})
                    .as_object()
                    .cloned()
                    .unwrap()
            })
            .collect();
        let graph = SemanticMemory::new();
        graph.load_triples(&rows, &TripleKeys::default());

        let neighbors: Vec<String> = graph.neighbors("h").into_iter().map(|(_, t)| t).collect();
        prop_assert_eq!(neighbors, tails);
        prop_assert!(graph.neighbors("other").is_empty());
    }

    /// Property: scoring accepts any cell values and labels by threshold.
    #[test]
    fn prop_score_total(
        campaign in arb_cell(),
        engagement in arb_cell(),
        email in arb_cell(),
    ) {
        let row: Record = [
            ("campaign_id".to_string(), campaign),
            ("engagement_score".to_string(), engagement),
            ("email".to_string(), email),
        ]
        .into_iter()
        .collect();

        let score = score_lead(&row);
        let label = LeadLabel::from_score(score);
        prop_assert_eq!(label == LeadLabel::CampaignQualified, score >= 60);
        prop_assert_eq!(label == LeadLabel::ColdLead, score < 30);
    }

    /// Property: a failure reply always serializes as an error mapping.
    #[test]
    fn prop_failure_shape(message in ".{0,40}") {
        let value = serde_json::to_value(Reply::failure(message.clone())).unwrap();
        prop_assert_eq!(value, json!({"error": message}));
    }
}
