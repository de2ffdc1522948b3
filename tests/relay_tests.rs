//! Tests for the stdio relay driven through `serve`.
#![allow(clippy::unwrap_used)]

use leadflow::config::LeadflowConfig;
use leadflow::pipeline::Pipeline;
use leadflow::provider::{DataProvider, Frame, InMemoryProvider};
use leadflow::server::{INTERNAL_ERROR, RelayServer, TABLE_NOT_FOUND};
use serde_json::{Value, json};
use std::sync::Arc;

fn relay() -> RelayServer {
    let leads = Frame::new(["lead_id", "campaign_id", "engagement_score", "email"])
        .with_row(vec![json!("L1"), json!("c1"), json!(25), json!("a@b.com")]);
    let triples = Frame::new(["head", "relation", "tail"]).with_row(vec![
        json!("email_marketing"),
        json!("topic"),
        json!("Loyalty Program"),
    ]);
    let provider: Arc<dyn DataProvider> = Arc::new(
        InMemoryProvider::new()
            .with_frame("leads", leads)
            .with_frame("semantic_kg_triples", triples),
    );
    let pipeline = Pipeline::new(provider, LeadflowConfig::new());
    pipeline.load_semantic().unwrap();
    RelayServer::new(pipeline)
}

fn session(server: &RelayServer, requests: &[Value]) -> Vec<Value> {
    let input: String = requests.iter().map(|r| format!("{r}\n")).collect();
    let mut output = Vec::new();
    server.serve(input.as_bytes(), &mut output).unwrap();
    std::str::from_utf8(&output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_session_keeps_agent_memory() {
    let server = relay();
    let responses = session(
        &server,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "agent/call", "params": {"agent": "triage", "method": "classify_lead", "params": {"lead_id": "L1"}}}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "agent/call", "params": {"agent": "engagement", "method": "prepare_outreach", "params": {"lead_id": "L1"}}}),
            json!({"jsonrpc": "2.0", "id": 3, "method": "agent/call", "params": {"agent": "Engagement", "method": "send_outreach", "params": {"lead_id": "L1", "message": "hi"}}}),
            json!({"jsonrpc": "2.0", "id": 4, "method": "agent/episodes", "params": {"agent": "engagement", "n": 2}}),
        ],
    );

    assert_eq!(responses.len(), 4);
    assert_eq!(responses[0]["result"]["label"], json!("Campaign Qualified"));
    assert_eq!(
        responses[1]["result"]["message"],
        json!("Hi! Personalized note about Loyalty Program. (lead L1)")
    );
    assert_eq!(responses[2]["result"]["status"], json!("sent"));

    let episodes = responses[3]["result"]["episodes"].as_array().unwrap();
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0]["event"], json!("sent"));
    assert_eq!(episodes[1]["method"], json!("send_outreach"));
    assert_eq!(server.pipeline().engagement().memory().episodic.len(), 3);
}

#[test]
fn test_collaborator_failures_map_to_codes() {
    let server = relay();
    let responses = session(
        &server,
        &[
            json!({"id": "a", "method": "query", "params": {"table": "campaign_daily"}}),
            json!({"id": "b", "method": "agent/call", "params": {"agent": "campaign_opt", "method": "evaluate_campaigns"}}),
        ],
    );

    assert_eq!(responses[0]["id"], json!("a"));
    assert_eq!(responses[0]["error"]["code"], json!(TABLE_NOT_FOUND));
    assert_eq!(responses[1]["error"]["code"], json!(TABLE_NOT_FOUND));
    assert_ne!(responses[1]["error"]["code"], json!(INTERNAL_ERROR));
    assert!(server.pipeline().optimizer().memory().episodic.is_empty());
}

#[test]
fn test_query_returns_count_and_records() {
    let responses = session(
        &relay(),
        &[json!({"id": 1, "method": "query", "params": {"table": "leads", "filters": {"lead_id": "L1"}}})],
    );
    assert_eq!(responses[0]["result"]["count"], json!(1));
    assert_eq!(responses[0]["result"]["records"][0]["email"], json!("a@b.com"));
}
