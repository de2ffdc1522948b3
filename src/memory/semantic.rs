//! Semantic triple graph.

use crate::models::Record;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// A `(head, relation, tail)` fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Triple {
    /// Subject of the fact.
    pub head: String,
    /// Relation name.
    pub relation: String,
    /// Object of the fact.
    pub tail: String,
}

/// Field names used to read triples out of table rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripleKeys {
    /// Field holding the head.
    pub head: String,
    /// Field holding the relation.
    pub relation: String,
    /// Field holding the tail.
    pub tail: String,
}

impl Default for TripleKeys {
    fn default() -> Self {
        Self::new("head", "relation", "tail")
    }
}

impl TripleKeys {
    /// Creates a key set.
    #[must_use]
    pub fn new(
        head: impl Into<String>,
        relation: impl Into<String>,
        tail: impl Into<String>,
    ) -> Self {
        Self {
            head: head.into(),
            relation: relation.into(),
            tail: tail.into(),
        }
    }
}

#[derive(Debug, Default)]
struct Graph {
    triples: Vec<Triple>,
    adjacency: HashMap<String, Vec<(String, String)>>,
}

/// Lightweight knowledge graph used for contextual hints.
///
/// Duplicates are kept and adjacency lists preserve insertion order.
#[derive(Debug, Default)]
pub struct SemanticMemory {
    graph: RwLock<Graph>,
}

impl SemanticMemory {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads one triple per row and returns how many were added.
    ///
    /// Missing or null fields become empty strings; non-string values use
    /// their JSON text.
    pub fn load_triples(&self, rows: &[Record], keys: &TripleKeys) -> usize {
        let mut graph = self.graph.write().unwrap_or_else(PoisonError::into_inner);
        for row in rows {
            let triple = Triple {
                head: field_text(row, &keys.head),
                relation: field_text(row, &keys.relation),
                tail: field_text(row, &keys.tail),
            };
            graph
                .adjacency
                .entry(triple.head.clone())
                .or_default()
                .push((triple.relation.clone(), triple.tail.clone()));
            graph.triples.push(triple);
        }
        rows.len()
    }

    /// Returns the `(relation, tail)` pairs recorded for `head`.
    #[must_use]
    pub fn neighbors(&self, head: &str) -> Vec<(String, String)> {
        self.graph
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .adjacency
            .get(head)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns every loaded triple in load order.
    #[must_use]
    pub fn triples(&self) -> Vec<Triple> {
        self.graph
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .triples
            .clone()
    }

    /// Returns the number of loaded triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .triples
            .len()
    }

    /// Returns true if no triple is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn field_text(row: &Record, key: &str) -> String {
    match row.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: serde_json::Value) -> Vec<Record> {
        values
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_neighbors_preserve_order_and_duplicates() {
        let sm = SemanticMemory::new();
        let loaded = sm.load_triples(
            &rows(json!([
                {"head": "email_marketing", "relation": "topic", "tail": "Spring Sale"},
                {"head": "email_marketing", "relation": "topic", "tail": "Webinar"},
                {"head": "email_marketing", "relation": "topic", "tail": "Spring Sale"},
                {"head": "social", "relation": "topic", "tail": "Giveaway"}
            ])),
            &TripleKeys::default(),
        );
        assert_eq!(loaded, 4);

        let neighbors = sm.neighbors("email_marketing");
        assert_eq!(
            neighbors,
            vec![
                ("topic".to_string(), "Spring Sale".to_string()),
                ("topic".to_string(), "Webinar".to_string()),
                ("topic".to_string(), "Spring Sale".to_string()),
            ]
        );
        assert_eq!(sm.len(), 4);
    }

    #[test]
    fn test_unknown_head_is_empty() {
        let sm = SemanticMemory::new();
        assert!(sm.neighbors("nothing").is_empty());
        assert!(sm.is_empty());
    }

    #[test]
    fn test_missing_fields_coerce_to_empty() {
        let sm = SemanticMemory::new();
        sm.load_triples(
            &rows(json!([{"head": "a"}, {"relation": "r", "tail": null}])),
            &TripleKeys::default(),
        );

        let triples = sm.triples();
        assert_eq!(triples[0].relation, "");
        assert_eq!(triples[0].tail, "");
        assert_eq!(triples[1].head, "");
        assert_eq!(sm.neighbors(""), vec![("r".to_string(), String::new())]);
    }

    #[test]
    fn test_custom_keys_and_non_string_values() {
        let sm = SemanticMemory::new();
        sm.load_triples(
            &rows(json!([{"s": "campaign", "p": "budget", "o": 1500}])),
            &TripleKeys::new("s", "p", "o"),
        );
        assert_eq!(
            sm.neighbors("campaign"),
            vec![("budget".to_string(), "1500".to_string())]
        );
    }
}
