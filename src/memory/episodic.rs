//! Episodic log.

use crate::models::Episode;
use std::sync::{Mutex, PoisonError};

/// Number of episodes returned by [`EpisodicMemory::recent`] callers that
/// do not pick a count.
pub const DEFAULT_RECENT: usize = 10;

/// Append-only, ordered log of episodes.
///
/// The log is unbounded: nothing is ever evicted, so a long-running agent
/// grows it without limit.
#[derive(Debug, Default)]
pub struct EpisodicMemory {
    episodes: Mutex<Vec<Episode>>,
}

impl EpisodicMemory {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an episode.
    pub fn add_episode(&self, episode: Episode) {
        self.episodes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(episode);
    }

    /// Returns the last `n` episodes in chronological order.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<Episode> {
        let episodes = self.episodes.lock().unwrap_or_else(PoisonError::into_inner);
        let start = episodes.len().saturating_sub(n);
        episodes[start..].to_vec()
    }

    /// Returns every episode in chronological order.
    #[must_use]
    pub fn all(&self) -> Vec<Episode> {
        self.episodes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of episodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.episodes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn numbered(n: usize) -> Episode {
        Episode::sent(json!(format!("L{n}")), json!("m"))
    }

    fn lead_of(episode: &Episode) -> serde_json::Value {
        match episode {
            Episode::Event { lead_id, .. } => lead_id.clone(),
            Episode::Dispatch { .. } => serde_json::Value::Null,
        }
    }

    #[test]
    fn test_recent_returns_tail_in_order() {
        let epm = EpisodicMemory::new();
        for i in 0..15 {
            epm.add_episode(numbered(i));
        }

        let recent = epm.recent(DEFAULT_RECENT);
        assert_eq!(recent.len(), 10);
        assert_eq!(lead_of(&recent[0]), json!("L5"));
        assert_eq!(lead_of(&recent[9]), json!("L14"));
    }

    #[test]
    fn test_recent_shorter_log() {
        let epm = EpisodicMemory::new();
        epm.add_episode(numbered(0));
        epm.add_episode(numbered(1));

        let recent = epm.recent(5);
        assert_eq!(recent.len(), 2);
        assert_eq!(lead_of(&recent[0]), json!("L0"));
        assert!(epm.recent(0).is_empty());
    }

    #[test]
    fn test_len_and_all() {
        let epm = EpisodicMemory::new();
        assert!(epm.is_empty());
        epm.add_episode(numbered(0));
        assert_eq!(epm.len(), 1);
        assert_eq!(epm.all().len(), 1);
    }
}
