//! Agent memory layers.
//!
//! Every agent owns one [`AgentMemory`] made of four independent stores:
//!
//! | Store | Keyed by | Write semantics |
//! |-------|----------|-----------------|
//! | [`ShortTermMemory`] | entity id | replace whole context |
//! | [`LongTermMemory`] | entity id | shallow merge into profile |
//! | [`EpisodicMemory`] | - | append-only, unbounded |
//! | [`SemanticMemory`] | triple head | bulk load, duplicates kept |
//!
//! Each store keeps its backing structure behind a lock and exposes only
//! request/response style operations. A single operation is atomic; an
//! [`crate::Agent`] serializes whole calls so the writes of one call stay
//! together.

mod episodic;
mod long_term;
mod semantic;
mod short_term;

pub use episodic::{DEFAULT_RECENT, EpisodicMemory};
pub use long_term::LongTermMemory;
pub use semantic::{SemanticMemory, Triple, TripleKeys};
pub use short_term::ShortTermMemory;

/// The four memory stores owned by one agent.
#[derive(Debug, Default)]
pub struct AgentMemory {
    /// Transient per-entity context.
    pub short_term: ShortTermMemory,
    /// Durable per-entity profiles.
    pub long_term: LongTermMemory,
    /// Ordered log of episodes.
    pub episodic: EpisodicMemory,
    /// Triple graph for contextual hints.
    pub semantic: SemanticMemory,
}

impl AgentMemory {
    /// Creates an empty memory bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
