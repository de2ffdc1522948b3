//! Method registry.
//!
//! Maps method names to typed handlers. A registry is built once per agent
//! from its [`AgentRole`](super::AgentRole) and never changes afterwards.
//!
//! # Adding a method
//!
//! 1. Write a handler `fn(&Agent, &Record) -> Result<Reply>` in a policy module
//! 2. Register it in [`AgentRole::registry`](super::AgentRole::registry)

use super::Agent;
use crate::Result;
use crate::models::{Record, Reply};
use std::collections::BTreeMap;
use std::fmt;

/// A method handler.
///
/// Receives the agent it runs on and the raw request params; decodes the
/// params itself.
pub type Handler = fn(&Agent, &Record) -> Result<Reply>;

/// Registry of the methods an agent answers.
#[derive(Clone, Default)]
pub struct MethodRegistry {
    handlers: BTreeMap<&'static str, Handler>,
}

impl MethodRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under `name`, replacing any previous one.
    #[must_use]
    pub fn register(mut self, name: &'static str, handler: Handler) -> Self {
        self.handlers.insert(name, handler);
        self
    }

    /// Looks up a handler.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Handler> {
        self.handlers.get(name).copied()
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Returns the registered method names in sorted order.
    #[must_use]
    pub fn methods(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }
}

impl fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("methods", &self.methods())
            .finish()
    }
}
