//! # Bus Messages
//!
//! The contract a command type must meet to travel on the bus, and the
//! filter subscribers use to pick what they care about.

use shared_types::Domain;
use std::fmt::Debug;

/// A message routable on the command bus.
pub trait BusMessage: Clone + Debug + Send + Sync + 'static {
    /// Owning domain, used as the topic.
    fn topic(&self) -> Domain;

    /// Stable command name for logs and name-based filters.
    fn name(&self) -> &'static str;
}

/// Filter for subscribing to specific commands.
#[derive(Debug, Clone, Default)]
pub struct CommandFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<Domain>,
    /// Command names to include. Empty means all names.
    pub names: Vec<&'static str>,
}

impl CommandFilter {
    /// Create a filter that accepts everything.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<Domain>) -> Self {
        Self {
            topics,
            names: Vec::new(),
        }
    }

    /// Create a filter for specific command names.
    #[must_use]
    pub fn names(names: Vec<&'static str>) -> Self {
        Self {
            topics: Vec::new(),
            names,
        }
    }

    /// Check if a message matches this filter.
    #[must_use]
    pub fn matches<M: BusMessage>(&self, message: &M) -> bool {
        let topic_match = self.topics.is_empty() || self.topics.contains(&message.topic());
        let name_match = self.names.is_empty() || self.names.contains(&message.name());
        topic_match && name_match
    }
}
