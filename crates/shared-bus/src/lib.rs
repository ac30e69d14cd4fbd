//! # Shared Bus - Command Bus Between Store and Effects
//!
//! Every command dispatched to the store is republished here after its
//! transition has been applied. Effect handlers subscribe by domain topic,
//! perform I/O, and dispatch their follow-up commands back into the store.
//!
//! ```text
//! ┌──────────────┐   dispatch()   ┌──────────────┐
//! │ Collaborator │ ─────────────→ │    Store     │
//! └──────────────┘                │ (transition) │
//!                                 └──────┬───────┘
//!                                        │ publish()
//!                                        ▼
//!                                 ┌──────────────┐
//!                                 │ Command Bus  │
//!                                 └──────┬───────┘
//!                                        │ subscribe(topics)
//!                                        ▼
//!                                 ┌──────────────┐
//!                                 │   Effects    │ ── follow-up ──→ Store
//!                                 └──────────────┘
//! ```
//!
//! The bus is generic over the message type so that it carries no knowledge
//! of the concrete command enums.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{BusMessage, CommandFilter};
pub use publisher::{CommandPublisher, InMemoryCommandBus};
pub use subscriber::{CommandStream, Subscription, SubscriptionError};

/// Commands buffered per stream before the slowest one lags.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::BusMessage;
    use shared_types::Domain;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Ping {
        Login,
        LoadTasks,
        LoadProjects,
    }

    impl BusMessage for Ping {
        fn topic(&self) -> Domain {
            match self {
                Ping::Login => Domain::Auth,
                Ping::LoadTasks => Domain::Tasks,
                Ping::LoadProjects => Domain::Projects,
            }
        }

        fn name(&self) -> &'static str {
            match self {
                Ping::Login => "login",
                Ping::LoadTasks => "load-tasks",
                Ping::LoadProjects => "load-projects",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(DEFAULT_CHANNEL_CAPACITY, 1024);
    }
}
