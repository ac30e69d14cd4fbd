//! # Command Publisher
//!
//! Defines the publishing side of the command bus.

use crate::events::{BusMessage, CommandFilter};
use crate::subscriber::{CommandStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, trace};

/// Trait for publishing commands to the bus.
pub trait CommandPublisher<M: BusMessage>: Send + Sync {
    /// Publish a command.
    ///
    /// Returns the number of active subscribers that received it.
    fn publish(&self, message: M) -> usize;

    /// Total commands published.
    fn commands_published(&self) -> u64;
}

/// Queue feeding one [`Subscription`].
struct Queue<M> {
    filter: CommandFilter,
    sender: mpsc::UnboundedSender<M>,
}

/// In-memory implementation of the command bus.
///
/// Subscriptions get their own unbounded queue and only the commands their
/// filter accepts. Streams share a `tokio::sync::broadcast` ring.
pub struct InMemoryCommandBus<M: BusMessage> {
    /// Broadcast sender for streams.
    sender: broadcast::Sender<M>,

    /// Lossless per-subscription queues.
    queues: RwLock<Vec<Queue<M>>>,

    /// Active subscription count by topic key.
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,

    /// Total commands published.
    commands_published: AtomicU64,

    /// Ring capacity for streams.
    capacity: usize,
}

impl<M: BusMessage> InMemoryCommandBus<M> {
    /// Create a new bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new bus with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            queues: RwLock::new(Vec::new()),
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            commands_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to commands matching a filter.
    #[must_use]
    pub fn subscribe(&self, filter: CommandFilter) -> Subscription<M> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.queues.write().push(Queue {
            filter: filter.clone(),
            sender,
        });
        let topic_key = format!("{:?}/{:?}", filter.topics, filter.names);

        *self
            .subscriptions
            .write()
            .entry(topic_key.clone())
            .or_insert(0) += 1;

        debug!(topics = ?filter.topics, names = ?filter.names, "New subscription created");

        Subscription::new(receiver, filter, self.subscriptions.clone(), topic_key)
    }

    /// Stream of commands matching a filter.
    #[must_use]
    pub fn command_stream(&self, filter: CommandFilter) -> CommandStream<M> {
        CommandStream::new(self.sender.subscribe(), filter)
    }

    /// Number of live subscriptions and streams.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let queues = self
            .queues
            .read()
            .iter()
            .filter(|queue| !queue.sender.is_closed())
            .count();
        queues + self.sender.receiver_count()
    }

    /// Live subscriptions grouped by filter key.
    #[must_use]
    pub fn subscriptions_by_filter(&self) -> HashMap<String, usize> {
        self.subscriptions.read().clone()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<M: BusMessage> Default for InMemoryCommandBus<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: BusMessage> CommandPublisher<M> for InMemoryCommandBus<M> {
    fn publish(&self, message: M) -> usize {
        let topic = message.topic();
        let name = message.name();

        self.commands_published.fetch_add(1, Ordering::Relaxed);

        let mut delivered = 0;
        let mut closed = false;
        for queue in self.queues.read().iter() {
            if !queue.filter.matches(&message) {
                continue;
            }
            if queue.sender.send(message.clone()).is_ok() {
                delivered += 1;
            } else {
                closed = true;
            }
        }
        if closed {
            self.queues.write().retain(|queue| !queue.sender.is_closed());
        }

        // Err means no stream is listening. Normal for pure state commands.
        delivered += self.sender.send(message).unwrap_or(0);
        trace!(topic = %topic, command = name, receivers = delivered, "Command published");
        delivered
    }

    fn commands_published(&self) -> u64 {
        self.commands_published.load(Ordering::Relaxed)
    }
}
