//! # Command Subscriber
//!
//! Defines the subscription side of the command bus.
//!
//! A [`Subscription`] owns an unbounded queue that the bus fills with
//! matching commands only, so a slow subscriber never loses a command.
//! A [`CommandStream`] reads the shared broadcast ring and may lag.

use crate::events::{BusMessage, CommandFilter};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::{debug, warn};

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The bus was dropped.
    #[error("Command bus closed")]
    Closed,
}

/// A subscription handle for receiving commands.
///
/// When dropped, the subscription is automatically cleaned up.
pub struct Subscription<M: BusMessage> {
    receiver: mpsc::UnboundedReceiver<M>,
    filter: CommandFilter,
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,
    topic_key: String,
}

impl<M: BusMessage> Subscription<M> {
    pub(crate) fn new(
        receiver: mpsc::UnboundedReceiver<M>,
        filter: CommandFilter,
        subscriptions: Arc<RwLock<HashMap<String, usize>>>,
        topic_key: String,
    ) -> Self {
        Self {
            receiver,
            filter,
            subscriptions,
            topic_key,
        }
    }

    /// Receive the next command that matches the filter.
    ///
    /// Returns `None` once the bus has been dropped.
    pub async fn recv(&mut self) -> Option<M> {
        self.receiver.recv().await
    }

    /// Receive without waiting.
    ///
    /// `Ok(None)` means nothing matching is queued right now.
    pub fn try_recv(&mut self) -> Result<Option<M>, SubscriptionError> {
        match self.receiver.try_recv() {
            Ok(message) => Ok(Some(message)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(SubscriptionError::Closed),
        }
    }

    #[must_use]
    pub fn filter(&self) -> &CommandFilter {
        &self.filter
    }
}

impl<M: BusMessage> Drop for Subscription<M> {
    fn drop(&mut self) {
        let mut subs = self.subscriptions.write();
        if let Some(count) = subs.get_mut(&self.topic_key) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                subs.remove(&self.topic_key);
            }
        }
        debug!(topic = %self.topic_key, "Subscription dropped");
    }
}

/// A filtered `Stream` over the bus.
pub struct CommandStream<M: BusMessage> {
    inner: BroadcastStream<M>,
    filter: CommandFilter,
}

impl<M: BusMessage> CommandStream<M> {
    pub(crate) fn new(receiver: broadcast::Receiver<M>, filter: CommandFilter) -> Self {
        Self {
            inner: BroadcastStream::new(receiver),
            filter,
        }
    }

    #[must_use]
    pub fn filter(&self) -> &CommandFilter {
        &self.filter
    }
}

impl<M: BusMessage> Stream for CommandStream<M> {
    type Item = M;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(message))) => {
                    if self.filter.matches(&message) {
                        return Poll::Ready(Some(message));
                    }
                }
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(count)))) => {
                    warn!(lagged = count, "Command stream lagged");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
