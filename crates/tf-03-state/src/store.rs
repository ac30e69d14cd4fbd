//! # Store
//!
//! Single owner of [`AppState`]. Every command goes through
//! [`Store::dispatch`]:
//!
//! ```text
//! dispatch(cmd)
//!   ├─ lock
//!   ├─ state = reduce(state, &cmd)
//!   ├─ snapshot watchers see the new state
//!   ├─ bus subscribers (effects) see cmd
//!   └─ unlock
//! ```
//!
//! Holding the lock across all three steps gives every observer the same
//! total order of commands, and a subscriber that reads [`Store::state`]
//! after receiving a command always sees that command applied.

use crate::commands::{Command, TimeTrackingCommand};
use crate::domain::{reduce, AppState};
use parking_lot::Mutex;
use shared_bus::{BusMessage, CommandFilter, CommandPublisher, InMemoryCommandBus, Subscription};
use std::sync::Arc;
use tokio::sync::watch;

pub struct Store {
    state: Mutex<Arc<AppState>>,
    snapshots: watch::Sender<Arc<AppState>>,
    bus: Arc<InMemoryCommandBus<Command>>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("subscribers", &self.bus.subscriber_count())
            .finish_non_exhaustive()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl Store {
    pub fn new(initial: AppState) -> Self {
        Self::with_bus(initial, Arc::new(InMemoryCommandBus::new()))
    }

    pub fn with_bus(initial: AppState, bus: Arc<InMemoryCommandBus<Command>>) -> Self {
        let initial = Arc::new(initial);
        let (snapshots, _) = watch::channel(initial.clone());
        Self {
            state: Mutex::new(initial),
            snapshots,
            bus,
        }
    }

    /// Apply `command` and announce it. Returns the new state.
    pub fn dispatch(&self, command: impl Into<Command>) -> Arc<AppState> {
        let command = command.into();
        let mut guard = self.state.lock();

        if let Command::TimeTracking(TimeTrackingCommand::StartTimer { task_id, .. }) = &command {
            if let Some(active) = &guard.time_tracking.active_timer {
                tracing::warn!(
                    running = %active.task_id,
                    starting = %task_id,
                    "timer already running, replacing it"
                );
            }
        }

        let next = Arc::new(reduce((**guard).clone(), &command));
        *guard = next.clone();
        self.snapshots.send_replace(next.clone());

        tracing::trace!(topic = command.topic().as_str(), command = command.name(), "dispatched");
        self.bus.publish(command);
        next
    }

    /// Current state.
    pub fn state(&self) -> Arc<AppState> {
        self.state.lock().clone()
    }

    /// Project a value out of the current state.
    pub fn select<T>(&self, f: impl FnOnce(&AppState) -> T) -> T {
        f(&self.state())
    }

    /// Receiver that always holds the latest state.
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.snapshots.subscribe()
    }

    /// Commands dispatched from now on that match `filter`.
    pub fn commands(&self, filter: CommandFilter) -> Subscription<Command> {
        self.bus.subscribe(filter)
    }

    pub fn bus(&self) -> &Arc<InMemoryCommandBus<Command>> {
        &self.bus
    }
}
