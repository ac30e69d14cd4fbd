//! # Effect Handlers
//!
//! One handler per domain. Each owns a bus subscription filtered to the
//! request commands of its domain and performs the matching API call in a
//! task of its own, so slow calls never hold up later commands.
//!
//! ## Contract
//!
//! | Step | Where |
//! |------|-------|
//! | phase → Pending | [`EffectContext::begin`] |
//! | one API call | handler |
//! | flow-specific notification / session write | handler |
//! | exactly one follow-up dispatched, phase resolved | [`EffectContext::settle`] |
//!
//! A failure never escapes a handler: it always becomes the `...Failure`
//! command of its family.

pub mod auth;
pub mod project_list;
pub mod projects;
pub mod tasks;
pub mod time_tracking;

use crate::domain::{failure_message, EffectFamily, EffectsConfig, GenerationCounter, PhaseTracker, Ticket};
use async_trait::async_trait;
use shared_bus::{CommandFilter, Subscription};
use shared_types::ApiError;
use std::sync::Arc;
use tf_02_request_middleware::{Notification, Notifier};
use tf_03_state::{Command, Store};
use tracing::{debug, info, warn};

/// Everything a handler needs besides its API port.
#[derive(Clone)]
pub struct EffectContext {
    store: Arc<Store>,
    notifier: Arc<dyn Notifier>,
    phases: Arc<PhaseTracker>,
    generations: Arc<GenerationCounter>,
    config: EffectsConfig,
}

impl std::fmt::Debug for EffectContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EffectContext {
    pub fn new(store: Arc<Store>, notifier: Arc<dyn Notifier>, config: EffectsConfig) -> Self {
        Self {
            store,
            notifier,
            phases: Arc::new(PhaseTracker::new()),
            generations: Arc::new(GenerationCounter::new()),
            config,
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn phases(&self) -> &Arc<PhaseTracker> {
        &self.phases
    }

    pub fn config(&self) -> &EffectsConfig {
        &self.config
    }

    /// Enter `Pending` for the family of `trigger`.
    pub(crate) fn begin(&self, trigger: &Command) -> EffectFamily {
        let family = EffectFamily::of(trigger);
        self.phases.begin(family);
        debug!(family = %family, "effect started");
        family
    }

    /// Start a call that supersedes earlier calls of `family`.
    pub(crate) fn begin_superseding(&self, trigger: &Command, family: EffectFamily) -> (EffectFamily, Ticket) {
        let ticket = self.generations.issue(family);
        (self.begin(trigger), ticket)
    }

    /// Start a call whose response is only valid until the next superseding
    /// call of `family`, such as the next page of the current list.
    pub(crate) fn begin_following(&self, trigger: &Command, family: EffectFamily) -> (EffectFamily, Ticket) {
        let ticket = self.generations.follow(family);
        (self.begin(trigger), ticket)
    }

    pub(crate) fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    /// Resolve an effect: dispatch its one follow-up, then leave `Pending`.
    pub(crate) fn settle<T, C>(
        &self,
        family: EffectFamily,
        result: Result<T, ApiError>,
        fallback: &str,
        on_success: impl FnOnce(T) -> C,
        on_failure: impl FnOnce(String) -> C,
    ) where
        C: Into<Command>,
    {
        match result {
            Ok(value) => {
                info!(family = %family, "effect succeeded");
                self.store.dispatch(on_success(value));
                self.phases.finish(family, true);
            }
            Err(error) => {
                let message = failure_message(&error, fallback);
                warn!(
                    family = %family,
                    status = error.status,
                    path = %error.url,
                    error = %message,
                    "effect failed"
                );
                self.store.dispatch(on_failure(message));
                self.phases.finish(family, false);
            }
        }
    }

    /// Like [`settle`](Self::settle), but a superseded response is dropped
    /// when the stale-response policy says so.
    pub(crate) fn settle_latest<T, C>(
        &self,
        family: EffectFamily,
        ticket: Ticket,
        result: Result<T, ApiError>,
        fallback: &str,
        on_success: impl FnOnce(T) -> C,
        on_failure: impl FnOnce(String) -> C,
    ) where
        C: Into<Command>,
    {
        if !self
            .generations
            .admits(ticket, self.config.stale_response_policy)
        {
            self.phases.abandon(family);
            debug!(
                family = %family,
                generation = ticket.generation,
                "superseded response discarded"
            );
            return;
        }
        self.settle(family, result, fallback, on_success, on_failure);
    }
}

/// A domain's effects.
#[async_trait]
pub trait EffectHandler: Send + Sync + 'static {
    /// Log prefix.
    fn name(&self) -> &'static str;

    /// Commands the handler reacts to.
    fn filter(&self) -> CommandFilter;

    /// Perform the effect of one command. Commands without an effect are
    /// ignored.
    async fn handle(&self, command: Command);
}

/// Receive loop shared by the handlers without scheduling of their own.
pub(crate) async fn run_handler<H: EffectHandler>(handler: Arc<H>, mut subscription: Subscription<Command>) {
    info!("[{}] effect handler started", handler.name());
    while let Some(command) = subscription.recv().await {
        let handler = Arc::clone(&handler);
        tokio::spawn(async move { handler.handle(command).await });
    }
    info!("[{}] command bus closed, exiting", handler.name());
}
