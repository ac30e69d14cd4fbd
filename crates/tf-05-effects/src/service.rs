//! # Effects Runtime
//!
//! Starts one handler per domain against a shared [`EffectContext`].
//!
//! ## Startup
//!
//! 1. Subscribe every handler to the store's command bus
//! 2. Spawn the handler loops
//!
//! Subscribing happens before `start` returns, so a command dispatched right
//! after startup is never missed.

use crate::domain::PhaseTracker;
use crate::handlers::auth::AuthEffects;
use crate::handlers::project_list::ProjectListEffects;
use crate::handlers::projects::ProjectEffects;
use crate::handlers::tasks::TaskEffects;
use crate::handlers::time_tracking::TimeTrackingEffects;
use crate::handlers::{EffectContext, EffectHandler};
use crate::ports::{AuthApi, ProjectsApi, TasksApi, TimeEntriesApi};
use std::future::Future;
use std::sync::Arc;
use tf_03_state::SessionManager;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// API ports the handlers call.
#[derive(Clone)]
pub struct Backends {
    pub auth: Arc<dyn AuthApi>,
    pub projects: Arc<dyn ProjectsApi>,
    pub tasks: Arc<dyn TasksApi>,
    pub time_entries: Arc<dyn TimeEntriesApi>,
}

impl Backends {
    /// One backend serving every port.
    pub fn shared<B>(backend: Arc<B>) -> Self
    where
        B: AuthApi + ProjectsApi + TasksApi + TimeEntriesApi + 'static,
    {
        Self {
            auth: backend.clone(),
            projects: backend.clone(),
            tasks: backend.clone(),
            time_entries: backend,
        }
    }
}

/// Running effect handlers.
pub struct EffectsRuntime {
    context: EffectContext,
    shutdown_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl EffectsRuntime {
    /// Subscribe and spawn every handler. Must be called inside a tokio
    /// runtime.
    pub fn start(context: EffectContext, backends: Backends, session: Arc<SessionManager>) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let store = context.store().clone();
        let mut tasks = Vec::with_capacity(5);

        let auth = Arc::new(AuthEffects::new(context.clone(), backends.auth, session));
        let subscription = store.commands(auth.filter());
        tasks.push(supervise(auth.name(), auth.run(subscription), shutdown_rx.clone()));

        let projects = Arc::new(ProjectEffects::new(context.clone(), backends.projects.clone()));
        let subscription = store.commands(projects.filter());
        tasks.push(supervise(projects.name(), projects.run(subscription), shutdown_rx.clone()));

        let list = Arc::new(ProjectListEffects::new(context.clone(), backends.projects));
        let subscription = store.commands(list.filter());
        tasks.push(supervise(list.name(), list.run(subscription), shutdown_rx.clone()));

        let task_effects = Arc::new(TaskEffects::new(context.clone(), backends.tasks));
        let subscription = store.commands(task_effects.filter());
        tasks.push(supervise(
            task_effects.name(),
            task_effects.run(subscription),
            shutdown_rx.clone(),
        ));

        let time = Arc::new(TimeTrackingEffects::new(context.clone(), backends.time_entries));
        let subscription = store.commands(time.filter());
        tasks.push(supervise(time.name(), time.run(subscription), shutdown_rx));

        info!(handlers = tasks.len(), "effect handlers started");
        Self {
            context,
            shutdown_tx,
            tasks,
        }
    }

    pub fn context(&self) -> &EffectContext {
        &self.context
    }

    pub fn phases(&self) -> &Arc<PhaseTracker> {
        self.context.phases()
    }

    /// Stop every handler loop and wait for them to exit. Calls already in
    /// flight finish in their own tasks.
    pub async fn shutdown(mut self) {
        info!("stopping effect handlers");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("failed to send shutdown signal: {}", e);
        }
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    error!(error = %e, "effect handler panicked");
                }
            }
        }
        info!("effect handlers stopped");
    }
}

impl Drop for EffectsRuntime {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Run `handler` until it ends or shutdown is signalled.
fn supervise(
    name: &'static str,
    handler: impl Future<Output = ()> + Send + 'static,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            () = handler => {}
            _ = shutdown.changed() => {
                info!("[{}] shutdown signal received", name);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryBackend;
    use crate::domain::{EffectFamily, EffectPhase, EffectsConfig};
    use shared_types::{Domain, Task};
    use std::time::Duration;
    use tf_02_request_middleware::RecordingNotifier;
    use tf_03_state::{MemorySessionStorage, Store, TasksCommand};

    fn runtime(backend: InMemoryBackend) -> (Arc<Store>, EffectsRuntime) {
        let store = Arc::new(Store::default());
        let context = EffectContext::new(
            Arc::clone(&store),
            Arc::new(RecordingNotifier::new()),
            EffectsConfig::default(),
        );
        let session = Arc::new(SessionManager::new(Arc::new(MemorySessionStorage::new())));
        let runtime = EffectsRuntime::start(context, Backends::shared(Arc::new(backend)), session);
        (store, runtime)
    }

    #[tokio::test(start_paused = true)]
    async fn test_command_right_after_start_is_handled() {
        let (store, runtime) = runtime(InMemoryBackend::new().with_tasks([Task::new("A", "p1", "u1")]));
        store.dispatch(TasksCommand::Load);
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(store.state().tasks.entities.len(), 1);
        let load = EffectFamily::new(Domain::Tasks, "load");
        assert_eq!(runtime.phases().last_outcome(load), Some(EffectPhase::Succeeded));
        runtime.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_handling() {
        let backend = Arc::new(InMemoryBackend::new());
        let store = Arc::new(Store::default());
        let context = EffectContext::new(
            Arc::clone(&store),
            Arc::new(RecordingNotifier::new()),
            EffectsConfig::default(),
        );
        let session = Arc::new(SessionManager::new(Arc::new(MemorySessionStorage::new())));
        let runtime = EffectsRuntime::start(context, Backends::shared(backend.clone()), session);
        runtime.shutdown().await;

        store.dispatch(TasksCommand::Load);
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(backend.call_count("tasks.list"), 0);
        assert!(store.state().tasks.loading);
    }
}
