//! # Client Container
//!
//! Owns every long-lived piece of the client and builds them in dependency
//! order.
//!
//! ## Startup Sequence
//!
//! 1. Validate configuration
//! 2. Open session storage (file or memory)
//! 3. Restore the session into the initial state
//! 4. Create the store
//! 5. Build the middleware chain around the transport
//! 6. Start the effect handlers

use crate::config::ClientConfig;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tf_02_request_middleware::{
    ApiClient, ChainPorts, MiddlewareStack, NoCsrfMeta, Notifier, ReqwestTransport,
    TracingNotifier,
};
use tf_03_state::{
    AppState, FileSessionStorage, MemorySessionStorage, ProjectListState, SessionManager,
    SessionStorage, Store,
};
use tf_04_derived_views::{DashboardSummary, Views};
use tf_05_effects::{Backends, EffectContext, EffectsRuntime, RestBackend, StoreTokenProvider};
use tracing::info;

/// Session storage chosen by configuration.
pub fn open_storage(config: &ClientConfig) -> Result<Arc<dyn SessionStorage>> {
    match &config.session_file {
        Some(path) => {
            let storage = FileSessionStorage::open(path)
                .with_context(|| format!("failed to open session file {}", path.display()))?;
            info!(path = %path.display(), "using file session storage");
            Ok(Arc::new(storage))
        }
        None => {
            info!("using in-memory session storage");
            Ok(Arc::new(MemorySessionStorage::new()))
        }
    }
}

/// The running client.
pub struct ClientContainer {
    config: ClientConfig,
    store: Arc<Store>,
    session: Arc<SessionManager>,
    views: Views,
    effects: EffectsRuntime,
}

impl ClientContainer {
    /// Wire the client against the REST API. Must be called inside a tokio
    /// runtime.
    pub fn start(config: ClientConfig) -> Result<Self> {
        config.validate().context("invalid configuration")?;
        let storage = open_storage(&config)?;
        let (store, session) = Self::restore(&config, storage, Utc::now());

        let middleware = config.middleware();
        let transport = ReqwestTransport::new(middleware.request_timeout())
            .context("failed to build http client")?;
        let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
        let ports = ChainPorts {
            notifier: Arc::clone(&notifier),
            csrf_source: Arc::new(NoCsrfMeta),
            token_provider: Arc::new(StoreTokenProvider::new(Arc::clone(&store))),
        };
        let service = MiddlewareStack::from_config(&middleware, ports).service(transport);
        let client = Arc::new(ApiClient::new(middleware.base_url.clone(), service));
        info!(base_url = %middleware.base_url, "middleware chain ready");

        let backends = Backends::shared(Arc::new(RestBackend::new(client)));
        Ok(Self::assemble(config, store, session, backends, notifier))
    }

    /// Wire the client against caller-supplied backends and storage.
    pub fn with_backends(
        config: ClientConfig,
        backends: Backends,
        storage: Arc<dyn SessionStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (store, session) = Self::restore(&config, storage, Utc::now());
        Self::assemble(config, store, session, backends, notifier)
    }

    fn restore(
        config: &ClientConfig,
        storage: Arc<dyn SessionStorage>,
        now: DateTime<Utc>,
    ) -> (Arc<Store>, Arc<SessionManager>) {
        let session = Arc::new(SessionManager::new(storage));
        let snapshot = session.bootstrap(now);
        info!(signed_in = snapshot.is_signed_in(), "session bootstrap finished");
        let state = AppState {
            project_list: ProjectListState::with_page_size(config.page_size),
            ..AppState::with_auth(snapshot.into_auth_state())
        };
        (Arc::new(Store::new(state)), session)
    }

    fn assemble(
        config: ClientConfig,
        store: Arc<Store>,
        session: Arc<SessionManager>,
        backends: Backends,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let context = EffectContext::new(Arc::clone(&store), notifier, config.effects());
        let effects = EffectsRuntime::start(context, backends, Arc::clone(&session));
        Self {
            config,
            store,
            session,
            views: Views::new(),
            effects,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn views(&self) -> &Views {
        &self.views
    }

    pub fn effects(&self) -> &EffectsRuntime {
        &self.effects
    }

    pub fn is_signed_in(&self) -> bool {
        self.store.select(|state| state.auth.is_authenticated)
    }

    /// Dashboard over the current state.
    pub fn dashboard(&self, now: DateTime<Utc>) -> Arc<DashboardSummary> {
        self.views.dashboard(&self.store.state(), now)
    }

    /// Wait until no effect is pending, or `timeout` passes. Returns whether
    /// the pipeline went quiet.
    pub async fn settle(&self, timeout: Duration) -> bool {
        let phases = Arc::clone(self.effects.phases());
        tokio::time::timeout(timeout, async move {
            loop {
                tokio::time::sleep(Duration::from_millis(10)).await;
                if phases.is_quiet() {
                    break;
                }
            }
        })
        .await
        .is_ok()
    }

    pub async fn shutdown(self) {
        self.effects.shutdown().await;
        info!("client stopped");
    }
}
