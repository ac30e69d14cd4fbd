//! # Test Fixtures
//!
//! Entity builders plus [`ScriptedServer`], an in-process stand-in for the
//! REST API that sits where the HTTP transport would. Everything above it
//! (middleware chain, `ApiClient`, `RestBackend`, effects, store) is real.

use bytes::Bytes;
use http::{HeaderMap, Method, Response};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use shared_types::{ApiEnvelope, Project, ProjectStatus, Task, TaskStatus};
use std::collections::{HashMap, VecDeque};
use std::future::{ready, Ready};
use std::sync::Arc;
use std::time::Duration;
use tf_02_request_middleware::{
    ApiClient, ApiRequest, ApiResponse, ChainPorts, HttpFailure, MiddlewareConfig,
    MiddlewareStack, Notifier, RecordingNotifier, StaticCsrfToken, TokenProvider,
};
use tf_03_state::{AppState, MemorySessionStorage, SessionManager, Store};
use tf_05_effects::{
    Backends, EffectContext, EffectsConfig, EffectsRuntime, RestBackend, StoreTokenProvider,
};
use tokio::time::Instant;
use tower::Service;

pub const BASE_URL: &str = "http://localhost:3000/api";
pub const CSRF_TOKEN: &str = "csrf-fixture";

const API_PREFIX: &str = "/api";
const SETTLE_TIMEOUT: Duration = Duration::from_secs(60);

// =============================================================================
// ENTITIES
// =============================================================================

pub fn project(id: &str, status: ProjectStatus) -> Project {
    let mut p = Project::new(format!("Project {id}"), "owner-1");
    p.id = id.to_string();
    p.status = status;
    p
}

pub fn task(id: &str, status: TaskStatus, order: u32) -> Task {
    let mut t = Task::new(format!("Task {id}"), "p1", "owner-1");
    t.id = id.to_string();
    t.status = status;
    t.order = order;
    t
}

// =============================================================================
// SCRIPTED SERVER
// =============================================================================

/// One request as it reached the transport, after every middleware stage.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    pub at: Instant,
}

#[derive(Debug, Clone)]
enum Reply {
    Body(Value),
    Text(String),
    Status(u16),
}

#[derive(Default)]
struct Script {
    routes: HashMap<(Method, String), VecDeque<Reply>>,
    seen: Vec<SeenRequest>,
}

/// Replies are queued per route and consumed in order; the last one repeats.
/// Unscripted routes answer 404.
#[derive(Clone, Default)]
pub struct ScriptedServer {
    inner: Arc<Mutex<Script>>,
}

impl ScriptedServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a `{ data, success: true }` envelope around `data`.
    pub fn respond(&self, method: Method, path: &str, data: impl Serialize) -> &Self {
        let body = serde_json::to_value(ApiEnvelope::ok(data)).expect("serializable fixture");
        self.push(method, path, Reply::Body(body))
    }

    /// Queue a body sent as is, e.g. a paginated response.
    pub fn respond_raw(&self, method: Method, path: &str, body: impl Serialize) -> &Self {
        let body = serde_json::to_value(body).expect("serializable fixture");
        self.push(method, path, Reply::Body(body))
    }

    /// Queue a plain-text body, e.g. a CSV export.
    pub fn respond_text(&self, method: Method, path: &str, text: &str) -> &Self {
        self.push(method, path, Reply::Text(text.to_string()))
    }

    /// Queue `times` failures with `status`.
    pub fn fail(&self, method: Method, path: &str, status: u16, times: usize) -> &Self {
        for _ in 0..times {
            self.push(method.clone(), path, Reply::Status(status));
        }
        self
    }

    fn push(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.inner
            .lock()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.inner.lock().seen.clone()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<SeenRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    /// Gaps between consecutive attempts on one route.
    pub fn gaps(&self, method: Method, path: &str) -> Vec<Duration> {
        let times: Vec<Instant> = self
            .requests_to(method, path)
            .iter()
            .map(|r| r.at)
            .collect();
        times.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// The server as a transport service for the middleware chain.
    pub fn transport(
        &self,
    ) -> impl Service<
        ApiRequest,
        Response = ApiResponse,
        Error = HttpFailure,
        Future = Ready<Result<ApiResponse, HttpFailure>>,
    > + Clone
           + Send
           + 'static {
        let server = self.clone();
        tower::service_fn(move |req: ApiRequest| ready(server.answer(req)))
    }

    fn answer(&self, req: ApiRequest) -> Result<ApiResponse, HttpFailure> {
        let full_path = req.uri().path();
        let path = full_path.strip_prefix(API_PREFIX).unwrap_or(full_path).to_string();
        let uri = req.uri().to_string();

        let mut script = self.inner.lock();
        script.seen.push(SeenRequest {
            method: req.method().clone(),
            path: path.clone(),
            query: req.uri().query().map(str::to_string),
            headers: req.headers().clone(),
            body: req.body().clone(),
            at: Instant::now(),
        });

        let reply = match script.routes.get_mut(&(req.method().clone(), path)) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        match reply {
            Some(Reply::Body(body)) => Ok(Response::new(Bytes::from(body.to_string()))),
            Some(Reply::Text(text)) => Ok(Response::new(Bytes::from(text))),
            Some(Reply::Status(status)) => Err(HttpFailure::new(status, "scripted", uri)),
            None => Err(HttpFailure::new(404, "Not Found", uri)),
        }
    }
}

/// Bearer token that never changes.
pub struct FixedToken(pub &'static str);

impl TokenProvider for FixedToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.to_string())
    }
}

/// `ApiClient` over the full default chain in front of `server`.
pub fn api_client(
    server: &ScriptedServer,
    notifier: Arc<RecordingNotifier>,
    token_provider: Arc<dyn TokenProvider>,
) -> Arc<ApiClient> {
    let ports = ChainPorts {
        notifier,
        csrf_source: Arc::new(StaticCsrfToken(CSRF_TOKEN.to_string())),
        token_provider,
    };
    let service =
        MiddlewareStack::from_config(&MiddlewareConfig::default(), ports).service(server.transport());
    Arc::new(ApiClient::new(BASE_URL, service))
}

// =============================================================================
// WIRED RUNTIME
// =============================================================================

/// Store, chain and effect handlers wired against a [`ScriptedServer`].
pub struct RestRig {
    pub server: ScriptedServer,
    pub notifier: Arc<RecordingNotifier>,
    pub store: Arc<Store>,
    pub runtime: EffectsRuntime,
}

impl RestRig {
    pub fn start(server: ScriptedServer) -> Self {
        Self::with_state(server, AppState::default())
    }

    pub fn with_state(server: ScriptedServer, state: AppState) -> Self {
        let store = Arc::new(Store::new(state));
        let notifier = Arc::new(RecordingNotifier::new());
        let client = api_client(
            &server,
            Arc::clone(&notifier),
            Arc::new(StoreTokenProvider::new(Arc::clone(&store))),
        );
        let context_notifier: Arc<dyn Notifier> = notifier.clone();
        let context = EffectContext::new(Arc::clone(&store), context_notifier, EffectsConfig::default());
        let session = Arc::new(SessionManager::new(Arc::new(MemorySessionStorage::new())));
        let backends = Backends::shared(Arc::new(RestBackend::new(client)));
        let runtime = EffectsRuntime::start(context, backends, session);
        Self {
            server,
            notifier,
            store,
            runtime,
        }
    }

    /// Wait for every pending effect, retries included.
    pub async fn settle(&self) {
        let phases = Arc::clone(self.runtime.phases());
        let quiet = tokio::time::timeout(SETTLE_TIMEOUT, async move {
            loop {
                tokio::time::sleep(Duration::from_millis(10)).await;
                if phases.is_quiet() {
                    break;
                }
            }
        })
        .await;
        assert!(quiet.is_ok(), "effects still pending after {SETTLE_TIMEOUT:?}");
    }
}
