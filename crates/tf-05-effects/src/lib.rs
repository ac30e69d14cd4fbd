//! # TF-05 Effects
//!
//! Turns effect-bearing commands into API calls and dispatches the
//! follow-up `...Success` / `...Failure` command back into the store.
//!
//! ## Architecture
//!
//! ```text
//!   Store ──commands──► handler (per domain) ──► ports::*Api ──► RestBackend ──► ApiClient
//!     ▲                        │                                                (middleware)
//!     └──── follow-up ─────────┘
//! ```
//!
//! ## Handlers
//!
//! | Handler | Domain | Extra |
//! |---------|--------|-------|
//! | `AuthEffects` | auth | session storage, notifications |
//! | `ProjectEffects` | projects | tag / date-range loads |
//! | `ProjectListEffects` | project list | debounced refetch, prefetch |
//! | `TaskEffects` | tasks | kanban reorder and moves |
//! | `TimeTrackingEffects` | time tracking | none |
//!
//! Every effect moves its family through `Pending` and on to `Succeeded` or
//! `Failed` in the shared [`PhaseTracker`]. Loads carry a generation ticket
//! and, under [`StaleResponsePolicy::DiscardSuperseded`], a response that is
//! no longer the latest is dropped.

#![warn(clippy::all)]
#![deny(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod handlers;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryBackend, RestBackend, StoreTokenProvider};
pub use domain::{
    plan_reorder, ConfigError, EffectFamily, EffectPhase, EffectsConfig, GenerationCounter,
    NotifyOn, PhaseTracker, ReorderError, StaleResponsePolicy, Ticket,
};
pub use handlers::auth::AuthEffects;
pub use handlers::project_list::ProjectListEffects;
pub use handlers::projects::ProjectEffects;
pub use handlers::tasks::TaskEffects;
pub use handlers::time_tracking::TimeTrackingEffects;
pub use handlers::{EffectContext, EffectHandler};
pub use ports::{
    AuthApi, ProjectSelection, ProjectsApi, ReorderTasksRequest, TasksApi, TimeEntriesApi,
};
pub use service::{Backends, EffectsRuntime};
