//! # TF-03 State
//!
//! Closed command set, slice states, pure transition functions and the
//! dispatching [`Store`].
//!
//! ## Architecture
//!
//! ```text
//!  collaborators / effects
//!            │ Command
//!            ▼
//! ┌──────────────────────┐      ┌─────────────────────────────┐
//! │        Store         │─────►│ domain::reduce (pure)       │
//! │  Mutex<Arc<AppState>>│◄─────│ one slice per command       │
//! └──────┬────────┬──────┘      └─────────────────────────────┘
//!        │        │
//!  watch (state)  InMemoryCommandBus (commands)
//!        │        │
//!     views     effects
//! ```
//!
//! ## Slices
//!
//! | Slice | Entities | Extra |
//! |-------|----------|-------|
//! | auth | none | user, tokens, message |
//! | projects | `Project` | selected, filter, search, sort |
//! | project_list | `Project` | filters, sort, pagination, selection, prefetched page |
//! | tasks | `Task` | filters, sort |
//! | time_tracking | `TimeEntry` | active timer |
//!
//! [`SessionManager`] restores the auth slice from [`SessionStorage`] at
//! startup.

#![warn(clippy::all)]
#![deny(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod commands;
pub mod domain;
pub mod ports;
pub mod session;
pub mod store;

pub use adapters::{FileSessionStorage, MemorySessionStorage};
pub use commands::{
    AuthCommand, Command, PaginationPatch, ProjectListCommand, ProjectListFiltersPatch,
    ProjectPage, ProjectsCommand, TaskFiltersPatch, TasksCommand, TimeTrackingCommand,
};
pub use domain::{
    reduce, ActiveTimer, AppState, AuthState, DateRange, FilterValue, Pagination,
    ProjectListFilters, ProjectListState, ProjectSort, ProjectsState, SessionError, TaskFilters,
    TaskSort, TaskSortKey, TasksState, TimeTrackingState, DEFAULT_PAGE_SIZE,
};
pub use ports::{SessionStorage, StorageKey};
pub use session::{is_token_expired, jwt_expiry, SessionManager, SessionSnapshot};
pub use store::Store;
