//! # Domain
//!
//! Slice states and their pure transition functions. Each slice owns one
//! [`EntityState`](tf_01_entity_store::EntityState) plus its loading,
//! error and criteria fields; [`reduce`] routes a [`Command`] to exactly
//! one slice and hands every other slice back untouched.
//!
//! ```text
//! Command::Tasks(c) ──► tasks::reduce(state.tasks, c) ──► AppState { tasks: new, ..old }
//! ```

pub mod auth;
pub mod criteria;
pub mod errors;
pub mod project_list;
pub mod projects;
pub mod tasks;
pub mod time_tracking;

pub use auth::AuthState;
pub use criteria::{DateRange, FilterValue, ProjectSort, TaskSort, TaskSortKey};
pub use errors::SessionError;
pub use project_list::{Pagination, ProjectListFilters, ProjectListState, DEFAULT_PAGE_SIZE};
pub use projects::ProjectsState;
pub use tasks::{TaskFilters, TasksState};
pub use time_tracking::{ActiveTimer, TimeTrackingState};

use crate::commands::Command;

/// Every slice of the client state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub auth: AuthState,
    pub projects: ProjectsState,
    pub project_list: ProjectListState,
    pub tasks: TasksState,
    pub time_tracking: TimeTrackingState,
}

impl AppState {
    /// Fresh state with a restored auth slice.
    pub fn with_auth(auth: AuthState) -> Self {
        Self {
            auth,
            ..Self::default()
        }
    }
}

/// Root transition. Deterministic: same state and command, same result.
pub fn reduce(state: AppState, command: &Command) -> AppState {
    match command {
        Command::Auth(c) => AppState {
            auth: auth::reduce(state.auth, c),
            ..state
        },
        Command::Projects(c) => AppState {
            projects: projects::reduce(state.projects, c),
            ..state
        },
        Command::ProjectList(c) => AppState {
            project_list: project_list::reduce(state.project_list, c),
            ..state
        },
        Command::Tasks(c) => AppState {
            tasks: tasks::reduce(state.tasks, c),
            ..state
        },
        Command::TimeTracking(c) => AppState {
            time_tracking: time_tracking::reduce(state.time_tracking, c),
            ..state
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{ProjectsCommand, TasksCommand};
    use shared_types::{Project, Task};

    fn seeded() -> AppState {
        let state = reduce(
            AppState::default(),
            &TasksCommand::LoadSuccess(vec![Task::new("A", "p1", "u1")]).into(),
        );
        reduce(
            state,
            &ProjectsCommand::LoadSuccess(vec![Project::new("P", "u1")]).into(),
        )
    }

    #[test]
    fn test_other_slices_keep_identity() {
        let before = seeded();
        let after = reduce(before.clone(), &TasksCommand::Load.into());
        assert!(after.tasks.loading);
        assert!(after.projects.entities.ptr_eq(&before.projects.entities));
        assert!(after.tasks.entities.ptr_eq(&before.tasks.entities));
        assert_eq!(after.auth, before.auth);
    }

    #[test]
    fn test_reduce_is_deterministic() {
        let state = seeded();
        let command: Command = ProjectsCommand::Search("web".into()).into();
        assert_eq!(reduce(state.clone(), &command), reduce(state, &command));
    }
}
