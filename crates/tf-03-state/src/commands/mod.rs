//! # Commands
//!
//! One closed enum per domain, wrapped by [`Command`]. Every command a
//! collaborator or an effect can submit is a variant here, so the
//! transition functions match exhaustively.
//!
//! | Family | Trigger | Follow-ups |
//! |--------|---------|-----------|
//! | request | collaborator | none (effect picks it up from the bus) |
//! | `...Success` | effect | carries the payload |
//! | `...Failure` | effect | carries the user-facing message |

pub mod auth;
pub mod project_list;
pub mod projects;
pub mod tasks;
pub mod time_tracking;

pub use auth::AuthCommand;
pub use project_list::{PaginationPatch, ProjectListCommand, ProjectListFiltersPatch, ProjectPage};
pub use projects::ProjectsCommand;
pub use tasks::{TaskFiltersPatch, TasksCommand};
pub use time_tracking::TimeTrackingCommand;

use shared_bus::BusMessage;
use shared_types::Domain;

/// Any command the store accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Auth(AuthCommand),
    Projects(ProjectsCommand),
    ProjectList(ProjectListCommand),
    Tasks(TasksCommand),
    TimeTracking(TimeTrackingCommand),
}

impl BusMessage for Command {
    fn topic(&self) -> Domain {
        match self {
            Command::Auth(_) => Domain::Auth,
            Command::Projects(_) => Domain::Projects,
            Command::ProjectList(_) => Domain::ProjectList,
            Command::Tasks(_) => Domain::Tasks,
            Command::TimeTracking(_) => Domain::TimeTracking,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Command::Auth(c) => c.name(),
            Command::Projects(c) => c.name(),
            Command::ProjectList(c) => c.name(),
            Command::Tasks(c) => c.name(),
            Command::TimeTracking(c) => c.name(),
        }
    }
}

macro_rules! impl_from_command {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Command {
                fn from(command: $ty) -> Self {
                    Command::$variant(command)
                }
            }
        )*
    };
}

impl_from_command!(
    Auth(AuthCommand),
    Projects(ProjectsCommand),
    ProjectList(ProjectListCommand),
    Tasks(TasksCommand),
    TimeTracking(TimeTrackingCommand),
);
