pub mod outbound;

pub use outbound::{
    AuthApi, ProjectSelection, ProjectsApi, ReorderTasksRequest, TasksApi, TimeEntriesApi,
};
