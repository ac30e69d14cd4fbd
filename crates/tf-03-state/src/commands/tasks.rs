use crate::domain::criteria::{FilterValue, TaskSort};
use shared_types::{CreateTaskRequest, EntityId, Priority, Task, TaskStatus, UpdateTaskRequest};

/// Partial filter update; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFiltersPatch {
    pub status: Option<FilterValue<TaskStatus>>,
    pub priority: Option<FilterValue<Priority>>,
    pub assignee: Option<FilterValue<EntityId>>,
    pub project: Option<FilterValue<EntityId>>,
    pub query: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TasksCommand {
    Load,
    LoadSuccess(Vec<Task>),
    LoadFailure(String),

    Create(CreateTaskRequest),
    CreateSuccess(Task),
    CreateFailure(String),

    Update { id: EntityId, changes: UpdateTaskRequest },
    UpdateSuccess(Task),
    UpdateFailure(String),

    Delete(EntityId),
    DeleteSuccess(EntityId),
    DeleteFailure(String),

    /// Move the card at `from` to `to` within one kanban column.
    ReorderColumn { status: TaskStatus, from: usize, to: usize },
    ReorderSuccess(Vec<Task>),
    ReorderFailure(String),

    /// Drop a card into another kanban column.
    MoveToStatus { id: EntityId, status: TaskStatus },
    ChangeStatus { id: EntityId, status: TaskStatus },
    ChangePriority { id: EntityId, priority: Priority },

    UpdateFilters(TaskFiltersPatch),
    ClearFilters,
    UpdateSort(TaskSort),
    ClearError,
}

impl TasksCommand {
    pub fn name(&self) -> &'static str {
        match self {
            TasksCommand::Load => "load",
            TasksCommand::LoadSuccess(_) => "load-success",
            TasksCommand::LoadFailure(_) => "load-failure",
            TasksCommand::Create(_) => "create",
            TasksCommand::CreateSuccess(_) => "create-success",
            TasksCommand::CreateFailure(_) => "create-failure",
            TasksCommand::Update { .. } => "update",
            TasksCommand::UpdateSuccess(_) => "update-success",
            TasksCommand::UpdateFailure(_) => "update-failure",
            TasksCommand::Delete(_) => "delete",
            TasksCommand::DeleteSuccess(_) => "delete-success",
            TasksCommand::DeleteFailure(_) => "delete-failure",
            TasksCommand::ReorderColumn { .. } => "reorder-column",
            TasksCommand::ReorderSuccess(_) => "reorder-success",
            TasksCommand::ReorderFailure(_) => "reorder-failure",
            TasksCommand::MoveToStatus { .. } => "move-to-status",
            TasksCommand::ChangeStatus { .. } => "change-status",
            TasksCommand::ChangePriority { .. } => "change-priority",
            TasksCommand::UpdateFilters(_) => "update-filters",
            TasksCommand::ClearFilters => "clear-filters",
            TasksCommand::UpdateSort(_) => "update-sort",
            TasksCommand::ClearError => "clear-error",
        }
    }
}
