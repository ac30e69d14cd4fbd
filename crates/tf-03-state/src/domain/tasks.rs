//! Tasks slice.

use crate::commands::{TaskFiltersPatch, TasksCommand};
use crate::domain::criteria::{FilterValue, TaskSort};
use shared_types::{EntityId, Priority, Task, TaskStatus};
use tf_01_entity_store::EntityState;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TaskFilters {
    pub status: FilterValue<TaskStatus>,
    pub priority: FilterValue<Priority>,
    pub assignee: FilterValue<EntityId>,
    pub project: FilterValue<EntityId>,
    /// Case-insensitive substring over title and description.
    pub query: String,
}

impl TaskFilters {
    fn merge(&self, patch: &TaskFiltersPatch) -> Self {
        Self {
            status: patch.status.clone().unwrap_or_else(|| self.status.clone()),
            priority: patch.priority.clone().unwrap_or_else(|| self.priority.clone()),
            assignee: patch.assignee.clone().unwrap_or_else(|| self.assignee.clone()),
            project: patch.project.clone().unwrap_or_else(|| self.project.clone()),
            query: patch.query.clone().unwrap_or_else(|| self.query.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TasksState {
    pub entities: EntityState<Task>,
    pub loading: bool,
    pub error: Option<String>,
    pub filters: TaskFilters,
    pub sort_by: TaskSort,
}

impl TasksState {
    fn pending(self) -> Self {
        Self {
            loading: true,
            error: None,
            ..self
        }
    }

    fn failed(self, error: &str) -> Self {
        Self {
            loading: false,
            error: Some(error.to_string()),
            ..self
        }
    }

    fn settled(self, entities: EntityState<Task>) -> Self {
        Self {
            entities,
            loading: false,
            error: None,
            ..self
        }
    }
}

pub fn reduce(state: TasksState, command: &TasksCommand) -> TasksState {
    match command {
        TasksCommand::Load
        | TasksCommand::Create(_)
        | TasksCommand::Update { .. }
        | TasksCommand::Delete(_)
        | TasksCommand::ReorderColumn { .. }
        | TasksCommand::MoveToStatus { .. }
        | TasksCommand::ChangeStatus { .. }
        | TasksCommand::ChangePriority { .. } => state.pending(),

        TasksCommand::LoadSuccess(tasks) => {
            let entities = state.entities.clone().set_all(tasks.iter().cloned());
            state.settled(entities)
        }
        TasksCommand::CreateSuccess(task) => {
            let entities = state.entities.clone().add_one(task.clone());
            state.settled(entities)
        }
        TasksCommand::UpdateSuccess(task) => {
            let entities = state.entities.clone().upsert_one(task.clone());
            state.settled(entities)
        }
        TasksCommand::ReorderSuccess(tasks) => {
            let entities = state.entities.clone().upsert_many(tasks.iter().cloned());
            state.settled(entities)
        }
        TasksCommand::DeleteSuccess(id) => {
            let entities = state.entities.clone().remove_one(id);
            state.settled(entities)
        }

        TasksCommand::LoadFailure(error)
        | TasksCommand::CreateFailure(error)
        | TasksCommand::UpdateFailure(error)
        | TasksCommand::DeleteFailure(error)
        | TasksCommand::ReorderFailure(error) => state.failed(error),

        TasksCommand::UpdateFilters(patch) => TasksState {
            filters: state.filters.merge(patch),
            ..state
        },
        TasksCommand::ClearFilters => TasksState {
            filters: TaskFilters::default(),
            ..state
        },
        TasksCommand::UpdateSort(sort) => TasksState {
            sort_by: *sort,
            ..state
        },
        TasksCommand::ClearError => TasksState {
            error: None,
            ..state
        },
    }
}
