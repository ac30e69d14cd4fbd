//! Task effects, including the kanban board.
//!
//! Reordering within a column renumbers the whole column and sends one bulk
//! reorder. Dropping a card into another column patches only its status.

use super::{run_handler, EffectContext, EffectHandler};
use crate::domain::{plan_reorder, EffectFamily};
use crate::ports::{ReorderTasksRequest, TasksApi};
use async_trait::async_trait;
use shared_bus::{CommandFilter, Subscription};
use shared_types::{ApiError, Domain, EntityId, TaskStatus, UpdateTaskRequest};
use std::sync::Arc;
use tf_03_state::{Command, TasksCommand};
use tf_04_derived_views::views::tasks::tasks_in_column;

const LOAD: EffectFamily = EffectFamily::new(Domain::Tasks, "load");

pub struct TaskEffects {
    ctx: EffectContext,
    api: Arc<dyn TasksApi>,
}

impl TaskEffects {
    pub fn new(ctx: EffectContext, api: Arc<dyn TasksApi>) -> Self {
        Self { ctx, api }
    }

    pub async fn run(self: Arc<Self>, subscription: Subscription<Command>) {
        run_handler(self, subscription).await;
    }

    async fn reorder(&self, family: EffectFamily, status: TaskStatus, from: usize, to: usize) {
        let column = self
            .ctx
            .store()
            .select(|state| tasks_in_column(&state.tasks.entities, status));
        let result = match plan_reorder(&column, from, to) {
            Ok(tasks) => self.api.reorder(&ReorderTasksRequest { tasks }).await,
            Err(e) => Err(ApiError::new(e.to_string(), 400, "invalid reorder", "/tasks/reorder")),
        };
        self.ctx.settle(
            family,
            result,
            "Failed to reorder tasks",
            TasksCommand::ReorderSuccess,
            TasksCommand::ReorderFailure,
        );
    }

    async fn patch(&self, family: EffectFamily, id: &EntityId, changes: UpdateTaskRequest) {
        let result = self.api.patch(id, &changes).await;
        self.ctx.settle(
            family,
            result,
            "Failed to update task",
            TasksCommand::UpdateSuccess,
            TasksCommand::UpdateFailure,
        );
    }
}

#[async_trait]
impl EffectHandler for TaskEffects {
    fn name(&self) -> &'static str {
        "tasks"
    }

    fn filter(&self) -> CommandFilter {
        CommandFilter {
            topics: vec![Domain::Tasks],
            names: vec![
                "load",
                "create",
                "update",
                "delete",
                "reorder-column",
                "move-to-status",
                "change-status",
                "change-priority",
            ],
        }
    }

    async fn handle(&self, command: Command) {
        let Command::Tasks(task_command) = &command else {
            return;
        };
        match task_command {
            TasksCommand::Load => {
                let (family, ticket) = self.ctx.begin_superseding(&command, LOAD);
                let result = self.api.list().await;
                self.ctx.settle_latest(
                    family,
                    ticket,
                    result,
                    "Failed to load tasks",
                    TasksCommand::LoadSuccess,
                    TasksCommand::LoadFailure,
                );
            }
            TasksCommand::Create(request) => {
                let family = self.ctx.begin(&command);
                let result = self.api.create(request).await;
                self.ctx.settle(
                    family,
                    result,
                    "Failed to create task",
                    TasksCommand::CreateSuccess,
                    TasksCommand::CreateFailure,
                );
            }
            TasksCommand::Update { id, changes } => {
                let family = self.ctx.begin(&command);
                let result = self.api.update(id, changes).await;
                self.ctx.settle(
                    family,
                    result,
                    "Failed to update task",
                    TasksCommand::UpdateSuccess,
                    TasksCommand::UpdateFailure,
                );
            }
            TasksCommand::Delete(id) => {
                let family = self.ctx.begin(&command);
                let result = self.api.delete(id).await.map(|()| id.clone());
                self.ctx.settle(
                    family,
                    result,
                    "Failed to delete task",
                    TasksCommand::DeleteSuccess,
                    TasksCommand::DeleteFailure,
                );
            }
            TasksCommand::ReorderColumn { status, from, to } => {
                let family = self.ctx.begin(&command);
                self.reorder(family, *status, *from, *to).await;
            }
            TasksCommand::MoveToStatus { id, status } | TasksCommand::ChangeStatus { id, status } => {
                let family = self.ctx.begin(&command);
                let changes = UpdateTaskRequest {
                    status: Some(*status),
                    ..Default::default()
                };
                self.patch(family, id, changes).await;
            }
            TasksCommand::ChangePriority { id, priority } => {
                let family = self.ctx.begin(&command);
                let changes = UpdateTaskRequest {
                    priority: Some(*priority),
                    ..Default::default()
                };
                self.patch(family, id, changes).await;
            }
            _ => {}
        }
    }
}
