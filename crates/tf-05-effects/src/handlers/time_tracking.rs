//! Time-entry effects. The session timer is local state and has none.

use super::{run_handler, EffectContext, EffectHandler};
use crate::domain::EffectFamily;
use crate::ports::TimeEntriesApi;
use async_trait::async_trait;
use shared_bus::{CommandFilter, Subscription};
use shared_types::Domain;
use std::sync::Arc;
use tf_03_state::{Command, TimeTrackingCommand};

const LOAD: EffectFamily = EffectFamily::new(Domain::TimeTracking, "load");

pub struct TimeTrackingEffects {
    ctx: EffectContext,
    api: Arc<dyn TimeEntriesApi>,
}

impl TimeTrackingEffects {
    pub fn new(ctx: EffectContext, api: Arc<dyn TimeEntriesApi>) -> Self {
        Self { ctx, api }
    }

    pub async fn run(self: Arc<Self>, subscription: Subscription<Command>) {
        run_handler(self, subscription).await;
    }
}

#[async_trait]
impl EffectHandler for TimeTrackingEffects {
    fn name(&self) -> &'static str {
        "time-tracking"
    }

    fn filter(&self) -> CommandFilter {
        CommandFilter {
            topics: vec![Domain::TimeTracking],
            names: vec!["load", "create", "update", "delete"],
        }
    }

    async fn handle(&self, command: Command) {
        let Command::TimeTracking(time_command) = &command else {
            return;
        };
        match time_command {
            TimeTrackingCommand::Load { task_id } => {
                let (family, ticket) = self.ctx.begin_superseding(&command, LOAD);
                let result = self.api.list(task_id.as_ref()).await;
                self.ctx.settle_latest(
                    family,
                    ticket,
                    result,
                    "Failed to load time entries",
                    TimeTrackingCommand::LoadSuccess,
                    TimeTrackingCommand::LoadFailure,
                );
            }
            TimeTrackingCommand::Create(request) => {
                let family = self.ctx.begin(&command);
                let result = self.api.create(request).await;
                self.ctx.settle(
                    family,
                    result,
                    "Failed to create time entry",
                    TimeTrackingCommand::CreateSuccess,
                    TimeTrackingCommand::CreateFailure,
                );
            }
            TimeTrackingCommand::Update { id, changes } => {
                let family = self.ctx.begin(&command);
                let result = self.api.update(id, changes).await;
                self.ctx.settle(
                    family,
                    result,
                    "Failed to update time entry",
                    TimeTrackingCommand::UpdateSuccess,
                    TimeTrackingCommand::UpdateFailure,
                );
            }
            TimeTrackingCommand::Delete(id) => {
                let family = self.ctx.begin(&command);
                let result = self.api.delete(id).await.map(|()| id.clone());
                self.ctx.settle(
                    family,
                    result,
                    "Failed to delete time entry",
                    TimeTrackingCommand::DeleteSuccess,
                    TimeTrackingCommand::DeleteFailure,
                );
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryBackend;
    use crate::handlers::test_support::Harness;
    use chrono::Utc;
    use shared_types::{CreateTimeEntryRequest, TimeEntry};

    async fn run(h: &Harness, command: impl Into<Command>) {
        let command: Command = command.into();
        h.store.dispatch(command.clone());
        TimeTrackingEffects::new(h.context.clone(), h.backend.clone())
            .handle(command)
            .await;
    }

    #[tokio::test]
    async fn test_load_by_task() {
        let now = Utc::now();
        let h = Harness::new(InMemoryBackend::new().with_entries([
            TimeEntry::new("t1", "u1", now, 30),
            TimeEntry::new("t2", "u1", now, 45),
        ]));
        run(
            &h,
            TimeTrackingCommand::Load {
                task_id: Some("t1".into()),
            },
        )
        .await;

        let state = h.store.state();
        assert_eq!(state.time_tracking.entities.len(), 1);
        assert!(state.time_tracking.entities.iter().all(|e| e.task_id == "t1"));
    }

    #[tokio::test]
    async fn test_create_adds_entry() {
        let h = Harness::new(InMemoryBackend::new());
        run(
            &h,
            TimeTrackingCommand::Create(CreateTimeEntryRequest {
                task_id: "t1".into(),
                project_id: None,
                start_time: Utc::now(),
                end_time: None,
                duration: 25,
                description: Some("review".into()),
                billable: true,
            }),
        )
        .await;

        let state = h.store.state();
        assert_eq!(state.time_tracking.entities.len(), 1);
        assert_eq!(h.backend.entries().len(), 1);
        assert!(!state.time_tracking.loading);
    }

    #[tokio::test]
    async fn test_timer_commands_have_no_effect() {
        let h = Harness::new(InMemoryBackend::new());
        run(
            &h,
            TimeTrackingCommand::StartTimer {
                task_id: "t1".into(),
                started_at: Utc::now(),
            },
        )
        .await;
        assert!(h.backend.calls().is_empty());
        assert!(h.context.phases().is_quiet());
    }
}
