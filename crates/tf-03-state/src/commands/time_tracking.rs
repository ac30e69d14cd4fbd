use chrono::{DateTime, Utc};
use shared_types::{CreateTimeEntryRequest, EntityId, TimeEntry, UpdateTimeEntryRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum TimeTrackingCommand {
    /// Load entries, optionally only those of one task.
    Load { task_id: Option<EntityId> },
    LoadSuccess(Vec<TimeEntry>),
    LoadFailure(String),

    Create(CreateTimeEntryRequest),
    CreateSuccess(TimeEntry),
    CreateFailure(String),

    Update { id: EntityId, changes: UpdateTimeEntryRequest },
    UpdateSuccess(TimeEntry),
    UpdateFailure(String),

    Delete(EntityId),
    DeleteSuccess(EntityId),
    DeleteFailure(String),

    /// Start the session timer. The caller supplies the clock reading so
    /// that the transition stays pure.
    StartTimer { task_id: EntityId, started_at: DateTime<Utc> },
    StopTimer,
    ClearError,
}

impl TimeTrackingCommand {
    pub fn name(&self) -> &'static str {
        match self {
            TimeTrackingCommand::Load { .. } => "load",
            TimeTrackingCommand::LoadSuccess(_) => "load-success",
            TimeTrackingCommand::LoadFailure(_) => "load-failure",
            TimeTrackingCommand::Create(_) => "create",
            TimeTrackingCommand::CreateSuccess(_) => "create-success",
            TimeTrackingCommand::CreateFailure(_) => "create-failure",
            TimeTrackingCommand::Update { .. } => "update",
            TimeTrackingCommand::UpdateSuccess(_) => "update-success",
            TimeTrackingCommand::UpdateFailure(_) => "update-failure",
            TimeTrackingCommand::Delete(_) => "delete",
            TimeTrackingCommand::DeleteSuccess(_) => "delete-success",
            TimeTrackingCommand::DeleteFailure(_) => "delete-failure",
            TimeTrackingCommand::StartTimer { .. } => "start-timer",
            TimeTrackingCommand::StopTimer => "stop-timer",
            TimeTrackingCommand::ClearError => "clear-error",
        }
    }
}
