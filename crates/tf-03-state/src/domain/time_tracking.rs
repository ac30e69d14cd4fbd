//! Time-tracking slice: recorded entries plus the single session timer.

use crate::commands::TimeTrackingCommand;
use chrono::{DateTime, Utc};
use shared_types::{EntityId, TimeEntry};
use tf_01_entity_store::EntityState;

/// Running session timer. At most one exists at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTimer {
    pub task_id: EntityId,
    pub started_at: DateTime<Utc>,
}

impl ActiveTimer {
    /// Whole minutes elapsed at `now`. Clock skew reads as zero.
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> u32 {
        let minutes = (now - self.started_at).num_minutes().max(0);
        u32::try_from(minutes).unwrap_or(u32::MAX)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeTrackingState {
    pub entities: EntityState<TimeEntry>,
    pub loading: bool,
    pub error: Option<String>,
    pub active_timer: Option<ActiveTimer>,
}

impl TimeTrackingState {
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

    fn settled(self, entities: EntityState<TimeEntry>) -> Self {
        Self {
            entities,
            loading: false,
            error: None,
            ..self
        }
    }
}

pub fn reduce(state: TimeTrackingState, command: &TimeTrackingCommand) -> TimeTrackingState {
    match command {
        TimeTrackingCommand::Load { .. }
        | TimeTrackingCommand::Create(_)
        | TimeTrackingCommand::Update { .. }
        | TimeTrackingCommand::Delete(_) => state.pending(),

        TimeTrackingCommand::LoadSuccess(entries) => {
            let entities = state.entities.clone().set_all(entries.iter().cloned());
            state.settled(entities)
        }
        TimeTrackingCommand::CreateSuccess(entry) => {
            let entities = state.entities.clone().add_one(entry.clone());
            state.settled(entities)
        }
        TimeTrackingCommand::UpdateSuccess(entry) => {
            let entities = state.entities.clone().upsert_one(entry.clone());
            state.settled(entities)
        }
        TimeTrackingCommand::DeleteSuccess(id) => {
            let entities = state.entities.clone().remove_one(id);
            state.settled(entities)
        }

        TimeTrackingCommand::LoadFailure(error)
        | TimeTrackingCommand::CreateFailure(error)
        | TimeTrackingCommand::UpdateFailure(error)
        | TimeTrackingCommand::DeleteFailure(error) => state.failed(error),

        TimeTrackingCommand::StartTimer {
            task_id,
            started_at,
        } => TimeTrackingState {
            active_timer: Some(ActiveTimer {
                task_id: task_id.clone(),
                started_at: *started_at,
            }),
            ..state
        },
        TimeTrackingCommand::StopTimer => TimeTrackingState {
            active_timer: None,
            ..state
        },
        TimeTrackingCommand::ClearError => TimeTrackingState {
            error: None,
            ..state
        },
    }
}
