//! Pure pieces of the pipeline: configuration, phase bookkeeping,
//! request generations, kanban planning and outcome wording.

pub mod config;
pub mod generation;
pub mod kanban;
pub mod notices;
pub mod phase;

pub use config::{ConfigError, EffectsConfig, StaleResponsePolicy};
pub use generation::{GenerationCounter, Ticket};
pub use kanban::{plan_reorder, ReorderError};
pub use notices::{
    failure_message, NotifyOn, ERROR_TITLE, INSTRUCTIONS_SENT, NO_REFRESH_TOKEN, PASSWORD_CHANGED,
    REGISTERED, SIGNED_IN, SUCCESS_TITLE,
};
pub use phase::{EffectFamily, EffectPhase, PhaseTracker};
