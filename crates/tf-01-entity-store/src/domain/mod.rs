//! Domain layer of the entity store.

pub mod entity_state;
pub mod errors;
