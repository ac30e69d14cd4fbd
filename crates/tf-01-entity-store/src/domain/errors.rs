//! Store consistency errors.

use shared_types::EntityId;
use thiserror::Error;

/// A violated id/order invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `ids` lists an id with no entity behind it.
    #[error("Dangling id in order list: {0}")]
    DanglingId(EntityId),

    /// An entity is missing from the order list.
    #[error("Entity not present in order list: {0}")]
    OrphanEntity(EntityId),

    /// The same id appears twice in the order list.
    #[error("Duplicate id in order list: {0}")]
    DuplicateId(EntityId),

    /// An entity is stored under a key that is not its own id.
    #[error("Entity stored under key {key} reports id {id}")]
    KeyMismatch { key: EntityId, id: EntityId },
}
