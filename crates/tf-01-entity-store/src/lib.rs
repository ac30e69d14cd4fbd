//! # Normalized Entity Store
//!
//! Per-domain mapping of id → entity plus an ordered id list.
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | `ids` holds no duplicates | every insert checks membership first |
//! | every id in `ids` has an entity | insert and remove touch both sides |
//! | every entity has an id in `ids` | same |
//!
//! `EntityState::check_consistency` verifies all three and is exercised by
//! the property tests.
//!
//! ## Structural Sharing
//!
//! Both halves live behind `Arc` and are copied on write. Cloning a slice is
//! O(1); a transition only pays for a copy when an older snapshot is still
//! held by a subscriber. Unchanged halves keep their pointer, which is what
//! the derived-view memoization compares.
//!
//! ```text
//! snapshot N   ──┐
//!                ├──→ Arc<HashMap<id, Arc<E>>>   (shared until written)
//! snapshot N+1 ──┘
//! ```

pub mod domain;

pub use domain::entity_state::EntityState;
pub use domain::errors::StoreError;
