//! # Entity State
//!
//! The normalized half of every domain slice.

use crate::domain::errors::StoreError;
use shared_types::{Entity, EntityId};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Id-keyed entities plus their display order.
///
/// Every operation consumes the state and returns the next one, leaving any
/// other clone untouched.
pub struct EntityState<E: Entity> {
    entities: Arc<HashMap<EntityId, Arc<E>>>,
    ids: Arc<Vec<EntityId>>,
}

impl<E: Entity> Clone for EntityState<E> {
    fn clone(&self) -> Self {
        Self {
            entities: Arc::clone(&self.entities),
            ids: Arc::clone(&self.ids),
        }
    }
}

impl<E: Entity> Default for EntityState<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity + fmt::Debug> fmt::Debug for EntityState<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<E: Entity + PartialEq> PartialEq for EntityState<E> {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids
            && self
                .ids
                .iter()
                .all(|id| self.entities.get(id) == other.entities.get(id))
    }
}

impl<E: Entity> EntityState<E> {
    /// Empty state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: Arc::new(HashMap::new()),
            ids: Arc::new(Vec::new()),
        }
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Replace everything. Order follows the input; a repeated id keeps its
    /// first position and its last value.
    #[must_use]
    pub fn set_all(self, entities: impl IntoIterator<Item = E>) -> Self {
        let mut map = HashMap::new();
        let mut ids = Vec::new();
        for entity in entities {
            let id = entity.id().to_string();
            if map.insert(id.clone(), Arc::new(entity)).is_none() {
                ids.push(id);
            }
        }
        trace!(count = ids.len(), "set_all");
        Self {
            entities: Arc::new(map),
            ids: Arc::new(ids),
        }
    }

    /// Append when new, replace in place when present.
    #[must_use]
    pub fn add_one(self, entity: E) -> Self {
        self.upsert_one(entity)
    }

    /// Append each new entity, replace each existing one in place.
    #[must_use]
    pub fn add_many(self, entities: impl IntoIterator<Item = E>) -> Self {
        self.upsert_many(entities)
    }

    /// Append when new, replace in place when present. Applying the same
    /// entity twice is the same as applying it once.
    #[must_use]
    pub fn upsert_one(mut self, entity: E) -> Self {
        let id = entity.id().to_string();
        let is_new = !self.entities.contains_key(&id);
        Arc::make_mut(&mut self.entities).insert(id.clone(), Arc::new(entity));
        if is_new {
            Arc::make_mut(&mut self.ids).push(id);
        }
        self
    }

    #[must_use]
    pub fn upsert_many(self, entities: impl IntoIterator<Item = E>) -> Self {
        entities
            .into_iter()
            .fold(self, |state, entity| state.upsert_one(entity))
    }

    /// Insert at the front when new, replace in place when present.
    #[must_use]
    pub fn prepend_one(mut self, entity: E) -> Self {
        let id = entity.id().to_string();
        let is_new = !self.entities.contains_key(&id);
        Arc::make_mut(&mut self.entities).insert(id.clone(), Arc::new(entity));
        if is_new {
            Arc::make_mut(&mut self.ids).insert(0, id);
        }
        self
    }

    /// Replace an entity that is already present. Unknown ids are ignored.
    #[must_use]
    pub fn replace_one(self, entity: E) -> Self {
        if self.entities.contains_key(entity.id()) {
            self.upsert_one(entity)
        } else {
            self
        }
    }

    /// Remove by id. Absent ids are ignored and leave the state shared.
    #[must_use]
    pub fn remove_one(mut self, id: &str) -> Self {
        if !self.entities.contains_key(id) {
            return self;
        }
        Arc::make_mut(&mut self.entities).remove(id);
        Arc::make_mut(&mut self.ids).retain(|existing| existing != id);
        self
    }

    #[must_use]
    pub fn remove_all(self) -> Self {
        Self::new()
    }

    /// Reorder the id list. Ids not present are dropped; present ids missing
    /// from `order` keep their relative order after the listed ones.
    #[must_use]
    pub fn reorder(mut self, order: &[EntityId]) -> Self {
        let mut seen = HashSet::new();
        let mut next: Vec<EntityId> = order
            .iter()
            .filter(|id| self.entities.contains_key(*id) && seen.insert((*id).clone()))
            .cloned()
            .collect();
        next.extend(self.ids.iter().filter(|id| !seen.contains(*id)).cloned());
        self.ids = Arc::new(next);
        self
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Entities in order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<E>> + '_ {
        self.ids.iter().filter_map(|id| self.entities.get(id))
    }

    /// Owned snapshot of all entities in order.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<E>> {
        self.iter().cloned().collect()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<E>> {
        self.entities.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    #[must_use]
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `other` shares both halves with `self`. Used as the cheap
    /// "unchanged" test by memoized views.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entities, &other.entities) && Arc::ptr_eq(&self.ids, &other.ids)
    }

    /// Verify the id/order invariants.
    pub fn check_consistency(&self) -> Result<(), StoreError> {
        let mut seen = HashSet::with_capacity(self.ids.len());
        for id in self.ids.iter() {
            if !seen.insert(id) {
                return Err(StoreError::DuplicateId(id.clone()));
            }
            if !self.entities.contains_key(id) {
                return Err(StoreError::DanglingId(id.clone()));
            }
        }
        for (key, entity) in self.entities.iter() {
            if !seen.contains(key) {
                return Err(StoreError::OrphanEntity(key.clone()));
            }
            if entity.id() != key {
                return Err(StoreError::KeyMismatch {
                    key: key.clone(),
                    id: entity.id().to_string(),
                });
            }
        }
        Ok(())
    }
}
