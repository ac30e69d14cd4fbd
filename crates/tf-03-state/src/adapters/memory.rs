use crate::domain::errors::SessionError;
use crate::ports::outbound::{SessionStorage, StorageKey};
use parking_lot::Mutex;
use std::collections::HashMap;

/// In-memory session storage.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    values: Mutex<HashMap<StorageKey, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: StorageKey) -> Result<Option<String>, SessionError> {
        Ok(self.values.lock().get(&key).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), SessionError> {
        self.values.lock().insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), SessionError> {
        self.values.lock().remove(&key);
        Ok(())
    }
}
