use crate::domain::errors::SessionError;
use crate::ports::outbound::{SessionStorage, StorageKey};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Session storage persisted as a flat JSON object on disk.
///
/// The whole map is rewritten on every change through a temp file and a
/// rename, so a crash never leaves a half-written session behind.
pub struct FileSessionStorage {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileSessionStorage {
    /// Open the file at `path`, or start empty if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no session file yet");
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), keys = values.len(), "session file opened");
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(values)?;
        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, bytes)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl SessionStorage for FileSessionStorage {
    fn get(&self, key: StorageKey) -> Result<Option<String>, SessionError> {
        Ok(self.values.lock().get(key.as_str()).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> Result<(), SessionError> {
        let mut values = self.values.lock();
        values.insert(key.as_str().to_string(), value.to_string());
        self.flush(&values)
    }

    fn remove(&self, key: StorageKey) -> Result<(), SessionError> {
        let mut values = self.values.lock();
        if values.remove(key.as_str()).is_some() {
            self.flush(&values)?;
        }
        Ok(())
    }
}
