use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::errors::RepositoryError;

/// In-memory storage keyed by session id.
///
/// Clones share the same underlying map. Nothing survives a process restart.
#[derive(Debug)]
pub struct InMemoryStorage<T> {
    entries: Arc<Mutex<HashMap<Uuid, T>>>,
}

impl<T> Clone for InMemoryStorage<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<T> Default for InMemoryStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> InMemoryStorage<T> {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store a value, replacing any previous value under the same id
    pub async fn store(&self, id: Uuid, value: T) -> Result<(), RepositoryError> {
        let mut store = self.entries.lock()?;
        store.insert(id, value);
        Ok(())
    }

    /// Remove a value, returning it if it was present
    pub async fn remove(&self, id: &Uuid) -> Result<Option<T>, RepositoryError> {
        let mut store = self.entries.lock()?;
        Ok(store.remove(id))
    }

    /// Number of stored values
    pub async fn len(&self) -> Result<usize, RepositoryError> {
        let store = self.entries.lock()?;
        Ok(store.len())
    }
}

impl<T: Clone> InMemoryStorage<T> {
    /// Get a value by id
    pub async fn get(&self, id: &Uuid) -> Result<Option<T>, RepositoryError> {
        let store = self.entries.lock()?;
        Ok(store.get(id).cloned())
    }
}
