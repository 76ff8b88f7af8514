use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;

/// Repository trait for per-session state
#[async_trait]
pub trait SessionRepositoryTrait<T>: Send + Sync {
    /// Store a new session and return its id
    async fn create(&self, value: T) -> Result<Uuid, RepositoryError>;

    /// Get a session by id
    async fn get(&self, id: Uuid) -> Result<Option<T>, RepositoryError>;

    /// Remove a session; fails with `NotFound` for unknown ids
    async fn remove(&self, id: Uuid) -> Result<(), RepositoryError>;

    /// Number of live sessions
    async fn count(&self) -> Result<usize, RepositoryError>;
}

/// Session repository.
///
/// Sessions live only in memory, for the lifetime of the process.
#[derive(Debug)]
pub struct SessionRepository<T> {
    storage: InMemoryStorage<T>,
}

impl<T> Clone for SessionRepository<T> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
        }
    }
}

impl<T> Default for SessionRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SessionRepository<T> {
    /// Create a new repository
    pub fn new() -> Self {
        Self {
            storage: InMemoryStorage::new(),
        }
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> SessionRepositoryTrait<T> for SessionRepository<T> {
    async fn create(&self, value: T) -> Result<Uuid, RepositoryError> {
        let id = Uuid::new_v4();
        debug!("Storing session {}", id);
        self.storage.store(id, value).await?;
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<T>, RepositoryError> {
        self.storage.get(&id).await
    }

    async fn remove(&self, id: Uuid) -> Result<(), RepositoryError> {
        match self.storage.remove(&id).await? {
            Some(_) => {
                debug!("Removed session {}", id);
                Ok(())
            }
            None => Err(RepositoryError::NotFound(id.to_string())),
        }
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        self.storage.len().await
    }
}
