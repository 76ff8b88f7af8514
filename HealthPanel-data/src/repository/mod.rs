// Repository module structure
pub mod errors;
mod in_memory;
mod session;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use in_memory::InMemoryStorage;
pub use session::{SessionRepository, SessionRepositoryTrait};
