pub mod health;
pub mod records;

// Tests module
#[cfg(test)]
mod tests;

// Re-export handlers for easier imports
pub use health::health_check;
pub use records::{create_session, end_session, get_dashboard, upload_files};
