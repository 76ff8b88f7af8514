// HealthPanel Domain
// This crate contains the record pipeline for the HealthPanel application

// Services that implement business logic
pub mod services;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Re-export the document loader from health_panel_data for convenience
pub use health_panel_data::pdf;

// Testing utilities - only available in tests or with the mock feature
#[cfg(any(test, feature = "mock"))]
pub mod testing;
