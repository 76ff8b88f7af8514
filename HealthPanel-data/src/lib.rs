// HealthPanel Data
// This crate handles document access and in-memory session storage

// PDF text engine adapter and document loader
pub mod pdf;

// Repository implementations for session storage
pub mod repository;
