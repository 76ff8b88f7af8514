// Public entities for the HealthPanel API
// This module contains data structures that are shared across the application boundary

// Common entities for error handling
pub mod common;

// Session and upload entities
pub mod records;
