// HealthPanel-api lib.rs
//
// HTTP surface of the HealthPanel record pipeline.

// Public modules
pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;

pub use api::create_application;
pub use config::AppConfig;
