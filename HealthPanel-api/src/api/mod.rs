pub mod handlers;
pub mod routes;

use axum::Router;

use crate::config::AppConfig;

pub use routes::create_app;

/// Create the application router with the default record service
pub fn create_application(config: &AppConfig) -> Router {
    let record_service = handlers::records::create_service(config);
    routes::create_app(record_service, config)
}
