use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{delete, get, post},
    Extension, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::debug;

use crate::api::handlers::{health, records};
use crate::api::handlers::records::RecordService;
use crate::config::AppConfig;
use crate::openapi::configure_swagger_routes;

/// Create the application router around a record service
pub fn create_app(record_service: RecordService, config: &AppConfig) -> Router {
    debug!("Creating application router");

    let health_service = health::create_health_service(record_service.clone());

    // Session routes; uploads are bounded by the configured body limit
    let api_routes = Router::new()
        .route("/sessions", post(records::create_session))
        .route("/sessions/:id", delete(records::end_session))
        .route("/sessions/:id/uploads", post(records::upload_files))
        .route("/sessions/:id/dashboard", get(records::get_dashboard))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes));

    debug!("API routes configured");

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(health_service))
        .layer(Extension(Arc::new(config.clone())));

    debug!("Public routes configured");

    let app = Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .with_state(record_service);

    debug!("API routes nested");

    let app = add_swagger_ui(app);
    let app = configure_security(app);
    debug!("Security configuration applied");

    health::initialize_server_start_time();
    debug!("Health check service initialized");

    app
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}

/// Apply CORS, security headers and request tracing
pub fn configure_security(app: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    app.layer(security_headers)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
