use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::api::handlers::health::health_check,

        // Session endpoints
        crate::api::handlers::records::create_session,
        crate::api::handlers::records::upload_files,
        crate::api::handlers::records::get_dashboard,
        crate::api::handlers::records::end_session
    ),
    components(
        schemas(
            // Entities
            crate::entities::common::ErrorResponse,
            crate::entities::records::SessionCreatedResponse,
            crate::entities::records::UploadQuery,
            crate::entities::records::UploadForm,

            // Health handlers
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,

            // Upload report
            health_panel_domain::services::UploadOutcome,
            health_panel_domain::services::pipeline::BatchReport,
            health_panel_domain::services::pipeline::FileOutcome,
            health_panel_domain::services::pipeline::FileStatus,
            health_panel_domain::entities::UploadSource,
            health_panel_domain::entities::Notice,
            health_panel_domain::entities::NoticeKind,
            health_panel_domain::entities::FileListing,
            health_panel_domain::entities::VitalKind,
            health_panel_domain::entities::Provenance,

            // Dashboard
            health_panel_domain::entities::DashboardView,
            health_panel_domain::entities::dashboard::VitalCard,
            health_panel_domain::entities::dashboard::SummaryItem,
            health_panel_domain::entities::dashboard::TestResultItem,
            health_panel_domain::entities::dashboard::RiskItem,
            health_panel_domain::entities::dashboard::MedicationItem,
            health_panel_domain::entities::dashboard::InsightItem,
            health_panel_domain::entities::dashboard::Recommendations,
            health_panel_domain::entities::dashboard::ChartOptions,
            health_panel_domain::entities::ClassificationEntry,
            health_panel_domain::entities::ChartSpec,
            health_panel_domain::entities::ChartKind,
            health_panel_domain::entities::ChartDataset,
            health_panel_domain::entities::ChartAxis
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "sessions", description = "Record upload sessions and their dashboards")
    ),
    info(
        title = "HealthPanel API",
        version = "0.1.0",
        description = "Extracts vitals from medical record PDFs and serves a classified dashboard",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
