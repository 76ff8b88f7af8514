use std::sync::Arc;

use axum::{
    extract::{Json, Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use health_panel_domain::entities::{DashboardView, UploadedFile};
use health_panel_domain::services::{
    create_default_medical_record_service, MedicalRecordServiceTrait, RecordServiceError,
    UploadOutcome,
};

use crate::config::AppConfig;
use crate::entities::common::ErrorResponse;
use crate::entities::records::{SessionCreatedResponse, UploadForm, UploadQuery};

/// Multipart field names that carry files
const FILE_FIELDS: [&str; 2] = ["file", "files"];

/// Service type for dependency injection
pub type RecordService = Arc<dyn MedicalRecordServiceTrait>;

/// Create a default service for the handlers to use
pub fn create_service(config: &AppConfig) -> RecordService {
    Arc::new(create_default_medical_record_service(config.service_config()))
}

/// Log a service error and convert it to a response
fn service_error(err: RecordServiceError) -> ErrorResponse {
    match &err {
        RecordServiceError::RepositoryError(msg) => error!("Record service failure: {}", msg),
        other => info!("Request rejected: {}", other),
    }
    ErrorResponse::from(err)
}

/// Create an empty session
#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    responses(
        (status = 201, description = "Session created", body = SessionCreatedResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "sessions"
)]
#[instrument(skip(service))]
pub async fn create_session(
    State(service): State<RecordService>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let session_id = service.create_session().await.map_err(service_error)?;
    Ok((StatusCode::CREATED, Json(SessionCreatedResponse { session_id })))
}

/// Upload one or more PDF records into a session
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/uploads",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        UploadQuery
    ),
    request_body(
        content = UploadForm,
        content_type = "multipart/form-data",
        description = "One or more `file`/`files` parts"
    ),
    responses(
        (status = 200, description = "Batch processed", body = UploadOutcome),
        (status = 400, description = "No files or malformed body", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "sessions"
)]
#[instrument(skip(service, multipart))]
pub async fn upload_files(
    State(service): State<RecordService>,
    Path(id): Path<Uuid>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<Json<UploadOutcome>, ErrorResponse> {
    let source = query.source.unwrap_or_default();
    let mut files = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read multipart body: {}", e);
                return Err(ErrorResponse::bad_request("Failed to read multipart body"));
            }
        };

        let field_name = field.name().unwrap_or_default().to_string();
        if !FILE_FIELDS.contains(&field_name.as_str()) {
            debug!("Ignoring multipart field {}", field_name);
            continue;
        }

        let file_name = field.file_name().unwrap_or("document.pdf").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| {
            warn!("Failed to read upload bytes for {}: {}", file_name, e);
            ErrorResponse::bad_request("Failed to read file data")
        })?;

        files.push(UploadedFile::new(file_name, content_type.as_deref(), bytes.to_vec()));
    }

    info!("Received {} file(s) for session {}", files.len(), id);
    let outcome = service
        .process_uploads(id, files, source)
        .await
        .map_err(service_error)?;

    Ok(Json(outcome))
}

/// Recompute the dashboard of a session
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}/dashboard",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Dashboard view", body = DashboardView),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "No file processed yet", body = ErrorResponse),
    ),
    tag = "sessions"
)]
#[instrument(skip(service))]
pub async fn get_dashboard(
    State(service): State<RecordService>,
    Path(id): Path<Uuid>,
) -> Result<Json<DashboardView>, ErrorResponse> {
    let dashboard = service.get_dashboard(id).await.map_err(service_error)?;
    Ok(Json(dashboard))
}

/// End a session and discard its record
#[utoipa::path(
    delete,
    path = "/api/v1/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 204, description = "Session ended"),
        (status = 404, description = "Session not found", body = ErrorResponse),
    ),
    tag = "sessions"
)]
#[instrument(skip(service))]
pub async fn end_session(
    State(service): State<RecordService>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ErrorResponse> {
    service.end_session(id).await.map_err(service_error)?;
    Ok(StatusCode::NO_CONTENT)
}
