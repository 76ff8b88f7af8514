use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use health_panel_domain::entities::UploadSource;

/// Response returned when a session is created
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionCreatedResponse {
    /// Identifier used by every other session endpoint
    pub session_id: Uuid,
}

/// Query parameters for uploads
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// `picker` (default) accepts every file, `drop` only `application/pdf`
    pub source: Option<UploadSource>,
}

/// Multipart upload body, documented for OpenAPI only
#[derive(ToSchema)]
pub struct UploadForm {
    /// PDF files, sent as repeated `files` (or `file`) parts
    #[schema(value_type = Vec<String>)]
    pub files: Vec<Vec<u8>>,
}
