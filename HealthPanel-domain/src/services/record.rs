use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use health_panel_data::pdf::{LopdfEngine, PdfTextEngine};
use health_panel_data::repository::{RepositoryError, SessionRepository, SessionRepositoryTrait};

use crate::entities::dashboard::DashboardView;
use crate::entities::session::{Session, UploadSource, UploadedFile};
use crate::services::pipeline::{BatchReport, RecordPipeline};
use crate::services::presenter::build_dashboard;

/// Shared, lockable session state
pub type SessionHandle = Arc<Mutex<Session>>;

/// Record service errors
#[derive(Debug, Error)]
pub enum RecordServiceError {
    /// Unknown session id
    #[error("Session not found: {0}")]
    NotFound(String),

    /// The session has no vitals yet
    #[error("Incomplete record: {0}")]
    IncompleteRecord(String),

    /// The upload contained no files
    #[error("No files were supplied")]
    NoFiles,

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Tunables for the record service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Upper bound for one file's text extraction
    pub file_timeout: Duration,

    /// Seed for every session's random source; entropy when unset
    pub synthesis_seed: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            file_timeout: Duration::from_secs(30),
            synthesis_seed: None,
        }
    }
}

/// Batch report together with the refreshed dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct UploadOutcome {
    pub report: BatchReport,
    /// Absent until a file in the session has been processed
    pub dashboard: Option<DashboardView>,
}

/// Trait for medical record service operations
#[async_trait]
pub trait MedicalRecordServiceTrait: Send + Sync {
    /// Create an empty session
    async fn create_session(&self) -> Result<Uuid, RecordServiceError>;

    /// Run a batch of uploaded files through the pipeline
    async fn process_uploads(
        &self,
        session_id: Uuid,
        files: Vec<UploadedFile>,
        source: UploadSource,
    ) -> Result<UploadOutcome, RecordServiceError>;

    /// Recompute the dashboard for a session
    async fn get_dashboard(&self, session_id: Uuid) -> Result<DashboardView, RecordServiceError>;

    /// Discard a session and its record
    async fn end_session(&self, session_id: Uuid) -> Result<(), RecordServiceError>;

    /// Number of live sessions
    async fn session_count(&self) -> Result<usize, RecordServiceError>;

    /// Name of the PDF engine in use
    fn engine_name(&self) -> &'static str;

    /// Stop running batches before their next file
    fn cancel_processing(&self);
}

/// Medical record service backed by a session repository
pub struct MedicalRecordService<R: SessionRepositoryTrait<SessionHandle>> {
    repository: R,
    pipeline: RecordPipeline,
    config: ServiceConfig,
}

impl<R: SessionRepositoryTrait<SessionHandle>> MedicalRecordService<R> {
    /// Create a new medical record service
    pub fn new(repository: R, engine: Arc<dyn PdfTextEngine>, config: ServiceConfig) -> Self {
        let pipeline = RecordPipeline::new(engine, config.file_timeout);
        Self {
            repository,
            pipeline,
            config,
        }
    }

    /// Map repository errors to service errors
    fn map_repo_error(&self, err: RepositoryError) -> RecordServiceError {
        match err {
            RepositoryError::NotFound(msg) => RecordServiceError::NotFound(msg),
            _ => RecordServiceError::RepositoryError(err.to_string()),
        }
    }

    async fn session(&self, session_id: Uuid) -> Result<SessionHandle, RecordServiceError> {
        self.repository
            .get(session_id)
            .await
            .map_err(|e| self.map_repo_error(e))?
            .ok_or_else(|| RecordServiceError::NotFound(session_id.to_string()))
    }
}

#[async_trait]
impl<R> MedicalRecordServiceTrait for MedicalRecordService<R>
where
    R: SessionRepositoryTrait<SessionHandle>,
{
    async fn create_session(&self) -> Result<Uuid, RecordServiceError> {
        let session = Session::new(self.config.synthesis_seed);
        let id = self
            .repository
            .create(Arc::new(Mutex::new(session)))
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!("Created session {}", id);
        Ok(id)
    }

    async fn process_uploads(
        &self,
        session_id: Uuid,
        files: Vec<UploadedFile>,
        source: UploadSource,
    ) -> Result<UploadOutcome, RecordServiceError> {
        if files.is_empty() {
            return Err(RecordServiceError::NoFiles);
        }

        let handle = self.session(session_id).await?;
        let mut session = handle.lock().await;

        let report = self.pipeline.run_batch(&mut session, files, source).await;
        let dashboard = if session.has_processed_file {
            dashboard_of(&session)
        } else {
            None
        };

        Ok(UploadOutcome { report, dashboard })
    }

    async fn get_dashboard(&self, session_id: Uuid) -> Result<DashboardView, RecordServiceError> {
        let handle = self.session(session_id).await?;
        let session = handle.lock().await;

        dashboard_of(&session).ok_or_else(|| {
            debug!("Session {} has no vitals yet", session_id);
            RecordServiceError::IncompleteRecord(
                "no file has been processed in this session yet".to_string(),
            )
        })
    }

    async fn end_session(&self, session_id: Uuid) -> Result<(), RecordServiceError> {
        self.repository
            .remove(session_id)
            .await
            .map_err(|e| self.map_repo_error(e))?;

        info!("Ended session {}", session_id);
        Ok(())
    }

    async fn session_count(&self) -> Result<usize, RecordServiceError> {
        self.repository.count().await.map_err(|e| self.map_repo_error(e))
    }

    fn engine_name(&self) -> &'static str {
        self.pipeline.engine_name()
    }

    fn cancel_processing(&self) {
        info!("Cancelling in-flight batches");
        self.pipeline.cancel();
    }
}

/// Dashboard of a session as of today
fn dashboard_of(session: &Session) -> Option<DashboardView> {
    let today = Local::now().date_naive();
    build_dashboard(&session.record, &session.files, &session.notices, today)
}

/// Create a default medical record service using the in-memory session store and lopdf
pub fn create_default_medical_record_service(
    config: ServiceConfig,
) -> impl MedicalRecordServiceTrait {
    let repository = SessionRepository::<SessionHandle>::new();
    MedicalRecordService::new(repository, Arc::new(LopdfEngine::new()), config)
}

/// Create a mock medical record service for testing
/// This function is only available when the mock feature is enabled
#[cfg(feature = "mock")]
pub fn create_mock_medical_record_service() -> impl MedicalRecordServiceTrait {
    crate::testing::MockMedicalRecordService::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::record::VitalKind;
    use crate::services::pipeline::FileStatus;
    use crate::testing::{stub_pdf, StubPdfEngine};

    fn service() -> MedicalRecordService<SessionRepository<SessionHandle>> {
        let config = ServiceConfig {
            file_timeout: Duration::from_secs(5),
            synthesis_seed: Some(42),
        };
        MedicalRecordService::new(SessionRepository::new(), Arc::new(StubPdfEngine::new()), config)
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let service = service();
        let id = service.create_session().await.unwrap();
        assert_eq!(service.session_count().await.unwrap(), 1);

        service.end_session(id).await.unwrap();
        assert_eq!(service.session_count().await.unwrap(), 0);
        assert!(matches!(
            service.end_session(id).await,
            Err(RecordServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let service = service();
        let result = service.get_dashboard(Uuid::new_v4()).await;
        assert!(matches!(result, Err(RecordServiceError::NotFound(_))));

        let files = vec![stub_pdf("a.pdf", "Glucose: 90")];
        let result = service
            .process_uploads(Uuid::new_v4(), files, UploadSource::Picker)
            .await;
        assert!(matches!(result, Err(RecordServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_empty_upload_is_rejected() {
        let service = service();
        let id = service.create_session().await.unwrap();
        let result = service.process_uploads(id, Vec::new(), UploadSource::Picker).await;
        assert!(matches!(result, Err(RecordServiceError::NoFiles)));
    }

    #[tokio::test]
    async fn test_dashboard_requires_a_processed_file() {
        let service = service();
        let id = service.create_session().await.unwrap();
        assert!(matches!(
            service.get_dashboard(id).await,
            Err(RecordServiceError::IncompleteRecord(_))
        ));

        let outcome = service
            .process_uploads(id, vec![stub_pdf("bad.pdf", "CORRUPT")], UploadSource::Picker)
            .await
            .unwrap();
        assert!(outcome.dashboard.is_none());
        assert_eq!(outcome.report.count(FileStatus::Failed), 1);
        assert!(service.get_dashboard(id).await.is_err());
    }

    #[tokio::test]
    async fn test_upload_produces_dashboard() {
        let service = service();
        let id = service.create_session().await.unwrap();

        let outcome = service
            .process_uploads(
                id,
                vec![stub_pdf(
                    "visit.pdf",
                    "Blood Pressure: 130/85\nMedications: Lisinopril, Metformin",
                )],
                UploadSource::Picker,
            )
            .await
            .unwrap();

        let dashboard = outcome.dashboard.unwrap();
        assert_eq!(dashboard.vital(VitalKind::BloodPressure).unwrap().display, "130/85");
        assert_eq!(dashboard.medications.len(), 2);
        assert_eq!(dashboard.files.len(), 1);

        let again = service.get_dashboard(id).await.unwrap();
        assert_eq!(again.vitals, dashboard.vitals);
        assert_eq!(again.charts, dashboard.charts);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let service = service();
        let first = service.create_session().await.unwrap();
        let second = service.create_session().await.unwrap();

        service
            .process_uploads(first, vec![stub_pdf("a.pdf", "Glucose: 99")], UploadSource::Picker)
            .await
            .unwrap();

        assert!(service.get_dashboard(first).await.is_ok());
        assert!(service.get_dashboard(second).await.is_err());
    }

    #[tokio::test]
    async fn test_same_seed_sessions_synthesize_identically() {
        let service = service();
        let first = service.create_session().await.unwrap();
        let second = service.create_session().await.unwrap();

        for id in [first, second] {
            let files = vec![stub_pdf("empty.pdf", "Nothing here")];
            service
                .process_uploads(id, files, UploadSource::Picker)
                .await
                .unwrap();
        }

        let a = service.get_dashboard(first).await.unwrap();
        let b = service.get_dashboard(second).await.unwrap();
        assert_eq!(a.vitals, b.vitals);
        assert_eq!(a.charts, b.charts);
    }

    #[tokio::test]
    async fn test_cancel_processing_stops_batches() {
        let service = service();
        let id = service.create_session().await.unwrap();
        service.cancel_processing();

        let outcome = service
            .process_uploads(id, vec![stub_pdf("a.pdf", "Glucose: 99")], UploadSource::Picker)
            .await
            .unwrap();
        assert!(outcome.report.cancelled);
        assert!(outcome.dashboard.is_none());
    }

    #[test]
    fn test_engine_name() {
        assert_eq!(service().engine_name(), "stub");
    }
}
