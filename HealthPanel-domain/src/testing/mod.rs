// Testing utilities and mock implementations for the domain layer
// This module is only available in tests or when the "mock" feature is enabled

// Re-export the PDF fixture builder from the data layer
pub use health_panel_data::pdf::fixtures::build_text_pdf;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use health_panel_data::pdf::{ExtractionError, PdfTextEngine};

use crate::entities::dashboard::DashboardView;
use crate::entities::record::{MedicalRecord, VitalReading, VitalValue};
use crate::entities::session::{UploadSource, UploadedFile};
use crate::services::pipeline::{BatchReport, FileOutcome, FileStatus};
use crate::services::presenter::build_dashboard;
use crate::services::record::{MedicalRecordServiceTrait, RecordServiceError, UploadOutcome};
use crate::services::synthesizer::synthesize;

/// Form feed separates pages in stub documents
pub const STUB_PAGE_BREAK: char = '\x0c';

/// A PDF engine that reads bytes as UTF-8 text.
///
/// Pages are separated by form feeds. Documents starting with `CORRUPT` are
/// rejected, documents starting with `HANG` block for the configured delay.
#[derive(Debug, Clone)]
pub struct StubPdfEngine {
    hang: Duration,
    cancel_on_extract: Option<Arc<AtomicBool>>,
}

impl Default for StubPdfEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StubPdfEngine {
    pub fn new() -> Self {
        Self {
            hang: Duration::from_secs(1),
            cancel_on_extract: None,
        }
    }

    /// How long `HANG` documents block
    pub fn with_hang(mut self, hang: Duration) -> Self {
        self.hang = hang;
        self
    }

    /// Raise the given flag whenever a document is extracted
    pub fn cancel_on_extract(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_on_extract = Some(flag);
        self
    }
}

impl PdfTextEngine for StubPdfEngine {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        if let Some(flag) = &self.cancel_on_extract {
            flag.store(true, Ordering::SeqCst);
        }

        let text = std::str::from_utf8(bytes)
            .map_err(|e| ExtractionError::InvalidPdf(e.to_string()))?;
        if text.starts_with("CORRUPT") {
            return Err(ExtractionError::InvalidPdf("stub document marked as corrupt".to_string()));
        }
        if text.starts_with("HANG") {
            std::thread::sleep(self.hang);
        }

        Ok(text.split(STUB_PAGE_BREAK).map(str::to_string).collect())
    }
}

/// An `application/pdf` upload whose bytes are read as text by [`StubPdfEngine`]
pub fn stub_pdf(name: &str, text: &str) -> UploadedFile {
    UploadedFile::pdf(name, text.as_bytes().to_vec())
}

/// A complete record with fixed vitals and seeded trends
pub fn sample_record() -> MedicalRecord {
    let mut record = MedicalRecord::new();
    let now = Utc::now();
    record.set_vital(VitalReading::extracted(
        VitalValue::BloodPressure {
            systolic: 128,
            diastolic: 82,
        },
        now,
    ));
    record.set_vital(VitalReading::extracted(VitalValue::Cholesterol { total: 190 }, now));
    record.medications = vec!["Lisinopril".to_string()];
    synthesize(&mut record, &mut StdRng::seed_from_u64(0));
    record
}

/// Dashboard of [`sample_record`]
pub fn sample_dashboard() -> DashboardView {
    let date = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");
    build_dashboard(&sample_record(), &[], &[], date).expect("sample record is complete")
}

/// Mock implementation of the MedicalRecordServiceTrait for testing
pub struct MockMedicalRecordService {
    sessions: RwLock<HashSet<Uuid>>,
    should_fail_repository: bool,
}

impl Default for MockMedicalRecordService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMedicalRecordService {
    /// Create a new mock medical record service
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashSet::new()),
            should_fail_repository: false,
        }
    }

    /// Configure the mock to fail every repository access
    pub fn with_repository_failure(mut self) -> Self {
        self.should_fail_repository = true;
        self
    }

    /// Add a pre-existing session to the mock
    pub fn with_session(self, id: Uuid) -> Self {
        self.sessions.write().unwrap().insert(id);
        self
    }

    fn check_repository(&self) -> Result<(), RecordServiceError> {
        if self.should_fail_repository {
            Err(RecordServiceError::RepositoryError(
                "mock is configured to fail repository access".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn check_session(&self, id: Uuid) -> Result<(), RecordServiceError> {
        self.check_repository()?;
        if self.sessions.read().unwrap().contains(&id) {
            Ok(())
        } else {
            Err(RecordServiceError::NotFound(id.to_string()))
        }
    }
}

#[async_trait]
impl MedicalRecordServiceTrait for MockMedicalRecordService {
    async fn create_session(&self) -> Result<Uuid, RecordServiceError> {
        self.check_repository()?;
        let id = Uuid::new_v4();
        self.sessions.write().unwrap().insert(id);
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
        self.check_session(session_id)?;

        let report = BatchReport {
            files: files
                .iter()
                .map(|file| FileOutcome {
                    name: file.name.clone(),
                    status: if source.accepts(file) {
                        FileStatus::Processed
                    } else {
                        FileStatus::Skipped
                    },
                    vitals_found: Vec::new(),
                    medications_found: 0,
                })
                .collect(),
            notices: Vec::new(),
            cancelled: false,
        };

        Ok(UploadOutcome {
            report,
            dashboard: Some(sample_dashboard()),
        })
    }

    async fn get_dashboard(&self, session_id: Uuid) -> Result<DashboardView, RecordServiceError> {
        self.check_session(session_id)?;
        Ok(sample_dashboard())
    }

    async fn end_session(&self, session_id: Uuid) -> Result<(), RecordServiceError> {
        self.check_session(session_id)?;
        self.sessions.write().unwrap().remove(&session_id);
        Ok(())
    }

    async fn session_count(&self) -> Result<usize, RecordServiceError> {
        self.check_repository()?;
        Ok(self.sessions.read().unwrap().len())
    }

    fn engine_name(&self) -> &'static str {
        "mock"
    }

    fn cancel_processing(&self) {}
}
