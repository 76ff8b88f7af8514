use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use health_panel_data::pdf::{load_document_text, ExtractionError, PdfTextEngine};

use crate::entities::record::VitalKind;
use crate::entities::session::{FileListing, Notice, Session, UploadSource, UploadedFile};
use crate::services::extractor::FieldExtractor;
use crate::services::synthesizer::synthesize;
use crate::services::validation::range_warnings;

/// What happened to one file of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Processed,
    Failed,
    /// Rejected by the upload source filter
    Skipped,
    /// Not reached because the batch was cancelled
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct FileOutcome {
    pub name: String,
    pub status: FileStatus,
    /// Vitals matched in this file
    pub vitals_found: Vec<VitalKind>,
    pub medications_found: usize,
}

impl FileOutcome {
    fn without_fields(name: &str, status: FileStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
            vitals_found: Vec::new(),
            medications_found: 0,
        }
    }
}

/// Result of running one upload batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct BatchReport {
    /// One entry per received file, in arrival order
    pub files: Vec<FileOutcome>,
    pub notices: Vec<Notice>,
    pub cancelled: bool,
}

impl BatchReport {
    /// Names of the files with the given status
    pub fn names(&self, status: FileStatus) -> Vec<&str> {
        self.files
            .iter()
            .filter(|outcome| outcome.status == status)
            .map(|outcome| outcome.name.as_str())
            .collect()
    }

    pub fn count(&self, status: FileStatus) -> usize {
        self.files.iter().filter(|outcome| outcome.status == status).count()
    }
}

/// Sequential per-file pipeline: load, extract, merge, synthesize
pub struct RecordPipeline {
    engine: Arc<dyn PdfTextEngine>,
    /// Held by the blocking task for the whole engine call, so a call that
    /// outlived its timeout still excludes the next one
    engine_lock: Arc<Mutex<()>>,
    extractor: FieldExtractor,
    file_timeout: Duration,
    cancel: Arc<AtomicBool>,
}

impl RecordPipeline {
    pub fn new(engine: Arc<dyn PdfTextEngine>, file_timeout: Duration) -> Self {
        Self {
            engine,
            engine_lock: Arc::new(Mutex::new(())),
            extractor: FieldExtractor::new(),
            file_timeout,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an existing cancellation flag
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    /// Handle that stops running batches before their next file
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Process a batch of files into the session, strictly in order.
    ///
    /// A failing file yields exactly one notice and never stops the batch.
    /// Cancellation is observed between files.
    pub async fn run_batch(
        &self,
        session: &mut Session,
        files: Vec<UploadedFile>,
        source: UploadSource,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        info!("Processing batch of {} file(s) from {:?}", files.len(), source);

        let mut files = files.into_iter();
        while let Some(file) = files.next() {
            if self.is_cancelled() {
                warn!("Batch cancelled before {}", file.name);
                report.cancelled = true;
                let message = ExtractionError::Cancelled.to_string();
                report.notices.push(Notice::cancelled(Some(&file.name), message));
                report.files.push(FileOutcome::without_fields(&file.name, FileStatus::Cancelled));
                for rest in files.by_ref() {
                    let outcome = FileOutcome::without_fields(&rest.name, FileStatus::Cancelled);
                    report.files.push(outcome);
                }
                break;
            }

            if !source.accepts(&file) {
                debug!("Skipping {} ({:?})", file.name, file.content_type);
                report.files.push(FileOutcome::without_fields(&file.name, FileStatus::Skipped));
                continue;
            }

            session.files.push(FileListing::from(&file));
            let outcome = self.process_file(session, file, &mut report.notices).await;
            report.files.push(outcome);
        }

        session.notices = report.notices.clone();
        session.touch();
        info!(
            processed = report.count(FileStatus::Processed),
            failed = report.count(FileStatus::Failed),
            skipped = report.count(FileStatus::Skipped),
            "Batch finished"
        );
        report
    }

    async fn process_file(
        &self,
        session: &mut Session,
        file: UploadedFile,
        notices: &mut Vec<Notice>,
    ) -> FileOutcome {
        let name = file.name;

        let text = match self.load_text(file.bytes).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to process {}: {}", name, e);
                notices.push(Notice::extraction_failed(&name, e.to_string()));
                return FileOutcome::without_fields(&name, FileStatus::Failed);
            }
        };

        let fields = self.extractor.extract(&text);
        for warning in range_warnings(&fields) {
            warn!("{}: {}", name, warning);
            notices.push(Notice::validation_warning(&name, warning));
        }

        fields.merge_into(&mut session.record, Utc::now());
        synthesize(&mut session.record, &mut session.rng);
        session.has_processed_file = true;

        debug!("Processed {}", name);
        FileOutcome {
            vitals_found: fields.vitals().iter().map(|value| value.kind()).collect(),
            medications_found: fields.medications.len(),
            ..FileOutcome::without_fields(&name, FileStatus::Processed)
        }
    }

    /// Run the engine on the blocking pool, bounded by the per-file timeout.
    ///
    /// At most one engine call is in flight per pipeline. Waiting for an
    /// abandoned call to release the engine is bounded by the same timeout.
    async fn load_text(&self, bytes: Vec<u8>) -> Result<String, ExtractionError> {
        let lock = Arc::clone(&self.engine_lock).lock_owned();
        let guard = tokio::time::timeout(self.file_timeout, lock)
            .await
            .map_err(|_| {
                warn!("PDF engine still busy with an abandoned call");
                ExtractionError::Timeout(self.file_timeout)
            })?;

        let engine = Arc::clone(&self.engine);
        let task = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            load_document_text(engine.as_ref(), &bytes)
        });

        match tokio::time::timeout(self.file_timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(ExtractionError::Engine(join_error.to_string())),
            Err(_) => Err(ExtractionError::Timeout(self.file_timeout)),
        }
    }
}
