use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::record::MedicalRecord;

/// Content type accepted by drag-and-drop uploads
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A file received in an upload batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.map(str::to_string),
            bytes,
        }
    }

    /// A file declared as `application/pdf`
    pub fn pdf(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::new(name, Some(PDF_CONTENT_TYPE), bytes)
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type.as_deref() == Some(PDF_CONTENT_TYPE)
    }
}

/// How a batch of files was submitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum UploadSource {
    /// File picker: every file is accepted
    #[default]
    Picker,

    /// Drag and drop: only `application/pdf` files are accepted
    Drop,
}

impl UploadSource {
    pub fn accepts(&self, file: &UploadedFile) -> bool {
        match self {
            UploadSource::Picker => true,
            UploadSource::Drop => file.is_pdf(),
        }
    }
}

/// Name and size of a received file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct FileListing {
    pub name: String,
    pub size_bytes: u64,
    /// Size in megabytes with two decimals, e.g. "0.02 MB"
    pub size_display: String,
}

impl From<&UploadedFile> for FileListing {
    fn from(file: &UploadedFile) -> Self {
        Self {
            name: file.name.clone(),
            size_bytes: file.size(),
            size_display: format_megabytes(file.size()),
        }
    }
}

/// Format a byte count as megabytes with two decimals
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// The file could not be turned into text
    ExtractionFailed,

    /// An extracted value is outside physiological bounds; the value is kept
    ValidationWarning,

    /// The batch stopped before this file
    Cancelled,
}

/// A user-visible message raised while processing a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Notice {
    pub kind: NoticeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub message: String,
}

impl Notice {
    pub fn extraction_failed(file_name: &str, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::ExtractionFailed,
            file_name: Some(file_name.to_string()),
            message: message.into(),
        }
    }

    pub fn validation_warning(file_name: &str, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::ValidationWarning,
            file_name: Some(file_name.to_string()),
            message: message.into(),
        }
    }

    pub fn cancelled(file_name: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Cancelled,
            file_name: file_name.map(str::to_string),
            message: message.into(),
        }
    }
}

/// One user's in-memory working state
#[derive(Debug)]
pub struct Session {
    pub record: MedicalRecord,
    pub(crate) rng: StdRng,
    /// Every file accepted so far, in arrival order
    pub files: Vec<FileListing>,
    /// Notices raised by the most recent batch
    pub notices: Vec<Notice>,
    /// Whether any file in this session has been processed successfully
    pub has_processed_file: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create an empty session; a seed makes synthesis reproducible
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let now = Utc::now();

        Self {
            record: MedicalRecord::new(),
            rng,
            files: Vec::new(),
            notices: Vec::new(),
            has_processed_file: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
