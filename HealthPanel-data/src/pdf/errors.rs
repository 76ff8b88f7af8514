use std::time::Duration;
use thiserror::Error;

/// Error type for turning an uploaded file into document text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// The bytes are not a readable PDF
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    /// A single page could not be decoded
    #[error("Failed to extract text from page {page}: {message}")]
    Page {
        /// Page number (1-indexed)
        page: u32,
        /// Engine message
        message: String,
    },

    /// The engine did not answer within the per-file budget
    #[error("PDF extraction timed out after {0:?}")]
    Timeout(Duration),

    /// Processing was cancelled before this file was loaded
    #[error("Processing was cancelled before this file")]
    Cancelled,

    /// The engine task itself failed
    #[error("PDF engine error: {0}")]
    Engine(String),
}
