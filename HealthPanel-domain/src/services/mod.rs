pub mod classifier;
pub mod extractor;
pub mod pipeline;
pub mod presenter;
pub mod record;
pub mod synthesizer;
pub mod validation;

// Domain services
// Extraction, synthesis, classification and presentation, plus the
// session-level record service that drives them.

// Re-export service traits and factory functions
pub use record::{
    create_default_medical_record_service, MedicalRecordServiceTrait, RecordServiceError,
    ServiceConfig, UploadOutcome,
};

// Re-export mock service factory functions when the mock feature is enabled
#[cfg(feature = "mock")]
pub use record::create_mock_medical_record_service;
