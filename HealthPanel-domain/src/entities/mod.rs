// Domain entities and value objects
pub mod classification;
pub mod dashboard;
pub mod record;
pub mod session;
pub mod trend;

// Re-export common types for easier imports
pub use classification::{
    BloodPressureStatus, BmiStatus, ClassificationEntry, HealthClassification, RiskAssessment,
    RiskLevel, Severity,
};
pub use dashboard::{ChartAxis, ChartDataset, ChartKind, ChartSpec, DashboardView};
pub use record::{MedicalRecord, Provenance, VitalKind, VitalReading, VitalValue, VitalsSnapshot};
pub use session::{FileListing, Notice, NoticeKind, Session, UploadSource, UploadedFile};
pub use trend::{TrendSeries, TrendSet, TREND_LENGTH, TREND_MONTHS};
