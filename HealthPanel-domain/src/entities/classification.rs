use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// How worrying a status is, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Good,
    Warning,
    Danger,
}

impl Severity {
    /// Style class used by the dashboard
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Good => "health-good",
            Severity::Warning => "health-warning",
            Severity::Danger => "health-danger",
        }
    }
}

/// Blood pressure status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum BloodPressureStatus {
    /// Systolic ≤ 130 and diastolic ≤ 80
    Normal,

    /// Systolic ≤ 140 and diastolic ≤ 90
    Elevated,

    /// Anything higher
    High,
}

impl BloodPressureStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BloodPressureStatus::Normal => "Normal",
            BloodPressureStatus::Elevated => "Elevated",
            BloodPressureStatus::High => "High",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            BloodPressureStatus::Normal => Severity::Good,
            BloodPressureStatus::Elevated => Severity::Warning,
            BloodPressureStatus::High => Severity::Danger,
        }
    }
}

/// BMI status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum BmiStatus {
    /// BMI ≤ 25
    Normal,

    /// 25 < BMI ≤ 30
    Overweight,

    /// BMI > 30
    Obese,
}

impl BmiStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BmiStatus::Normal => "Normal",
            BmiStatus::Overweight => "Overweight",
            BmiStatus::Obese => "Obese",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            BmiStatus::Normal => Severity::Good,
            BmiStatus::Overweight => Severity::Warning,
            BmiStatus::Obese => Severity::Danger,
        }
    }
}

/// Risk tier for a disease category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Style class used by the dashboard
    pub fn css_class(&self) -> &'static str {
        match self {
            RiskLevel::Low => "risk-low",
            RiskLevel::Medium => "risk-medium",
            RiskLevel::High => "risk-high",
        }
    }
}

/// Risk per disease category. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct RiskAssessment {
    pub cardiovascular: RiskLevel,
    pub stroke: RiskLevel,
    /// Always `Low`; glucose is not considered yet
    pub diabetes: RiskLevel,
}

/// One (category, label, severity class) triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ClassificationEntry {
    pub category: String,
    pub label: String,
    pub severity_class: String,
}

impl ClassificationEntry {
    fn new(category: &str, label: &str, severity_class: &str) -> Self {
        Self {
            category: category.to_string(),
            label: label.to_string(),
            severity_class: severity_class.to_string(),
        }
    }
}

/// Result of classifying a vitals snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct HealthClassification {
    pub blood_pressure: BloodPressureStatus,
    pub bmi: BmiStatus,
    pub risk: RiskAssessment,
}

impl HealthClassification {
    /// Flatten into display entries, statuses first then risks
    pub fn entries(&self) -> Vec<ClassificationEntry> {
        vec![
            ClassificationEntry::new(
                "blood_pressure",
                self.blood_pressure.label(),
                self.blood_pressure.severity().css_class(),
            ),
            ClassificationEntry::new("bmi", self.bmi.label(), self.bmi.severity().css_class()),
            ClassificationEntry::new(
                "cardiovascular",
                self.risk.cardiovascular.label(),
                self.risk.cardiovascular.css_class(),
            ),
            ClassificationEntry::new(
                "diabetes",
                self.risk.diabetes.label(),
                self.risk.diabetes.css_class(),
            ),
            ClassificationEntry::new(
                "stroke",
                self.risk.stroke.label(),
                self.risk.stroke.css_class(),
            ),
        ]
    }
}
