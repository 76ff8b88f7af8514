use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::trend::TrendSet;

/// The vital signs a record can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum VitalKind {
    BloodPressure,
    Cholesterol,
    Glucose,
    Bmi,
}

impl VitalKind {
    /// Every vital kind, in display order
    pub const ALL: [VitalKind; 4] = [
        VitalKind::BloodPressure,
        VitalKind::Cholesterol,
        VitalKind::Glucose,
        VitalKind::Bmi,
    ];

    /// Machine-readable name
    pub fn as_str(&self) -> &'static str {
        match self {
            VitalKind::BloodPressure => "blood_pressure",
            VitalKind::Cholesterol => "cholesterol",
            VitalKind::Glucose => "glucose",
            VitalKind::Bmi => "bmi",
        }
    }
}

impl std::fmt::Display for VitalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single vital measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VitalValue {
    /// Blood pressure in mmHg
    BloodPressure { systolic: u32, diastolic: u32 },

    /// Total cholesterol in mg/dL
    Cholesterol { total: u32 },

    /// Blood glucose in mg/dL
    Glucose { value: u32 },

    /// Body mass index
    Bmi { value: f64 },
}

impl VitalValue {
    /// The kind of vital this value measures
    pub fn kind(&self) -> VitalKind {
        match self {
            VitalValue::BloodPressure { .. } => VitalKind::BloodPressure,
            VitalValue::Cholesterol { .. } => VitalKind::Cholesterol,
            VitalValue::Glucose { .. } => VitalKind::Glucose,
            VitalValue::Bmi { .. } => VitalKind::Bmi,
        }
    }
}

/// Where a reading came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Matched in an uploaded document
    Extracted,

    /// Randomly generated placeholder
    Synthesized,
}

/// A vital value together with its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalReading {
    /// The measured (or placeholder) value
    pub value: VitalValue,

    /// When the value was observed; extracted readings use the extraction time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,

    /// Whether the value is real or a placeholder
    pub provenance: Provenance,
}

impl VitalReading {
    /// A reading matched in a source document
    pub fn extracted(value: VitalValue, observed_at: DateTime<Utc>) -> Self {
        Self {
            value,
            observed_at: Some(observed_at),
            provenance: Provenance::Extracted,
        }
    }

    /// A randomly generated placeholder reading
    pub fn synthesized(value: VitalValue) -> Self {
        Self {
            value,
            observed_at: None,
            provenance: Provenance::Synthesized,
        }
    }

    pub fn kind(&self) -> VitalKind {
        self.value.kind()
    }

    pub fn is_synthesized(&self) -> bool {
        self.provenance == Provenance::Synthesized
    }
}

/// Flat view of a complete set of vitals, as consumed by the classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalsSnapshot {
    pub systolic: u32,
    pub diastolic: u32,
    pub cholesterol_total: u32,
    pub glucose: u32,
    pub bmi: f64,
}

/// The medical record of one session
#[derive(Debug, Clone, Default, Serialize)]
pub struct MedicalRecord {
    /// Latest reading per vital kind
    pub vitals: BTreeMap<VitalKind, VitalReading>,

    /// Medication names in order of appearance, duplicates preserved
    pub medications: Vec<String>,

    /// Not populated yet
    pub lab_results: Vec<String>,

    /// Not populated yet
    pub conditions: Vec<String>,

    /// Not populated yet
    pub appointments: Vec<String>,

    /// Chart trends; absent until the first synthesis pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trends: Option<TrendSet>,
}

impl MedicalRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Reading for a vital kind, if any
    pub fn vital(&self, kind: VitalKind) -> Option<&VitalReading> {
        self.vitals.get(&kind)
    }

    pub fn has_vital(&self, kind: VitalKind) -> bool {
        self.vitals.contains_key(&kind)
    }

    /// Store a reading, replacing any previous reading of the same kind
    pub fn set_vital(&mut self, reading: VitalReading) {
        self.vitals.insert(reading.kind(), reading);
    }

    /// Vital kinds still missing from the record
    pub fn missing_vitals(&self) -> Vec<VitalKind> {
        VitalKind::ALL
            .into_iter()
            .filter(|kind| !self.has_vital(*kind))
            .collect()
    }

    /// Snapshot of all four vitals, or `None` while any is missing
    pub fn snapshot(&self) -> Option<VitalsSnapshot> {
        let (systolic, diastolic) = match self.vital(VitalKind::BloodPressure)?.value {
            VitalValue::BloodPressure { systolic, diastolic } => (systolic, diastolic),
            _ => return None,
        };
        let cholesterol_total = match self.vital(VitalKind::Cholesterol)?.value {
            VitalValue::Cholesterol { total } => total,
            _ => return None,
        };
        let glucose = match self.vital(VitalKind::Glucose)?.value {
            VitalValue::Glucose { value } => value,
            _ => return None,
        };
        let bmi = match self.vital(VitalKind::Bmi)?.value {
            VitalValue::Bmi { value } => value,
            _ => return None,
        };

        Some(VitalsSnapshot {
            systolic,
            diastolic,
            cholesterol_total,
            glucose,
            bmi,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_record() -> MedicalRecord {
        let mut record = MedicalRecord::new();
        let now = Utc::now();
        record.set_vital(VitalReading::extracted(
            VitalValue::BloodPressure { systolic: 128, diastolic: 82 },
            now,
        ));
        record.set_vital(VitalReading::extracted(VitalValue::Cholesterol { total: 190 }, now));
        record.set_vital(VitalReading::synthesized(VitalValue::Glucose { value: 92 }));
        record.set_vital(VitalReading::synthesized(VitalValue::Bmi { value: 23.4 }));
        record
    }

    #[test]
    fn test_snapshot_requires_every_vital() {
        let mut record = MedicalRecord::new();
        assert!(record.snapshot().is_none());
        assert_eq!(record.missing_vitals(), VitalKind::ALL.to_vec());

        record.set_vital(VitalReading::synthesized(VitalValue::Glucose { value: 90 }));
        assert!(record.snapshot().is_none());
        assert_eq!(record.missing_vitals().len(), 3);
    }

    #[test]
    fn test_snapshot_of_complete_record() {
        let snapshot = complete_record().snapshot().unwrap();
        assert_eq!(snapshot.systolic, 128);
        assert_eq!(snapshot.diastolic, 82);
        assert_eq!(snapshot.cholesterol_total, 190);
        assert_eq!(snapshot.glucose, 92);
        assert!((snapshot.bmi - 23.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_vital_replaces_same_kind() {
        let mut record = complete_record();
        record.set_vital(VitalReading::extracted(VitalValue::Glucose { value: 140 }, Utc::now()));

        let glucose = record.vital(VitalKind::Glucose).unwrap();
        assert_eq!(glucose.value, VitalValue::Glucose { value: 140 });
        assert_eq!(glucose.provenance, Provenance::Extracted);
        assert!(glucose.observed_at.is_some());
        assert_eq!(record.vitals.len(), 4);
    }

    #[test]
    fn test_provenance_serializes_in_snake_case() {
        let reading = VitalReading::synthesized(VitalValue::Bmi { value: 24.0 });
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["provenance"], "synthesized");
        assert_eq!(json["value"]["kind"], "bmi");
        assert!(json.get("observed_at").is_none());
    }
}
