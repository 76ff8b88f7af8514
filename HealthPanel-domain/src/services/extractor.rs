use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::entities::record::{MedicalRecord, VitalReading, VitalValue};

static BLOOD_PRESSURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)blood pressure[:\s]+([0-9]+)/([0-9]+)")
        .expect("blood pressure pattern is valid")
});
static CHOLESTEROL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)cholesterol[:\s]+([0-9]+)").expect("cholesterol pattern is valid")
});
static GLUCOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)glucose[:\s]+([0-9]+)").expect("glucose pattern is valid"));
static BMI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)bmi[:\s]+([0-9]+\.?[0-9]*)").expect("bmi pattern is valid"));
static MEDICATION_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)medications?[:\s]+").expect("medication label pattern is valid"));
static MEDICATION_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w\s,]+").expect("medication list pattern is valid"));

/// One pattern lookup populating one vital or the medication list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionRule {
    BloodPressure,
    Cholesterol,
    Glucose,
    Bmi,
    Medications,
}

impl ExtractionRule {
    /// Rules in the order they are applied
    pub const ALL: [ExtractionRule; 5] = [
        ExtractionRule::BloodPressure,
        ExtractionRule::Cholesterol,
        ExtractionRule::Glucose,
        ExtractionRule::Bmi,
        ExtractionRule::Medications,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExtractionRule::BloodPressure => "blood_pressure",
            ExtractionRule::Cholesterol => "cholesterol",
            ExtractionRule::Glucose => "glucose",
            ExtractionRule::Bmi => "bmi",
            ExtractionRule::Medications => "medications",
        }
    }
}

/// Values found in a single document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFields {
    pub blood_pressure: Option<(u32, u32)>,
    pub cholesterol: Option<u32>,
    pub glucose: Option<u32>,
    pub bmi: Option<f64>,
    pub medications: Vec<String>,
}

impl ExtractedFields {
    /// Vital values found, in rule order
    pub fn vitals(&self) -> Vec<VitalValue> {
        let mut values = Vec::new();
        if let Some((systolic, diastolic)) = self.blood_pressure {
            values.push(VitalValue::BloodPressure { systolic, diastolic });
        }
        if let Some(total) = self.cholesterol {
            values.push(VitalValue::Cholesterol { total });
        }
        if let Some(value) = self.glucose {
            values.push(VitalValue::Glucose { value });
        }
        if let Some(value) = self.bmi {
            values.push(VitalValue::Bmi { value });
        }
        values
    }

    pub fn is_empty(&self) -> bool {
        self.vitals().is_empty() && self.medications.is_empty()
    }

    /// Merge into a record: found vitals replace earlier ones, medications accumulate
    pub fn merge_into(&self, record: &mut MedicalRecord, observed_at: DateTime<Utc>) {
        for value in self.vitals() {
            record.set_vital(VitalReading::extracted(value, observed_at));
        }
        record.medications.extend(self.medications.iter().cloned());
    }
}

/// Scans document text with the fixed rule list
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldExtractor;

impl FieldExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Apply every rule once to the document text
    pub fn extract(&self, text: &str) -> ExtractedFields {
        let mut fields = ExtractedFields::default();

        for rule in ExtractionRule::ALL {
            match rule {
                ExtractionRule::BloodPressure => {
                    fields.blood_pressure = BLOOD_PRESSURE.captures(text).and_then(|caps| {
                        Some((parse_integer(rule, &caps, 1)?, parse_integer(rule, &caps, 2)?))
                    });
                }
                ExtractionRule::Cholesterol => {
                    fields.cholesterol = CHOLESTEROL
                        .captures(text)
                        .and_then(|caps| parse_integer(rule, &caps, 1));
                }
                ExtractionRule::Glucose => {
                    fields.glucose = GLUCOSE
                        .captures(text)
                        .and_then(|caps| parse_integer(rule, &caps, 1));
                }
                ExtractionRule::Bmi => {
                    fields.bmi = BMI.captures(text).and_then(|caps| parse_decimal(rule, &caps, 1));
                }
                ExtractionRule::Medications => {
                    fields.medications = extract_medications(text);
                }
            }
        }

        debug!(
            vitals = fields.vitals().len(),
            medications = fields.medications.len(),
            "Extracted fields from document"
        );
        fields
    }
}

fn parse_integer(rule: ExtractionRule, caps: &Captures<'_>, group: usize) -> Option<u32> {
    let raw = caps.get(group)?.as_str();
    match raw.parse::<u32>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(rule = rule.name(), value = raw, "Ignoring unparseable number: {}", e);
            None
        }
    }
}

fn parse_decimal(rule: ExtractionRule, caps: &Captures<'_>, group: usize) -> Option<f64> {
    let raw = caps.get(group)?.as_str();
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        Ok(_) => {
            warn!(rule = rule.name(), value = raw, "Ignoring non-finite number");
            None
        }
        Err(e) => {
            warn!(rule = rule.name(), value = raw, "Ignoring unparseable number: {}", e);
            None
        }
    }
}

/// Every medication list in order of appearance.
///
/// A list runs from its label to the next medication label at most, so
/// consecutive labels yield separate lists.
fn extract_medications(text: &str) -> Vec<String> {
    let labels: Vec<(usize, usize)> = MEDICATION_LABEL
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();

    let mut medications = Vec::new();
    for (index, &(_, list_start)) in labels.iter().enumerate() {
        let list_end = labels.get(index + 1).map_or(text.len(), |&(next_start, _)| next_start);
        let region = &text[list_start..list_end.max(list_start)];

        if let Some(list) = MEDICATION_LIST.find(region) {
            medications.extend(
                list.as_str()
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string),
            );
        }
    }
    medications
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_blood_pressure() {
        let fields = FieldExtractor::new().extract("Blood Pressure: 130/85");
        assert_eq!(fields.blood_pressure, Some((130, 85)));
        assert_eq!(fields.cholesterol, None);
    }

    #[test]
    fn test_rules_are_case_insensitive_and_independent() {
        let text = "GLUCOSE 101\nbmi: 27.35\nno pressure here";
        let fields = FieldExtractor::new().extract(text);

        assert_eq!(fields.blood_pressure, None);
        assert_eq!(fields.glucose, Some(101));
        assert_eq!(fields.bmi, Some(27.35));
    }

    #[test]
    fn test_first_match_wins() {
        let text = "Cholesterol: 210 ... Cholesterol: 180";
        assert_eq!(FieldExtractor::new().extract(text).cholesterol, Some(210));
    }

    #[test]
    fn test_out_of_range_values_are_stored_as_is() {
        let fields = FieldExtractor::new().extract("Blood Pressure: 9999/5");
        assert_eq!(fields.blood_pressure, Some((9999, 5)));
    }

    #[test]
    fn test_overflowing_number_is_no_match() {
        let text = "Cholesterol: 99999999999999999999 Glucose: 90";
        let fields = FieldExtractor::new().extract(text);
        assert_eq!(fields.cholesterol, None);
        assert_eq!(fields.glucose, Some(90));
    }

    #[test]
    fn test_bmi_without_fraction() {
        assert_eq!(FieldExtractor::new().extract("BMI 31").bmi, Some(31.0));
    }

    #[test]
    fn test_medications_in_order_of_appearance() {
        let text = "Medications: Lisinopril, Metformin.\nBlood Pressure: 128/82\nMedication: Aspirin";
        let fields = FieldExtractor::new().extract(text);
        assert_eq!(fields.medications, vec!["Lisinopril", "Metformin", "Aspirin"]);
    }

    #[test]
    fn test_adjacent_medication_labels_stay_separate() {
        let text = "Medications: Lisinopril, Metformin medication: Aspirin";
        let fields = FieldExtractor::new().extract(text);
        assert_eq!(fields.medications, vec!["Lisinopril", "Metformin", "Aspirin"]);
    }

    #[test]
    fn test_duplicate_medications_preserved() {
        let text = "Medication: Aspirin. Medication: Aspirin.";
        let fields = FieldExtractor::new().extract(text);
        assert_eq!(fields.medications, vec!["Aspirin", "Aspirin"]);
    }

    #[test]
    fn test_nothing_recognized() {
        let fields = FieldExtractor::new().extract("Routine visit, patient feels fine.");
        assert!(fields.is_empty());
    }

    #[test]
    fn test_merge_overwrites_vitals_and_accumulates_medications() {
        let extractor = FieldExtractor::new();
        let mut record = MedicalRecord::new();
        let now = Utc::now();

        extractor
            .extract("Blood Pressure: 120/80 Medication: Aspirin")
            .merge_into(&mut record, now);
        extractor
            .extract("Blood Pressure: 135/88 Medication: Metformin")
            .merge_into(&mut record, now);

        let bp = record.vital(crate::entities::VitalKind::BloodPressure).unwrap();
        assert_eq!(bp.value, VitalValue::BloodPressure { systolic: 135, diastolic: 88 });
        assert!(!bp.is_synthesized());
        assert_eq!(record.medications, vec!["Aspirin", "Metformin"]);
    }
}
