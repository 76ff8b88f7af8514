use validator::Validate;

use super::extractor::ExtractedFields;

/// Physiological bounds for extracted values.
///
/// Values outside these bounds are kept but reported as warnings.
#[derive(Debug, Clone, Default, Validate)]
pub struct ExtractedVitalsCheck {
    #[validate(range(min = 40, max = 300, message = "Systolic must be between 40 and 300"))]
    pub systolic: Option<u32>,

    #[validate(range(min = 20, max = 200, message = "Diastolic must be between 20 and 200"))]
    pub diastolic: Option<u32>,

    #[validate(range(min = 50, max = 1000, message = "Cholesterol must be between 50 and 1000"))]
    pub cholesterol: Option<u32>,

    #[validate(range(min = 10, max = 1000, message = "Glucose must be between 10 and 1000"))]
    pub glucose: Option<u32>,

    #[validate(range(min = 5.0, max = 100.0, message = "BMI must be between 5 and 100"))]
    pub bmi: Option<f64>,
}

impl From<&ExtractedFields> for ExtractedVitalsCheck {
    fn from(fields: &ExtractedFields) -> Self {
        Self {
            systolic: fields.blood_pressure.map(|(systolic, _)| systolic),
            diastolic: fields.blood_pressure.map(|(_, diastolic)| diastolic),
            cholesterol: fields.cholesterol,
            glucose: fields.glucose,
            bmi: fields.bmi,
        }
    }
}

/// Range warnings for a document's extracted values, sorted by field name
pub fn range_warnings(fields: &ExtractedFields) -> Vec<String> {
    let Err(errors) = ExtractedVitalsCheck::from(fields).validate() else {
        return Vec::new();
    };

    let mut warnings: Vec<(String, String)> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |err| {
                let message = match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                };
                (field.to_string(), message)
            })
        })
        .collect();
    warnings.sort();
    warnings.into_iter().map(|(_, message)| message).collect()
}
