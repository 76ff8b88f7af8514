use rand::Rng;
use tracing::debug;

use crate::entities::record::{MedicalRecord, VitalKind, VitalReading, VitalValue};
use crate::entities::trend::{BloodPressureSample, LabSample, TrendSeries, TrendSet, WeightSample};

/// Fill every missing vital with a random plausible value, then regenerate
/// all trend series. Vitals already present are left untouched.
pub fn synthesize<R: Rng>(record: &mut MedicalRecord, rng: &mut R) {
    for kind in record.missing_vitals() {
        let value = placeholder_vital(kind, rng);
        debug!(vital = %kind, "Synthesizing placeholder value");
        record.set_vital(VitalReading::synthesized(value));
    }

    record.trends = Some(generate_trends(rng));
}

/// A random placeholder value for one vital kind
pub fn placeholder_vital<R: Rng>(kind: VitalKind, rng: &mut R) -> VitalValue {
    match kind {
        VitalKind::BloodPressure => VitalValue::BloodPressure {
            systolic: rng.gen_range(120..=139),
            diastolic: rng.gen_range(70..=84),
        },
        VitalKind::Cholesterol => VitalValue::Cholesterol {
            total: rng.gen_range(180..=219),
        },
        VitalKind::Glucose => VitalValue::Glucose {
            value: rng.gen_range(85..=114),
        },
        VitalKind::Bmi => VitalValue::Bmi {
            value: rng.gen_range(22.0..28.0),
        },
    }
}

/// Three fresh six-month trend series
pub fn generate_trends<R: Rng>(rng: &mut R) -> TrendSet {
    TrendSet {
        blood_pressure: TrendSeries::from_months(|month| BloodPressureSample {
            month: month.to_string(),
            systolic: rng.gen_range(115..=134),
            diastolic: rng.gen_range(70..=84),
        }),
        weight: TrendSeries::from_months(|month| WeightSample {
            month: month.to_string(),
            weight: rng.gen_range(150..=159),
            bmi: rng.gen_range(22.0..26.0),
        }),
        labs: TrendSeries::from_months(|month| LabSample {
            month: month.to_string(),
            cholesterol: rng.gen_range(180..=219),
            glucose: rng.gen_range(85..=114),
        }),
    }
}
