use serde::Serialize;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Month labels used by every trend series
pub const TREND_MONTHS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];

/// Number of samples in a trend series
pub const TREND_LENGTH: usize = TREND_MONTHS.len();

/// Monthly blood pressure sample
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct BloodPressureSample {
    pub month: String,
    pub systolic: u32,
    pub diastolic: u32,
}

/// Monthly weight sample
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct WeightSample {
    pub month: String,
    /// Weight in lbs
    pub weight: u32,
    pub bmi: f64,
}

/// Monthly lab sample
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct LabSample {
    pub month: String,
    pub cholesterol: u32,
    pub glucose: u32,
}

/// A series of exactly [`TREND_LENGTH`] monthly samples
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TrendSeries<S> {
    samples: Vec<S>,
}

impl<S> TrendSeries<S> {
    /// Build a series by producing one sample per month label
    pub fn from_months(mut sample: impl FnMut(&'static str) -> S) -> Self {
        Self {
            samples: TREND_MONTHS.into_iter().map(&mut sample).collect(),
        }
    }

    pub fn samples(&self) -> &[S] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Project each sample onto a chart value
    pub fn values(&self, f: impl Fn(&S) -> f64) -> Vec<f64> {
        self.samples.iter().map(f).collect()
    }
}

/// The three trend series shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSet {
    pub blood_pressure: TrendSeries<BloodPressureSample>,
    pub weight: TrendSeries<WeightSample>,
    pub labs: TrendSeries<LabSample>,
}
