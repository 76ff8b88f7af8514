use std::collections::BTreeMap;

use serde::Serialize;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::classification::ClassificationEntry;
use super::record::{Provenance, VitalKind};
use super::session::{FileListing, Notice};

/// One vital card at the top of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct VitalCard {
    pub kind: VitalKind,
    pub title: String,
    /// Formatted value, e.g. "128/82" or "23.4"
    pub display: String,
    pub unit: String,
    pub provenance: Provenance,
}

/// A line of the health summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct SummaryItem {
    pub title: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity_class: Option<String>,
}

/// A recent test result line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct TestResultItem {
    pub name: String,
    pub result: String,
    /// MM/DD/YYYY
    pub date: String,
}

/// A risk assessment line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct RiskItem {
    pub condition: String,
    pub label: String,
    pub risk_class: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MedicationItem {
    pub name: String,
    pub instructions: String,
    /// True when the entry is sample content rather than extracted
    pub placeholder: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct InsightItem {
    pub title: String,
    pub body: String,
    pub placeholder: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Recommendations {
    pub lifestyle: Vec<String>,
    pub preventive_care: Vec<String>,
    pub health_goals: Vec<String>,
    pub placeholder: bool,
}

/// Chart type understood by the charting engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    pub background_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(rename = "yAxisID", skip_serializing_if = "Option::is_none")]
    pub y_axis_id: Option<String>,
}

/// Axis configuration; unset fields are left to the charting engine
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChartAxis {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub axis_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_at_zero: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_on_chart_area: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub legend_position: String,
    pub scales: BTreeMap<String, ChartAxis>,
}

/// A chart specification ready for the charting engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ChartSpec {
    /// Target element id, e.g. "bp-chart"
    pub id: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
    pub options: ChartOptions,
}

/// Everything the dashboard shows for one session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct DashboardView {
    pub vitals: Vec<VitalCard>,
    pub summary: Vec<SummaryItem>,
    pub classification: Vec<ClassificationEntry>,
    pub recent_tests: Vec<TestResultItem>,
    pub risks: Vec<RiskItem>,
    pub medications: Vec<MedicationItem>,
    pub insights: Vec<InsightItem>,
    pub recommendations: Recommendations,
    pub charts: Vec<ChartSpec>,
    pub files: Vec<FileListing>,
    pub notices: Vec<Notice>,
}

impl DashboardView {
    /// Look up a chart by element id
    pub fn chart(&self, id: &str) -> Option<&ChartSpec> {
        self.charts.iter().find(|chart| chart.id == id)
    }

    /// Look up a vital card by kind
    pub fn vital(&self, kind: VitalKind) -> Option<&VitalCard> {
        self.vitals.iter().find(|card| card.kind == kind)
    }
}
