use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::entities::classification::{HealthClassification, RiskLevel};
use crate::entities::dashboard::{
    ChartAxis, ChartDataset, ChartKind, ChartOptions, ChartSpec, DashboardView, InsightItem,
    MedicationItem, Recommendations, RiskItem, SummaryItem, TestResultItem, VitalCard,
};
use crate::entities::record::{MedicalRecord, VitalKind, VitalsSnapshot};
use crate::entities::session::{FileListing, Notice};
use crate::entities::trend::TrendSet;
use crate::services::classifier::classify;

const PLACEHOLDER_MEDICATIONS: [(&str, &str); 2] = [
    ("Lisinopril 10mg", "Once daily for blood pressure"),
    ("Metformin 500mg", "Twice daily with meals"),
];

const INSIGHTS: [(&str, &str); 3] = [
    (
        "Pattern Recognition",
        "Your blood pressure shows an upward trend over the past 3 months. Consider lifestyle modifications.",
    ),
    (
        "Medication Adherence",
        "Based on refill patterns, your medication adherence rate is approximately 85%. Consistent daily intake is recommended.",
    ),
    (
        "Risk Factors",
        "Primary risk factors identified: Elevated blood pressure and borderline cholesterol levels.",
    ),
];

const LIFESTYLE: [&str; 4] = [
    "Reduce sodium intake to less than 2,300mg per day",
    "Engage in 150 minutes of moderate aerobic activity weekly",
    "Maintain a healthy sleep schedule (7-9 hours)",
    "Consider the DASH diet for blood pressure management",
];

const PREVENTIVE_CARE: [&str; 4] = [
    "Annual flu vaccination - Due in October",
    "Blood pressure check - Schedule for next month",
    "Cholesterol screening - Due in 6 months",
    "Diabetes screening - Recommended annually",
];

const HEALTH_GOALS: [&str; 4] = [
    "Reduce blood pressure to below 120/80 mmHg",
    "Lower cholesterol to below 200 mg/dL",
    "Maintain BMI between 18.5-24.9",
    "Achieve 10,000 steps daily",
];

/// Date format used across the dashboard
pub fn format_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

/// Build the dashboard for a record.
///
/// Returns `None` while any vital is missing. `today` dates the summary and
/// the recent tests.
pub fn build_dashboard(
    record: &MedicalRecord,
    files: &[FileListing],
    notices: &[Notice],
    today: NaiveDate,
) -> Option<DashboardView> {
    let snapshot = record.snapshot()?;
    let classification = classify(&snapshot);
    let date = format_date(today);

    Some(DashboardView {
        vitals: vital_cards(record, &snapshot),
        summary: summary(&snapshot, &classification, &date),
        classification: classification.entries(),
        recent_tests: recent_tests(&snapshot, &date),
        risks: risks(&classification),
        medications: medications(&record.medications),
        insights: INSIGHTS
            .iter()
            .map(|(title, body)| InsightItem {
                title: title.to_string(),
                body: body.to_string(),
                placeholder: true,
            })
            .collect(),
        recommendations: Recommendations {
            lifestyle: to_strings(&LIFESTYLE),
            preventive_care: to_strings(&PREVENTIVE_CARE),
            health_goals: to_strings(&HEALTH_GOALS),
            placeholder: true,
        },
        charts: record.trends.as_ref().map(charts).unwrap_or_default(),
        files: files.to_vec(),
        notices: notices.to_vec(),
    })
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn vital_cards(record: &MedicalRecord, snapshot: &VitalsSnapshot) -> Vec<VitalCard> {
    VitalKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let reading = record.vital(kind)?;
            let (title, display, unit) = match kind {
                VitalKind::BloodPressure => (
                    "Blood Pressure",
                    format!("{}/{}", snapshot.systolic, snapshot.diastolic),
                    "mmHg",
                ),
                VitalKind::Cholesterol => (
                    "Cholesterol",
                    snapshot.cholesterol_total.to_string(),
                    "mg/dL",
                ),
                VitalKind::Glucose => ("Glucose", snapshot.glucose.to_string(), "mg/dL"),
                VitalKind::Bmi => ("BMI", format!("{:.1}", snapshot.bmi), "kg/m²"),
            };
            Some(VitalCard {
                kind,
                title: title.to_string(),
                display,
                unit: unit.to_string(),
                provenance: reading.provenance,
            })
        })
        .collect()
}

fn summary(
    snapshot: &VitalsSnapshot,
    classification: &HealthClassification,
    date: &str,
) -> Vec<SummaryItem> {
    vec![
        SummaryItem {
            title: "Blood Pressure".to_string(),
            text: format!(
                "{} ({}/{} mmHg)",
                classification.blood_pressure.label(),
                snapshot.systolic,
                snapshot.diastolic
            ),
            severity_class: Some(classification.blood_pressure.severity().css_class().to_string()),
        },
        SummaryItem {
            title: "BMI".to_string(),
            text: format!("{} ({:.1})", classification.bmi.label(), snapshot.bmi),
            severity_class: Some(classification.bmi.severity().css_class().to_string()),
        },
        SummaryItem {
            title: "Last Check-up".to_string(),
            text: date.to_string(),
            severity_class: None,
        },
    ]
}

fn recent_tests(snapshot: &VitalsSnapshot, date: &str) -> Vec<TestResultItem> {
    [
        ("Complete Blood Count", "Normal".to_string()),
        ("Lipid Panel", format!("Cholesterol {} mg/dL", snapshot.cholesterol_total)),
        ("Fasting Glucose", format!("{} mg/dL", snapshot.glucose)),
    ]
    .into_iter()
    .map(|(name, result)| TestResultItem {
        name: name.to_string(),
        result,
        date: date.to_string(),
    })
    .collect()
}

fn risks(classification: &HealthClassification) -> Vec<RiskItem> {
    let risk = &classification.risk;
    [
        ("Cardiovascular Disease", risk.cardiovascular),
        ("Diabetes", risk.diabetes),
        ("Stroke", risk.stroke),
    ]
    .into_iter()
    .map(|(condition, level): (&str, RiskLevel)| RiskItem {
        condition: condition.to_string(),
        label: format!("{} Risk", level.label()),
        risk_class: level.css_class().to_string(),
    })
    .collect()
}

fn medications(names: &[String]) -> Vec<MedicationItem> {
    if names.is_empty() {
        return PLACEHOLDER_MEDICATIONS
            .iter()
            .map(|(name, instructions)| MedicationItem {
                name: name.to_string(),
                instructions: instructions.to_string(),
                placeholder: true,
            })
            .collect();
    }

    names
        .iter()
        .map(|name| MedicationItem {
            name: name.clone(),
            instructions: "Take as prescribed".to_string(),
            placeholder: false,
        })
        .collect()
}

fn base_options(scales: BTreeMap<String, ChartAxis>) -> ChartOptions {
    ChartOptions {
        responsive: true,
        maintain_aspect_ratio: false,
        legend_position: "bottom".to_string(),
        scales,
    }
}

fn line_dataset(
    label: &str,
    data: Vec<f64>,
    color: &str,
    fill: &str,
    axis: Option<&str>,
) -> ChartDataset {
    ChartDataset {
        label: label.to_string(),
        data,
        border_color: Some(color.to_string()),
        background_color: fill.to_string(),
        tension: Some(0.4),
        y_axis_id: axis.map(str::to_string),
    }
}

fn bar_dataset(label: &str, data: Vec<f64>, color: &str) -> ChartDataset {
    ChartDataset {
        label: label.to_string(),
        data,
        border_color: None,
        background_color: color.to_string(),
        tension: None,
        y_axis_id: None,
    }
}

fn month_labels<S>(samples: &[S], month: impl Fn(&S) -> &str) -> Vec<String> {
    samples.iter().map(|s| month(s).to_string()).collect()
}

/// Chart specifications for the three trend series
pub fn charts(trends: &TrendSet) -> Vec<ChartSpec> {
    let bp = &trends.blood_pressure;
    let weight = &trends.weight;
    let labs = &trends.labs;

    let bp_chart = ChartSpec {
        id: "bp-chart".to_string(),
        kind: ChartKind::Line,
        labels: month_labels(bp.samples(), |s| s.month.as_str()),
        datasets: vec![
            line_dataset(
                "Systolic",
                bp.values(|s| s.systolic as f64),
                "#ef4444",
                "rgba(239, 68, 68, 0.1)",
                None,
            ),
            line_dataset(
                "Diastolic",
                bp.values(|s| s.diastolic as f64),
                "#3b82f6",
                "rgba(59, 130, 246, 0.1)",
                None,
            ),
        ],
        options: base_options(BTreeMap::from([(
            "y".to_string(),
            ChartAxis {
                begin_at_zero: Some(false),
                min: Some(60.0),
                max: Some(160.0),
                ..Default::default()
            },
        )])),
    };

    let weight_chart = ChartSpec {
        id: "weight-chart".to_string(),
        kind: ChartKind::Line,
        labels: month_labels(weight.samples(), |s| s.month.as_str()),
        datasets: vec![
            line_dataset(
                "Weight (lbs)",
                weight.values(|s| s.weight as f64),
                "#10b981",
                "rgba(16, 185, 129, 0.1)",
                Some("y"),
            ),
            line_dataset(
                "BMI",
                weight.values(|s| s.bmi),
                "#f59e0b",
                "rgba(245, 158, 11, 0.1)",
                Some("y1"),
            ),
        ],
        options: base_options(BTreeMap::from([
            (
                "y".to_string(),
                ChartAxis {
                    axis_type: Some("linear".to_string()),
                    display: Some(true),
                    position: Some("left".to_string()),
                    min: Some(140.0),
                    max: Some(170.0),
                    ..Default::default()
                },
            ),
            (
                "y1".to_string(),
                ChartAxis {
                    axis_type: Some("linear".to_string()),
                    display: Some(true),
                    position: Some("right".to_string()),
                    min: Some(20.0),
                    max: Some(30.0),
                    draw_on_chart_area: Some(false),
                    ..Default::default()
                },
            ),
        ])),
    };

    let labs_chart = ChartSpec {
        id: "labs-chart".to_string(),
        kind: ChartKind::Bar,
        labels: month_labels(labs.samples(), |s| s.month.as_str()),
        datasets: vec![
            bar_dataset("Cholesterol", labs.values(|s| s.cholesterol as f64), "#8b5cf6"),
            bar_dataset("Glucose", labs.values(|s| s.glucose as f64), "#06b6d4"),
        ],
        options: base_options(BTreeMap::from([(
            "y".to_string(),
            ChartAxis {
                begin_at_zero: Some(true),
                ..Default::default()
            },
        )])),
    };

    vec![bp_chart, weight_chart, labs_chart]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::record::{Provenance, VitalReading, VitalValue};
    use crate::entities::session::UploadedFile;
    use crate::services::synthesizer::synthesize;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    fn record_with(
        systolic: u32,
        diastolic: u32,
        cholesterol: u32,
        glucose: u32,
        bmi: f64,
    ) -> MedicalRecord {
        let mut record = MedicalRecord::new();
        let now = Utc::now();
        let pressure = VitalValue::BloodPressure { systolic, diastolic };
        record.set_vital(VitalReading::extracted(pressure, now));
        let cholesterol = VitalValue::Cholesterol { total: cholesterol };
        record.set_vital(VitalReading::extracted(cholesterol, now));
        record.set_vital(VitalReading::synthesized(VitalValue::Glucose { value: glucose }));
        record.set_vital(VitalReading::synthesized(VitalValue::Bmi { value: bmi }));
        synthesize(&mut record, &mut StdRng::seed_from_u64(1));
        record
    }

    #[test]
    fn test_incomplete_record_has_no_dashboard() {
        assert!(build_dashboard(&MedicalRecord::new(), &[], &[], today()).is_none());
    }

    #[test]
    fn test_vital_cards_and_summary() {
        let record = record_with(135, 85, 190, 98, 26.44);
        let view = build_dashboard(&record, &[], &[], today()).unwrap();

        let bp = view.vital(VitalKind::BloodPressure).unwrap();
        assert_eq!(bp.display, "135/85");
        assert_eq!(bp.provenance, Provenance::Extracted);
        assert_eq!(view.vital(VitalKind::Bmi).unwrap().display, "26.4");
        assert_eq!(view.vital(VitalKind::Glucose).unwrap().provenance, Provenance::Synthesized);

        assert_eq!(view.summary[0].text, "Elevated (135/85 mmHg)");
        assert_eq!(view.summary[0].severity_class.as_deref(), Some("health-warning"));
        assert_eq!(view.summary[1].text, "Overweight (26.4)");
        assert_eq!(view.summary[2].text, "03/07/2024");
    }

    #[test]
    fn test_recent_tests_and_risks() {
        let record = record_with(120, 75, 205, 101, 23.0);
        let view = build_dashboard(&record, &[], &[], today()).unwrap();

        let results: Vec<&str> = view.recent_tests.iter().map(|t| t.result.as_str()).collect();
        assert_eq!(results, vec!["Normal", "Cholesterol 205 mg/dL", "101 mg/dL"]);
        assert!(view.recent_tests.iter().all(|t| t.date == "03/07/2024"));

        let risks: Vec<(&str, &str, &str)> = view
            .risks
            .iter()
            .map(|r| (r.condition.as_str(), r.label.as_str(), r.risk_class.as_str()))
            .collect();
        assert_eq!(
            risks,
            vec![
                ("Cardiovascular Disease", "Medium Risk", "risk-medium"),
                ("Diabetes", "Low Risk", "risk-low"),
                ("Stroke", "Medium Risk", "risk-medium"),
            ]
        );
    }

    #[test]
    fn test_placeholder_medications_when_none_extracted() {
        let record = record_with(120, 75, 190, 90, 23.0);
        let view = build_dashboard(&record, &[], &[], today()).unwrap();
        assert_eq!(view.medications.len(), 2);
        assert!(view.medications.iter().all(|m| m.placeholder));
        assert_eq!(view.medications[0].name, "Lisinopril 10mg");
        assert_eq!(view.medications[1].instructions, "Twice daily with meals");
    }

    #[test]
    fn test_extracted_medications() {
        let mut record = record_with(120, 75, 190, 90, 23.0);
        record.medications = vec!["Aspirin".to_string(), "Metformin".to_string()];

        let view = build_dashboard(&record, &[], &[], today()).unwrap();
        assert_eq!(view.medications.len(), 2);
        assert!(view.medications.iter().all(|m| !m.placeholder));
        assert_eq!(view.medications[0].name, "Aspirin");
        assert_eq!(view.medications[0].instructions, "Take as prescribed");
    }

    #[test]
    fn test_static_content_is_flagged() {
        let record = record_with(120, 75, 190, 90, 23.0);
        let view = build_dashboard(&record, &[], &[], today()).unwrap();
        assert_eq!(view.insights.len(), 3);
        assert!(view.insights.iter().all(|i| i.placeholder));
        assert!(view.recommendations.placeholder);
        assert_eq!(view.recommendations.lifestyle.len(), 4);
    }

    #[test]
    fn test_chart_specs() {
        let record = record_with(120, 75, 190, 90, 23.0);
        let view = build_dashboard(&record, &[], &[], today()).unwrap();
        assert_eq!(view.charts.len(), 3);

        let bp = view.chart("bp-chart").unwrap();
        assert_eq!(bp.kind, ChartKind::Line);
        assert_eq!(bp.labels, vec!["Jan", "Feb", "Mar", "Apr", "May", "Jun"]);
        assert_eq!(bp.datasets[0].border_color.as_deref(), Some("#ef4444"));
        assert_eq!(bp.datasets[1].border_color.as_deref(), Some("#3b82f6"));
        assert_eq!(bp.datasets[0].tension, Some(0.4));
        assert_eq!(bp.options.scales["y"].min, Some(60.0));
        assert_eq!(bp.options.scales["y"].max, Some(160.0));

        let weight = view.chart("weight-chart").unwrap();
        assert_eq!(weight.datasets[1].y_axis_id.as_deref(), Some("y1"));
        assert_eq!(weight.options.scales["y1"].draw_on_chart_area, Some(false));
        assert_eq!(weight.options.scales["y1"].position.as_deref(), Some("right"));

        let labs = view.chart("labs-chart").unwrap();
        assert_eq!(labs.kind, ChartKind::Bar);
        assert_eq!(labs.datasets[0].background_color, "#8b5cf6");
        assert_eq!(labs.datasets[1].background_color, "#06b6d4");
        assert_eq!(labs.options.scales["y"].begin_at_zero, Some(true));

        for chart in &view.charts {
            assert!(chart.options.responsive);
            assert!(!chart.options.maintain_aspect_ratio);
            assert_eq!(chart.options.legend_position, "bottom");
            assert!(chart.datasets.iter().all(|d| d.data.len() == 6));
        }
    }

    #[test]
    fn test_chart_json_uses_charting_keys() {
        let record = record_with(120, 75, 190, 90, 23.0);
        let view = build_dashboard(&record, &[], &[], today()).unwrap();
        let json = serde_json::to_value(view.chart("weight-chart").unwrap()).unwrap();

        assert_eq!(json["kind"], "line");
        assert_eq!(json["datasets"][0]["borderColor"], "#10b981");
        assert_eq!(json["datasets"][0]["yAxisID"], "y");
        assert_eq!(json["options"]["maintainAspectRatio"], false);
        assert_eq!(json["options"]["scales"]["y1"]["drawOnChartArea"], false);
    }

    #[test]
    fn test_files_and_notices_are_carried() {
        let files = vec![FileListing::from(&UploadedFile::pdf("a.pdf", vec![0; 10]))];
        let notices = vec![Notice::extraction_failed("b.pdf", "Invalid PDF: bad header")];
        let record = record_with(120, 75, 190, 90, 23.0);
        let view = build_dashboard(&record, &files, &notices, today()).unwrap();

        assert_eq!(view.files, files);
        assert_eq!(view.notices, notices);
    }
}
