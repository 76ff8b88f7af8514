use crate::entities::classification::{
    BloodPressureStatus, BmiStatus, HealthClassification, RiskAssessment, RiskLevel,
};
use crate::entities::record::VitalsSnapshot;

/// Categorize blood pressure based on measurements
pub fn categorize_blood_pressure(systolic: u32, diastolic: u32) -> BloodPressureStatus {
    if systolic <= 130 && diastolic <= 80 {
        BloodPressureStatus::Normal
    } else if systolic <= 140 && diastolic <= 90 {
        BloodPressureStatus::Elevated
    } else {
        BloodPressureStatus::High
    }
}

/// Categorize body mass index
pub fn categorize_bmi(bmi: f64) -> BmiStatus {
    if bmi > 30.0 {
        BmiStatus::Obese
    } else if bmi > 25.0 {
        BmiStatus::Overweight
    } else {
        BmiStatus::Normal
    }
}

/// Cardiovascular risk from systolic pressure and total cholesterol
pub fn cardiovascular_risk(systolic: u32, cholesterol_total: u32) -> RiskLevel {
    if systolic > 140 && cholesterol_total > 240 {
        RiskLevel::High
    } else if systolic > 130 || cholesterol_total > 200 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Risk per disease category; stroke follows cardiovascular risk
pub fn assess_risk(snapshot: &VitalsSnapshot) -> RiskAssessment {
    let cardiovascular = cardiovascular_risk(snapshot.systolic, snapshot.cholesterol_total);
    RiskAssessment {
        cardiovascular,
        stroke: cardiovascular,
        diabetes: RiskLevel::Low,
    }
}

/// Classify a complete set of vitals
pub fn classify(snapshot: &VitalsSnapshot) -> HealthClassification {
    HealthClassification {
        blood_pressure: categorize_blood_pressure(snapshot.systolic, snapshot.diastolic),
        bmi: categorize_bmi(snapshot.bmi),
        risk: assess_risk(snapshot),
    }
}
