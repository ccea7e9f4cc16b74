//! Patient profile types consumed by the recommendation engine.
//!
//! The intake wizard assembles a `PatientProfile` and hands it to the engine
//! on demand. Nothing here is cached or persisted by the engine itself.

use serde::{Deserialize, Deserializer, Serialize};

/// The subset of a patient record the rule evaluator reads.
///
/// Every field is optional on the wire. Lab values are accepted as JSON
/// numbers or numeric strings (intake form inputs arrive as text); anything
/// that does not parse to a finite, positive number is stored as `None` and
/// later replaced by the configured lab default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientProfile {
    /// Estimated glomerular filtration rate, mL/min.
    #[serde(deserialize_with = "lenient_lab")]
    pub egfr: Option<f64>,

    /// Glycated hemoglobin, percent.
    #[serde(deserialize_with = "lenient_lab")]
    pub hba1c: Option<f64>,

    #[serde(rename = "isPregnant", deserialize_with = "lenient_flag")]
    pub is_pregnant: bool,

    /// Explicit CKD diagnosis. The engine also derives CKD from `egfr < 60`.
    #[serde(rename = "hasCKD", deserialize_with = "lenient_flag")]
    pub has_ckd: bool,

    #[serde(rename = "hasCAD", deserialize_with = "lenient_flag")]
    pub has_cad: bool,
}

impl PatientProfile {
    /// Normalize a raw lab reading: non-finite and non-positive values are
    /// treated as missing.
    pub fn sanitize_lab(value: Option<f64>) -> Option<f64> {
        value.filter(|v| v.is_finite() && *v > 0.0)
    }
}

/// Lab value deserializer: number, numeric string, null, or garbage.
fn lenient_lab<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let parsed = match raw {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => {
            s.trim().trim_end_matches('%').trim().parse::<f64>().ok()
        }
        _ => None,
    };
    Ok(PatientProfile::sanitize_lab(parsed))
}

/// Condition flag deserializer: booleans, plus `"true"`/`"false"` strings
/// and 0/1 numbers. Anything else is `false`.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(match raw {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    })
}

/// Chronic kidney disease stage derived from eGFR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CkdStage {
    /// eGFR >= 90.
    Normal,
    /// 60 <= eGFR < 90.
    Mild,
    /// 30 <= eGFR < 60.
    Moderate,
    /// 15 <= eGFR < 30.
    Severe,
    /// eGFR < 15.
    Failure,
}

impl CkdStage {
    /// Numeric KDIGO stage, 1 through 5.
    pub fn number(self) -> u8 {
        match self {
            CkdStage::Normal => 1,
            CkdStage::Mild => 2,
            CkdStage::Moderate => 3,
            CkdStage::Severe => 4,
            CkdStage::Failure => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CkdStage::Normal => "Normal",
            CkdStage::Mild => "Mild",
            CkdStage::Moderate => "Moderate",
            CkdStage::Severe => "Severe",
            CkdStage::Failure => "Failure",
        }
    }
}

/// One row of the patient roster shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    /// Medical record number, e.g. "MR-2024-001". Used as the patient id in
    /// decision records.
    pub mr_number: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    /// ISO date of the last visit.
    pub last_visit: String,
    /// Most recent HbA1c, percent.
    pub hba1c: Option<f64>,
}
