use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::services::field_resolver::FromJson;

pub const NOT_AVAILABLE: &str = "N/A";

/// A score that upstream reports either numerically or as a label ("Pass", "N/A").
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScoreValue {
    Numeric(f64),
    Label(String),
}

impl ScoreValue {
    pub fn not_available() -> Self {
        ScoreValue::Label(NOT_AVAILABLE.to_string())
    }
}

impl fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreValue::Numeric(n) => write!(f, "{}", n),
            ScoreValue::Label(label) => write!(f, "{}", label),
        }
    }
}

impl FromJson for ScoreValue {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).map(ScoreValue::Numeric),
            Value::String(_) => String::from_json(value).map(ScoreValue::Label),
            _ => None,
        }
    }
}

/// Feasibility result of the generated plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    /// `None` when upstream did not report feasibility at all.
    pub is_feasible: Option<bool>,
    pub score: ScoreValue,
    pub checks: Vec<Value>,
    pub warnings: Vec<String>,
}

impl Default for Verification {
    fn default() -> Self {
        Self {
            is_feasible: None,
            score: ScoreValue::not_available(),
            checks: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

/// AI quality review of the generated plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityVerification {
    pub passes_quality: Option<bool>,
    pub quality_score: ScoreValue,
    pub match_rate: String,
    pub overall_quality: String,
    pub issues: Vec<String>,
    pub route_efficiency_score: Option<f64>,
    pub diversity_score: Option<f64>,
}
