//! Provider-neutral job-description schema.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A salary range in Japanese yen. Either bound may be absent (open-ended).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SalaryRange {
    pub min_jpy: Option<i64>,
    pub max_jpy: Option<i64>,
}

/// Hard requirements attached to a job description; consulted by the
/// aggregator's hard gates (see [`crate::core::evaluate_hard_gates`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct JobConstraints {
    pub language: Vec<String>,
    pub location: Vec<String>,
    pub visa: Option<String>,
    pub salary_range: Option<SalaryRange>,
}

/// A single job description. `evaluation_overrides` is a free-form document
/// consulted per evaluator to tune defaults on
/// a per-JD basis without touching evaluator code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDescription {
    pub job_id: String,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub role_titles: Vec<String>,
    #[serde(default)]
    pub requirements_text: Vec<String>,
    #[serde(default)]
    pub key_phrases: Vec<String>,
    #[serde(default)]
    pub constraints: JobConstraints,
    #[serde(default)]
    pub evaluation_overrides: Map<String, Value>,
}

impl JobDescription {
    /// A bare-bones JD — handy for evaluator unit tests.
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            locale: None,
            role_titles: Vec::new(),
            requirements_text: Vec::new(),
            key_phrases: Vec::new(),
            constraints: JobConstraints::default(),
            evaluation_overrides: Map::new(),
        }
    }

    /// Looks up `evaluation_overrides.<evaluator>` as a JSON object, if present.
    pub fn overrides_for(&self, evaluator: &str) -> Option<&Map<String, Value>> {
        self.evaluation_overrides.get(evaluator)?.as_object()
    }
}
