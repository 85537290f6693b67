//! Evaluator output and aggregator decision types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What a single evaluator returns. `method` is the evaluator's stable
/// contract name; `scores` keys are metric names merged additively by
/// [`crate::core::ScreeningCore`] across evaluators — the same key emitted by
/// two evaluators is intentional, not a collision to resolve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub method: String,
    pub scores: HashMap<String, f64>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl EvaluationResult {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            scores: HashMap::new(),
            metadata: Map::new(),
        }
    }

    pub fn with_score(mut self, key: impl Into<String>, value: f64) -> Self {
        self.scores.insert(key.into(), value);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Sum (by key) of every evaluator's `scores`, plus the weighted scalar
/// derived from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateScores {
    pub scores: HashMap<String, f64>,
    pub pre_llm_score: f64,
}

/// The three-way outcome of a screening run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Pass,
    Borderline,
    Reject,
}

/// The aggregator/gating layer's conclusion for one candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionSummary {
    pub decision: Decision,
    pub pre_llm_score: f64,
    pub hard_gate_flags: HashMap<String, bool>,
    pub hard_gate_details: Map<String, Value>,
    pub hard_failures: Vec<String>,
}

/// The full per-candidate result: every evaluator's raw output plus the
/// aggregator's conclusion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningOutcome {
    pub candidate_id: String,
    pub job_id: String,
    pub evaluations: Vec<EvaluationResult>,
    pub aggregate: AggregateScores,
    pub decision: DecisionSummary,
}
