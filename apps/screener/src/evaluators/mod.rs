//! Independent, stateless scoring components. Each evaluator consumes a
//! candidate plus a shared [`EvaluatorContext`] and returns an
//! [`EvaluationResult`]; the aggregator in [`crate::core`] merges their score
//! maps additively by key.

pub mod bm25;
pub mod embedding;
pub mod jd_matcher;
pub mod salary;
pub mod tenure;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::schema::{CandidateProfile, EvaluationResult, JobDescription};

/// Context shared by every evaluator invocation within one
/// `ScreeningCore::evaluate` call. Distinct from `job.evaluation_overrides`
/// in that it also carries run-wide knobs (like `as_of`) that aren't part of
/// the JD document itself.
#[derive(Debug, Clone)]
pub struct EvaluatorContext {
    /// Reference date for tenure duration math. Defaults to the wall-clock
    /// date at CLI startup; injectable for deterministic tests.
    pub as_of: NaiveDate,
    /// Ad-hoc keyword groups taking precedence over `job.evaluation_overrides
    /// .jd_keywords` and the `key_phrases`/`role_titles` fallback used by
    /// [`jd_matcher`].
    pub jd_keywords: Option<Map<String, Value>>,
}

impl EvaluatorContext {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            jd_keywords: None,
        }
    }

    pub fn with_jd_keywords(mut self, keywords: Map<String, Value>) -> Self {
        self.jd_keywords = Some(keywords);
        self
    }
}

/// Common contract every scoring component implements. Implementations must
/// be stateless and safe to share across candidates and threads.
pub trait Evaluator: Send + Sync {
    /// Stable contract name reported in `EvaluationResult::method`.
    fn method(&self) -> &'static str;

    fn evaluate(
        &self,
        candidate: &CandidateProfile,
        job: &JobDescription,
        context: &EvaluatorContext,
    ) -> Result<EvaluationResult, AppError>;
}
