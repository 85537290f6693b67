//! Desired-vs-offered salary range evaluator (`method = "salary"`).

use serde_json::json;

use crate::errors::AppError;
use crate::schema::{CandidateProfile, EvaluationResult, JobDescription};

use super::{Evaluator, EvaluatorContext};

#[derive(Debug, Clone)]
pub struct SalaryConfig {
    pub tolerance_ratio: f64,
}

impl Default for SalaryConfig {
    fn default() -> Self {
        Self { tolerance_ratio: 0.10 }
    }
}

#[derive(Debug, Clone, Copy)]
struct Range {
    min: i64,
    max: i64,
}

pub struct Salary {
    config: SalaryConfig,
}

impl Salary {
    pub fn new(config: SalaryConfig) -> Self {
        Self { config }
    }
}

impl Default for Salary {
    fn default() -> Self {
        Self::new(SalaryConfig::default())
    }
}

impl Evaluator for Salary {
    fn method(&self) -> &'static str {
        "salary"
    }

    fn evaluate(
        &self,
        candidate: &CandidateProfile,
        job: &JobDescription,
        _context: &EvaluatorContext,
    ) -> Result<EvaluationResult, AppError> {
        let tolerance_ratio = job
            .overrides_for("salary")
            .and_then(|o| o.get("tolerance_ratio"))
            .and_then(serde_json::Value::as_f64)
            .unwrap_or(self.config.tolerance_ratio);

        let candidate_range = candidate_range(candidate);
        let job_range = job_range(job);

        let (candidate_range, job_range) = match (candidate_range, job_range) {
            (Some(c), Some(j)) => (c, j),
            _ => {
                let status = match (candidate_range, job_range) {
                    (None, None) => "insufficient_both",
                    (None, Some(_)) => "insufficient_candidate",
                    (Some(_), None) => "insufficient_job",
                    _ => unreachable!(),
                };
                return Ok(EvaluationResult::new("salary")
                    .with_score("salary_pass", 1.0)
                    .with_score("salary_overlap_span", 0.0)
                    .with_metadata("desired_range", json!(candidate_range.map(range_json)))
                    .with_metadata("job_range", json!(job_range.map(range_json)))
                    .with_metadata("tolerance_ratio", json!(tolerance_ratio))
                    .with_metadata("status", json!(status)));
            }
        };

        let expanded_min = job_range.min as f64 * (1.0 - tolerance_ratio);
        let expanded_max = job_range.max as f64 * (1.0 + tolerance_ratio);

        let overlaps = candidate_range.max as f64 >= expanded_min && candidate_range.min as f64 <= expanded_max;
        let overlap_span = if overlaps {
            let low = (candidate_range.min as f64).max(expanded_min);
            let high = (candidate_range.max as f64).min(expanded_max);
            (high - low).max(0.0)
        } else {
            0.0
        };

        let gap = if candidate_range.max < job_range.min {
            job_range.min - candidate_range.max
        } else if candidate_range.min > job_range.max {
            candidate_range.min - job_range.max
        } else {
            0
        };

        let status = if gap == 0 {
            "ok"
        } else if overlaps {
            "within_tolerance"
        } else if candidate_range.min > job_range.max {
            "above_required_max"
        } else if candidate_range.max < job_range.min {
            "below_required_min"
        } else {
            "out_of_range"
        };

        let salary_pass = if gap == 0 || overlaps { 1.0 } else { 0.0 };

        Ok(EvaluationResult::new("salary")
            .with_score("salary_pass", salary_pass)
            .with_score("salary_overlap_span", overlap_span)
            .with_metadata("desired_range", json!(range_json(candidate_range)))
            .with_metadata("job_range", json!(range_json(job_range)))
            .with_metadata("expanded_job_range", json!([expanded_min, expanded_max]))
            .with_metadata("overlap_span", json!(overlap_span))
            .with_metadata("tolerance_ratio", json!(tolerance_ratio))
            .with_metadata("gap_amount", json!(gap))
            .with_metadata("status", json!(status)))
    }
}

fn candidate_range(candidate: &CandidateProfile) -> Option<Range> {
    let (min, max) = (candidate.desired_salary_min_jpy, candidate.desired_salary_max_jpy);
    let (min, max) = match (min, max) {
        (None, None) => return None,
        (Some(m), None) => (m, m),
        (None, Some(m)) => (m, m),
        (Some(min), Some(max)) => (min, max),
    };
    if min > max {
        Some(Range { min: max, max: min })
    } else {
        Some(Range { min, max })
    }
}

fn job_range(job: &JobDescription) -> Option<Range> {
    let range = job.constraints.salary_range.as_ref()?;
    match (range.min_jpy, range.max_jpy) {
        (Some(min), Some(max)) => Some(Range { min, max }),
        _ => None,
    }
}

fn range_json(range: Range) -> serde_json::Value {
    json!({"min_jpy": range.min, "max_jpy": range.max})
}
