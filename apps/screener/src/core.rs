//! Aggregator & gating layer: fans a candidate out across every registered
//! evaluator, merges their score maps additively, and decides `pass` /
//! `borderline` / `reject`.

use std::collections::HashMap;

use serde_json::json;

use crate::errors::AppError;
use crate::evaluators::{Evaluator, EvaluatorContext};
use crate::schema::{
    AggregateScores, CandidateProfile, Decision, DecisionSummary, EvaluationResult, JobDescription,
    ScreeningOutcome,
};

/// Per-metric weights applied to the merged score map to produce
/// `pre_llm_score`. Weights need not sum to 1; unknown metrics contribute 0.
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    pub bm25_prox: f64,
    pub embed_sim: f64,
    pub sim_title: f64,
    pub title_bonus: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            bm25_prox: 0.45,
            embed_sim: 0.40,
            sim_title: 0.10,
            title_bonus: 0.05,
        }
    }
}

impl ScoreWeights {
    fn as_map(&self) -> HashMap<&'static str, f64> {
        HashMap::from([
            ("bm25_prox", self.bm25_prox),
            ("embed_sim", self.embed_sim),
            ("sim_title", self.sim_title),
            ("title_bonus", self.title_bonus),
        ])
    }
}

/// Decision thresholds applied to `pre_llm_score` once all hard gates pass.
#[derive(Debug, Clone)]
pub struct Thresholds {
    pub pass: f64,
    pub borderline: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            pass: 0.80,
            borderline: 0.65,
        }
    }
}

/// Registers an ordered sequence of evaluators and drives them per candidate.
pub struct ScreeningCore {
    evaluators: Vec<Box<dyn Evaluator>>,
    weights: ScoreWeights,
    thresholds: Thresholds,
}

impl ScreeningCore {
    pub fn new(evaluators: Vec<Box<dyn Evaluator>>, weights: ScoreWeights, thresholds: Thresholds) -> Self {
        Self {
            evaluators,
            weights,
            thresholds,
        }
    }

    pub fn evaluate(
        &self,
        candidate: &CandidateProfile,
        job: &JobDescription,
        context: &EvaluatorContext,
    ) -> Result<ScreeningOutcome, AppError> {
        let mut evaluations = Vec::with_capacity(self.evaluators.len());
        let mut agg: HashMap<String, f64> = HashMap::new();

        for evaluator in &self.evaluators {
            let result = evaluator.evaluate(candidate, job, context)?;
            validate_contract(&result)?;
            for (key, value) in &result.scores {
                *agg.entry(key.clone()).or_insert(0.0) += value;
            }
            evaluations.push(result);
        }

        let pre_llm_score = self.weighted_score(&agg);
        let aggregate = AggregateScores {
            scores: agg,
            pre_llm_score,
        };

        let (hard_gate_flags, hard_gate_details) = evaluate_hard_gates(candidate, job);
        let hard_failures: Vec<String> = hard_gate_flags
            .iter()
            .filter(|(_, pass)| !**pass)
            .map(|(label, _)| label.clone())
            .collect();

        let decision = if !hard_failures.is_empty() {
            Decision::Reject
        } else if pre_llm_score >= self.thresholds.pass {
            Decision::Pass
        } else if pre_llm_score >= self.thresholds.borderline {
            Decision::Borderline
        } else {
            Decision::Reject
        };

        Ok(ScreeningOutcome {
            candidate_id: candidate.candidate_id.clone(),
            job_id: job.job_id.clone(),
            evaluations,
            aggregate,
            decision: DecisionSummary {
                decision,
                pre_llm_score,
                hard_gate_flags,
                hard_gate_details,
                hard_failures,
            },
        })
    }

    fn weighted_score(&self, agg: &HashMap<String, f64>) -> f64 {
        self.weights
            .as_map()
            .into_iter()
            .map(|(metric, weight)| agg.get(metric).copied().unwrap_or(0.0) * weight)
            .sum()
    }
}

fn validate_contract(result: &EvaluationResult) -> Result<(), AppError> {
    if result.method.is_empty() {
        return Err(AppError::EvaluatorContract {
            method: "<unknown>".to_string(),
            reason: "missing method".to_string(),
        });
    }
    Ok(())
}

/// Normalizes a free-form language label to an ISO-639-ish bucket
/// (`ja`/`en`/lowercase-trim) so candidate and JD spellings compare equal.
fn normalize_language(value: &str) -> String {
    let lower = value.trim().to_lowercase();
    match lower.as_str() {
        "日本語" | "にほんご" | "japanese" | "jp" | "ja" => "ja".to_string(),
        "英語" | "えいご" | "english" | "en" => "en".to_string(),
        other => other.to_string(),
    }
}

fn evaluate_hard_gates(
    candidate: &CandidateProfile,
    job: &JobDescription,
) -> (HashMap<String, bool>, serde_json::Map<String, serde_json::Value>) {
    let mut flags = HashMap::new();
    let mut details = serde_json::Map::new();

    let language_ok = if job.constraints.language.is_empty() {
        true
    } else {
        let required: std::collections::HashSet<String> =
            job.constraints.language.iter().map(|l| normalize_language(l)).collect();
        candidate
            .languages
            .iter()
            .map(|l| normalize_language(&l.language))
            .any(|l| required.contains(&l))
    };
    flags.insert("language".to_string(), language_ok);
    details.insert("language_ok".to_string(), json!(language_ok));

    let location_ok = if job.constraints.location.is_empty() {
        true
    } else {
        let required: std::collections::HashSet<String> = job
            .constraints
            .location
            .iter()
            .map(|l| l.trim().to_lowercase())
            .collect();
        candidate
            .location
            .as_deref()
            .map(|l| required.contains(&l.trim().to_lowercase()))
            .unwrap_or(false)
    };
    flags.insert("location".to_string(), location_ok);
    details.insert("location_ok".to_string(), json!(location_ok));

    let visa_ok = match &job.constraints.visa {
        None => true,
        Some(required) => {
            let required = required.trim().to_lowercase();
            let candidate_visa = candidate
                .constraints
                .as_ref()
                .and_then(|c| c.visa.as_deref())
                .map(|v| v.trim().to_lowercase());
            match candidate_visa {
                Some(v) if ["ok", "valid", "yes"].contains(&v.as_str()) => true,
                Some(v) => v == required,
                None => false,
            }
        }
    };
    flags.insert("visa".to_string(), visa_ok);
    details.insert("visa_ok".to_string(), json!(visa_ok));

    let salary_ok = match &job.constraints.salary_range {
        None => true,
        Some(range) => {
            let candidate_min = candidate.desired_salary_min_jpy;
            let candidate_max = candidate.desired_salary_max_jpy;
            match (candidate_min, candidate_max) {
                (None, None) => true,
                (cmin_raw, cmax_raw) => {
                    let cmin = cmin_raw.or(cmax_raw).unwrap_or(i64::MIN);
                    let cmax = cmax_raw.or(cmin_raw).unwrap_or(i64::MAX);
                    let job_min = range.min_jpy.unwrap_or(i64::MIN);
                    let job_max = range.max_jpy.unwrap_or(i64::MAX);
                    !(cmax < job_min || cmin > job_max)
                }
            }
        }
    };
    flags.insert("salary".to_string(), salary_ok);
    details.insert("salary_ok".to_string(), json!(salary_ok));

    (flags, details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluators::bm25::BM25Proximity;
    use crate::evaluators::embedding::EmbeddingSimilarity;
    use crate::evaluators::jd_matcher::JDKeywordMatcher;
    use crate::evaluators::salary::Salary;
    use crate::evaluators::tenure::Tenure;
    use crate::schema::{CandidateConstraints, ExperienceEntry, JobConstraints, LanguageProficiency, SalaryRange};
    use chrono::NaiveDate;

    fn ctx() -> EvaluatorContext {
        EvaluatorContext::new(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
    }

    fn full_core() -> ScreeningCore {
        let evaluators: Vec<Box<dyn Evaluator>> = vec![
            Box::new(BM25Proximity::default()),
            Box::new(EmbeddingSimilarity::default()),
            Box::new(JDKeywordMatcher::default()),
            Box::new(Tenure::default()),
            Box::new(Salary::default()),
        ];
        ScreeningCore::new(evaluators, ScoreWeights::default(), Thresholds::default())
    }

    fn sre_candidate() -> CandidateProfile {
        let mut candidate = CandidateProfile::new("bizreach", "c-1");
        candidate.experiences.push(ExperienceEntry {
            company: "Acme".to_string(),
            title: "Site Reliability Engineer".to_string(),
            start: Some("2018-01".to_string()),
            end: None,
            employment_type: None,
            summary: "Operated Terraform and AWS infrastructure".to_string(),
            bullets: vec!["Built Prometheus alerting for AWS".to_string()],
        });
        candidate.skills = vec!["Terraform".to_string(), "AWS".to_string(), "Prometheus".to_string()];
        candidate.languages = vec![LanguageProficiency {
            language: "日本語".to_string(),
            level: None,
        }];
        candidate.location = Some("Tokyo".to_string());
        candidate.desired_salary_min_jpy = Some(7_000_000);
        candidate.desired_salary_max_jpy = Some(9_000_000);
        candidate.constraints = Some(CandidateConstraints {
            visa: Some("ok".to_string()),
            ..Default::default()
        });
        candidate
    }

    fn sre_job() -> JobDescription {
        let mut job = JobDescription::new("jd-1");
        job.role_titles = vec!["Site Reliability Engineer".to_string()];
        job.requirements_text = vec!["Terraform AWS infrastructure".to_string(), "Prometheus monitoring".to_string()];
        job.key_phrases = vec!["Terraform".to_string(), "AWS".to_string(), "Prometheus".to_string()];
        job.constraints = JobConstraints {
            language: vec!["ja".to_string()],
            location: vec!["tokyo".to_string()],
            visa: None,
            salary_range: Some(SalaryRange { min_jpy: Some(6_000_000), max_jpy: Some(9_500_000) }),
        };
        job
    }

    #[test]
    fn test_positive_sre_match_passes_all_gates() {
        let core = full_core();
        let outcome = core.evaluate(&sre_candidate(), &sre_job(), &ctx()).unwrap();
        assert!(outcome.decision.hard_failures.is_empty());
        assert!(outcome.aggregate.scores["bm25_prox"] > 0.0);
    }

    #[test]
    fn test_language_gate_miss_forces_reject_regardless_of_score() {
        let mut candidate = sre_candidate();
        candidate.languages = vec![LanguageProficiency { language: "英語".to_string(), level: None }];
        let core = full_core();
        let outcome = core.evaluate(&candidate, &sre_job(), &ctx()).unwrap();
        assert_eq!(outcome.decision.decision, Decision::Reject);
        assert!(outcome.decision.hard_failures.contains(&"language".to_string()));
    }

    #[test]
    fn test_salary_out_of_band_forces_reject() {
        let mut candidate = sre_candidate();
        candidate.desired_salary_min_jpy = Some(15_000_000);
        candidate.desired_salary_max_jpy = Some(16_000_000);
        let core = full_core();
        let outcome = core.evaluate(&candidate, &sre_job(), &ctx()).unwrap();
        assert_eq!(outcome.decision.decision, Decision::Reject);
        assert!(outcome.decision.hard_failures.contains(&"salary".to_string()));
    }

    #[test]
    fn test_hard_gate_label_set_is_exactly_four() {
        let core = full_core();
        let outcome = core.evaluate(&sre_candidate(), &sre_job(), &ctx()).unwrap();
        let mut labels: Vec<&String> = outcome.decision.hard_gate_flags.keys().collect();
        labels.sort();
        assert_eq!(labels, vec!["language", "location", "salary", "visa"]);
    }

    #[test]
    fn test_pre_llm_score_independent_of_evaluator_order() {
        let forward: Vec<Box<dyn Evaluator>> = vec![
            Box::new(BM25Proximity::default()),
            Box::new(EmbeddingSimilarity::default()),
        ];
        let reversed: Vec<Box<dyn Evaluator>> = vec![
            Box::new(EmbeddingSimilarity::default()),
            Box::new(BM25Proximity::default()),
        ];
        let core_forward = ScreeningCore::new(forward, ScoreWeights::default(), Thresholds::default());
        let core_reversed = ScreeningCore::new(reversed, ScoreWeights::default(), Thresholds::default());
        let a = core_forward.evaluate(&sre_candidate(), &sre_job(), &ctx()).unwrap();
        let b = core_reversed.evaluate(&sre_candidate(), &sre_job(), &ctx()).unwrap();
        assert!((a.aggregate.pre_llm_score - b.aggregate.pre_llm_score).abs() < 1e-12);
    }
}
