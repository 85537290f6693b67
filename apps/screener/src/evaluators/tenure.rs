//! Employment tenure / job-hopper evaluator (`method = "tenure"`).

use chrono::{Datelike, NaiveDate};
use serde_json::json;

use crate::errors::AppError;
use crate::schema::{CandidateProfile, EvaluationResult, ExperienceEntry, JobDescription};

use super::{Evaluator, EvaluatorContext};

#[derive(Debug, Clone)]
pub struct TenureConfig {
    pub average_threshold_months: f64,
    pub recent_short_threshold_months: f64,
    pub contract_average_threshold_months: f64,
    pub recent_window: usize,
    pub contract_types: Vec<String>,
}

impl Default for TenureConfig {
    fn default() -> Self {
        Self {
            average_threshold_months: 18.0,
            recent_short_threshold_months: 12.0,
            contract_average_threshold_months: 12.0,
            recent_window: 3,
            contract_types: vec!["contract".to_string(), "freelance".to_string(), "業務委託".to_string()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tenure {
    config: TenureConfig,
}

impl Tenure {
    pub fn new(config: TenureConfig) -> Self {
        Self { config }
    }
}

impl Default for Tenure {
    fn default() -> Self {
        Self::new(TenureConfig::default())
    }
}

struct NormalizedExperience<'a> {
    experience: &'a ExperienceEntry,
    months: f64,
    end_date: NaiveDate,
    is_contract: bool,
}

impl Evaluator for Tenure {
    fn method(&self) -> &'static str {
        "tenure"
    }

    fn evaluate(
        &self,
        candidate: &CandidateProfile,
        _job: &JobDescription,
        context: &EvaluatorContext,
    ) -> Result<EvaluationResult, AppError> {
        let as_of = context.as_of;
        let mut normalized = self.compute_per_experience(&candidate.experiences, as_of);
        normalized.sort_by(|a, b| b.end_date.cmp(&a.end_date));

        let average_months = average_months(normalized.iter().map(|e| e.months));
        let recent_short_count = normalized
            .iter()
            .take(self.config.recent_window)
            .filter(|e| e.months < self.config.recent_short_threshold_months)
            .count();

        let is_job_hopper = !normalized.is_empty()
            && average_months < self.config.average_threshold_months
            && recent_short_count >= 2;

        let is_contract_profile = !normalized.is_empty() && normalized.iter().all(|e| e.is_contract);
        let contract_avg_months =
            average_months(normalized.iter().filter(|e| e.is_contract).map(|e| e.months));

        let passes_contract_rule =
            is_contract_profile && contract_avg_months >= self.config.contract_average_threshold_months;

        let passes = !is_job_hopper || passes_contract_rule;

        let per_experience_json: Vec<_> = normalized
            .iter()
            .map(|e| {
                json!({
                    "company": e.experience.company,
                    "title": e.experience.title,
                    "months": e.months,
                    "employment_type": e.experience.employment_type,
                    "is_contract": e.is_contract,
                })
            })
            .collect();

        Ok(EvaluationResult::new("tenure")
            .with_score("tenure_pass", if passes { 1.0 } else { 0.0 })
            .with_score("tenure_avg_months", average_months)
            .with_metadata("average_months", json!(average_months))
            .with_metadata("per_experience", json!(per_experience_json))
            .with_metadata("recent_short_tenures", json!(recent_short_count))
            .with_metadata("is_job_hopper", json!(is_job_hopper))
            .with_metadata("is_contract_profile", json!(is_contract_profile))
            .with_metadata("contract_average_months", json!(contract_avg_months))
            .with_metadata("passes_contract_rule", json!(passes_contract_rule)))
    }
}

impl Tenure {
    fn compute_per_experience<'a>(
        &self,
        experiences: &'a [ExperienceEntry],
        as_of: NaiveDate,
    ) -> Vec<NormalizedExperience<'a>> {
        experiences
            .iter()
            .filter_map(|exp| {
                let start = parse_date(exp.start.as_deref())?;
                let end = parse_date(exp.end.as_deref()).unwrap_or(as_of);
                if end < start {
                    return None;
                }
                let months = months_between(start, end) as f64;
                Some(NormalizedExperience {
                    experience: exp,
                    months,
                    end_date: end,
                    is_contract: self.is_contract(exp.employment_type.as_deref()),
                })
            })
            .collect()
    }

    fn is_contract(&self, employment_type: Option<&str>) -> bool {
        match employment_type {
            None => false,
            Some(value) => {
                let normalized = value.trim().to_lowercase();
                self.config.contract_types.iter().any(|t| t.to_lowercase() == normalized)
            }
        }
    }
}

/// Parses a `"YYYY-MM"` string (day fixed at 1). The literal `"現在"` and any
/// unparseable value return `None`, matching the candidate schema's "ongoing"
/// sentinel and the original evaluator's permissive parse-or-default rule.
fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    let value = value?;
    if value.len() != 7 || value.as_bytes().get(4) != Some(&b'-') {
        return None;
    }
    let year: i32 = value[0..4].parse().ok()?;
    let month: u32 = value[5..7].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32)
}

fn average_months(values: impl Iterator<Item = f64>) -> f64 {
    let durations: Vec<f64> = values.collect();
    if durations.is_empty() {
        return 0.0;
    }
    durations.iter().sum::<f64>() / durations.len() as f64
}
