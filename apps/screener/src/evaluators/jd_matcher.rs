//! Rule-based JD keyword coverage evaluator (`method = "jd_rule"`).

use serde_json::{json, Value};

use crate::errors::AppError;
use crate::fuzzy::fuzzy_token_set_ratio;
use crate::schema::{CandidateProfile, EvaluationResult, JobDescription};

use super::{Evaluator, EvaluatorContext};

#[derive(Debug, Clone)]
pub struct KeywordWeights {
    pub must: f64,
    pub nice: f64,
    pub nice_to_have: f64,
}

impl Default for KeywordWeights {
    fn default() -> Self {
        Self {
            must: 1.0,
            nice: 0.75,
            nice_to_have: 0.5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JDKeywordMatcherConfig {
    pub min_similarity: f64,
    pub weights: KeywordWeights,
    pub title_bonus: f64,
}

impl Default for JDKeywordMatcherConfig {
    fn default() -> Self {
        Self {
            min_similarity: 60.0,
            weights: KeywordWeights::default(),
            title_bonus: 0.1,
        }
    }
}

pub struct JDKeywordMatcher {
    config: JDKeywordMatcherConfig,
}

impl JDKeywordMatcher {
    pub fn new(config: JDKeywordMatcherConfig) -> Self {
        Self { config }
    }
}

impl Default for JDKeywordMatcher {
    fn default() -> Self {
        Self::new(JDKeywordMatcherConfig::default())
    }
}

struct KeywordGroups {
    must: Vec<String>,
    nice: Vec<String>,
    nice_to_have: Vec<String>,
}

impl Evaluator for JDKeywordMatcher {
    fn method(&self) -> &'static str {
        "jd_rule"
    }

    fn evaluate(
        &self,
        candidate: &CandidateProfile,
        job: &JobDescription,
        context: &EvaluatorContext,
    ) -> Result<EvaluationResult, AppError> {
        let overrides = job.overrides_for("jd_keywords");
        let groups = self.extract_keywords(context, job, overrides);
        let corpus = build_corpus(candidate);

        let must_hits = match_keywords(&corpus, &groups.must, self.config.min_similarity);
        let nice_hits = match_keywords(&corpus, &groups.nice, self.config.min_similarity);
        let nice_to_have_hits = match_keywords(&corpus, &groups.nice_to_have, self.config.min_similarity);

        let must_coverage = coverage_ratio(&groups.must, &must_hits);
        let nice_coverage = coverage_ratio(&groups.nice, &nice_hits);
        let nice_to_have_coverage = coverage_ratio(&groups.nice_to_have, &nice_to_have_hits);

        let weights_override = overrides.and_then(|o| o.get("weights")).and_then(Value::as_object);
        let weight_for = |key: &str, default: f64| -> f64 {
            weights_override
                .and_then(|w| w.get(key))
                .and_then(Value::as_f64)
                .unwrap_or(default)
        };

        let must_weight = if groups.must.is_empty() { 0.0 } else { weight_for("must", self.config.weights.must) };
        let nice_weight = if groups.nice.is_empty() { 0.0 } else { weight_for("nice", self.config.weights.nice) };
        let nice_to_have_weight = if groups.nice_to_have.is_empty() {
            0.0
        } else {
            weight_for("nice_to_have", self.config.weights.nice_to_have)
        };

        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;
        if must_weight > 0.0 {
            weighted_sum += must_weight * must_coverage;
            total_weight += must_weight;
        }
        if nice_weight > 0.0 {
            weighted_sum += nice_weight * nice_coverage;
            total_weight += nice_weight;
        }
        if nice_to_have_weight > 0.0 {
            weighted_sum += nice_to_have_weight * nice_to_have_coverage;
            total_weight += nice_to_have_weight;
        }

        let score = if total_weight > 0.0 { weighted_sum / total_weight } else { 0.0 };
        let score = score.clamp(0.0, 1.0);

        let jd_pass = if score > 0.0 { 1.0 } else { 0.0 };
        let nice_unique = unique_count(&nice_hits) + unique_count(&nice_to_have_hits);
        let title_bonus = overrides
            .and_then(|o| o.get("title_bonus"))
            .and_then(Value::as_f64)
            .unwrap_or(self.config.title_bonus);
        let title_bonus = if nice_unique > 0 { title_bonus } else { 0.0 };

        let result = EvaluationResult::new("jd_rule")
            .with_score("jd_must_coverage", must_coverage)
            .with_score("jd_nice_coverage", nice_coverage)
            .with_score("jd_pass", jd_pass)
            .with_score("embed_sim", score)
            .with_score("bm25_prox", score)
            .with_score("sim_title", nice_coverage)
            .with_score("title_bonus", title_bonus)
            .with_metadata("must_keywords", json!(groups.must))
            .with_metadata("nice_keywords", json!(groups.nice))
            .with_metadata("nice_to_have_keywords", json!(groups.nice_to_have))
            .with_metadata("must_hits", json!(must_hits))
            .with_metadata("nice_hits", json!(nice_hits))
            .with_metadata("corpus_size", json!(corpus.len()))
            .with_metadata("min_similarity", json!(self.config.min_similarity));

        Ok(result)
    }
}

impl JDKeywordMatcher {
    fn extract_keywords(
        &self,
        context: &EvaluatorContext,
        job: &JobDescription,
        overrides: Option<&serde_json::Map<String, Value>>,
    ) -> KeywordGroups {
        let from_override = |key: &str| -> Option<Vec<String>> {
            overrides.and_then(|o| o.get(key)).and_then(Value::as_array).map(|arr| {
                arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect()
            })
        };
        let from_context = |key: &str| -> Option<Vec<String>> {
            context.jd_keywords.as_ref().and_then(|k| k.get(key)).and_then(Value::as_array).map(|arr| {
                arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect()
            })
        };

        let must = from_override("must")
            .or_else(|| from_context("must"))
            .unwrap_or_else(|| job.key_phrases.clone());
        let nice = from_override("nice")
            .or_else(|| from_context("nice"))
            .unwrap_or_else(|| job.role_titles.clone());
        let nice_to_have = from_override("nice_to_have")
            .or_else(|| from_context("nice_to_have"))
            .unwrap_or_default();

        KeywordGroups {
            must: clean(must),
            nice: clean(nice),
            nice_to_have: clean(nice_to_have),
        }
    }
}

fn clean(keywords: Vec<String>) -> Vec<String> {
    keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

fn build_corpus(candidate: &CandidateProfile) -> Vec<String> {
    let mut corpus = Vec::new();
    corpus.extend(candidate.skills.iter().cloned());
    corpus.extend(candidate.languages.iter().map(|l| l.language.clone()));
    for exp in &candidate.experiences {
        if !exp.title.is_empty() {
            corpus.push(exp.title.clone());
        }
        if !exp.summary.is_empty() {
            corpus.push(exp.summary.clone());
        }
        corpus.extend(exp.bullets.iter().cloned());
    }
    if let Some(notes) = &candidate.notes {
        corpus.push(notes.clone());
    }
    corpus
        .into_iter()
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

fn match_keywords(corpus: &[String], keywords: &[String], min_similarity: f64) -> Vec<String> {
    let mut matches = Vec::new();
    for keyword in keywords {
        let keyword_lower = keyword.to_lowercase();
        for text in corpus {
            if text.contains(&keyword_lower) {
                matches.push(keyword.clone());
                break;
            }
            if fuzzy_token_set_ratio(&keyword_lower, text) >= min_similarity {
                matches.push(keyword.clone());
                break;
            }
        }
    }
    matches
}

fn coverage_ratio(keywords: &[String], hits: &[String]) -> f64 {
    if keywords.is_empty() {
        return 1.0;
    }
    unique_count(hits) as f64 / keywords.len() as f64
}

fn unique_count(hits: &[String]) -> usize {
    hits.iter().collect::<std::collections::HashSet<_>>().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ExperienceEntry;
    use chrono::NaiveDate;

    fn ctx() -> EvaluatorContext {
        EvaluatorContext::new(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
    }

    fn candidate() -> CandidateProfile {
        let mut c = CandidateProfile::new("bizreach", "c-1");
        c.skills = vec!["Terraform".to_string(), "AWS".to_string()];
        c.experiences.push(ExperienceEntry {
            company: "Acme".to_string(),
            title: "Site Reliability Engineer".to_string(),
            start: None,
            end: None,
            employment_type: None,
            summary: "Built Prometheus dashboards".to_string(),
            bullets: vec![],
        });
        c
    }

    #[test]
    fn test_full_must_coverage_yields_jd_pass() {
        let mut job = JobDescription::new("jd-1");
        job.key_phrases = vec!["Terraform".to_string(), "AWS".to_string()];
        let evaluator = JDKeywordMatcher::default();
        let result = evaluator.evaluate(&candidate(), &job, &ctx()).unwrap();
        assert_eq!(result.scores["jd_must_coverage"], 1.0);
        assert_eq!(result.scores["jd_pass"], 1.0);
    }

    #[test]
    fn test_empty_keyword_groups_yield_full_coverage_but_zero_pass() {
        let job = JobDescription::new("jd-empty");
        let evaluator = JDKeywordMatcher::default();
        let result = evaluator.evaluate(&candidate(), &job, &ctx()).unwrap();
        assert_eq!(result.scores["jd_must_coverage"], 1.0);
        assert_eq!(result.scores["jd_pass"], 0.0);
    }

    #[test]
    fn test_missing_keyword_reduces_coverage() {
        let mut job = JobDescription::new("jd-1");
        job.key_phrases = vec!["Terraform".to_string(), "Kubernetes".to_string()];
        let evaluator = JDKeywordMatcher::default();
        let result = evaluator.evaluate(&candidate(), &job, &ctx()).unwrap();
        assert_eq!(result.scores["jd_must_coverage"], 0.5);
    }

    #[test]
    fn test_override_nice_to_have_group_is_used() {
        let mut job = JobDescription::new("jd-1");
        let overrides = serde_json::json!({"jd_keywords": {"nice_to_have": ["Prometheus"]}});
        job.evaluation_overrides = overrides.as_object().unwrap().clone();
        let evaluator = JDKeywordMatcher::default();
        let result = evaluator.evaluate(&candidate(), &job, &ctx()).unwrap();
        assert!(result.scores["jd_pass"] > 0.0);
    }
}
