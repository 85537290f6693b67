//! BM25-with-proximity lexical evaluator (`method = "bm25_proximity"`).

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::errors::AppError;
use crate::fuzzy::fuzzy_token_set_ratio;
use crate::schema::{CandidateProfile, EvaluationResult, JobDescription};
use crate::tokenizer::tokenize;

use super::{Evaluator, EvaluatorContext};

/// Tunables for [`BM25Proximity`]. A JD may override any of them via
/// `job.evaluation_overrides.bm25`.
#[derive(Debug, Clone)]
pub struct BM25ProximityConfig {
    pub k1: f64,
    pub b: f64,
    pub alpha_proximity: f64,
    pub window: usize,
    pub section_weights: SectionWeights,
    pub synonyms: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct SectionWeights {
    pub title: f64,
    pub summary: f64,
    pub bullets: f64,
    pub skills: f64,
}

impl Default for SectionWeights {
    fn default() -> Self {
        Self {
            title: 0.8,
            summary: 0.6,
            bullets: 1.0,
            skills: 0.5,
        }
    }
}

impl Default for BM25ProximityConfig {
    fn default() -> Self {
        Self {
            k1: 1.2,
            b: 0.75,
            alpha_proximity: 0.2,
            window: 8,
            section_weights: SectionWeights::default(),
            synonyms: HashMap::new(),
        }
    }
}

pub struct BM25Proximity {
    config: BM25ProximityConfig,
}

impl BM25Proximity {
    pub fn new(config: BM25ProximityConfig) -> Self {
        Self { config }
    }
}

impl Default for BM25Proximity {
    fn default() -> Self {
        Self::new(BM25ProximityConfig::default())
    }
}

struct WeightedDoc {
    text: String,
    section: &'static str,
    weight: f64,
    tokens: Vec<String>,
}

struct Hit {
    jd_text: String,
    resume_text: String,
    bm25: f64,
    proximity_bonus: f64,
    section: &'static str,
    weight: f64,
}

impl Evaluator for BM25Proximity {
    fn method(&self) -> &'static str {
        "bm25_proximity"
    }

    fn evaluate(
        &self,
        candidate: &CandidateProfile,
        job: &JobDescription,
        _context: &EvaluatorContext,
    ) -> Result<EvaluationResult, AppError> {
        let docs = self.build_documents(candidate);
        let title_bonus = self.title_bonus(candidate, job);

        if docs.is_empty() {
            return Ok(self.payload(0.0, title_bonus, Vec::new()));
        }

        let avg_doc_len: f64 = docs.iter().map(|d| d.tokens.len() as f64).sum::<f64>() / docs.len() as f64;
        let idf = compute_idf(docs.iter().map(|d| d.tokens.as_slice()));

        let queries = self.build_queries(job);
        let mut hits = Vec::new();
        let mut total_score = 0.0;

        for query_text in queries {
            let query_tokens = self.expand_tokens(tokenize(&query_text));
            if query_tokens.is_empty() {
                continue;
            }
            if let Some(hit) = self.score_query(&query_text, &query_tokens, &docs, &idf, avg_doc_len) {
                total_score += hit.bm25 + hit.proximity_bonus;
                hits.push(hit);
            }
        }

        let bm25_score = if hits.is_empty() {
            0.0
        } else {
            total_score / hits.len() as f64
        };

        Ok(self.payload(bm25_score, title_bonus, hits))
    }
}

impl BM25Proximity {
    fn build_documents(&self, candidate: &CandidateProfile) -> Vec<WeightedDoc> {
        let mut docs = Vec::new();
        for exp in &candidate.experiences {
            if !exp.title.trim().is_empty() {
                docs.push(raw_doc(&exp.title, "title", self.config.section_weights.title));
            }
            if !exp.summary.trim().is_empty() {
                docs.push(raw_doc(&exp.summary, "summary", self.config.section_weights.summary));
            }
            for bullet in &exp.bullets {
                docs.push(raw_doc(bullet, "bullets", self.config.section_weights.bullets));
            }
        }
        if !candidate.skills.is_empty() {
            docs.push(raw_doc(
                &candidate.skills.join(" "),
                "skills",
                self.config.section_weights.skills,
            ));
        }
        docs.into_iter()
            .filter(|d| !d.tokens.is_empty())
            .collect()
    }

    fn build_queries(&self, job: &JobDescription) -> Vec<String> {
        let mut queries: Vec<String> = job.requirements_text.clone();
        queries.extend(job.key_phrases.clone());
        let mut seen = std::collections::HashSet::new();
        let mut unique = Vec::new();
        for text in queries {
            let tokenized = tokenize(&text).join(" ");
            if tokenized.is_empty() || !seen.insert(tokenized) {
                continue;
            }
            unique.push(text);
        }
        unique
    }

    fn expand_tokens(&self, tokens: Vec<String>) -> Vec<String> {
        let mut expanded: std::collections::HashSet<String> = tokens.into_iter().collect();
        let originals: Vec<String> = expanded.iter().cloned().collect();
        for token in originals {
            if let Some(alts) = self.config.synonyms.get(&token) {
                for alt in alts {
                    expanded.extend(tokenize(alt));
                }
            }
        }
        expanded.into_iter().collect()
    }

    fn score_query(
        &self,
        query_text: &str,
        query_tokens: &[String],
        docs: &[WeightedDoc],
        idf: &HashMap<String, f64>,
        avg_doc_len: f64,
    ) -> Option<Hit> {
        let mut best_score = 0.0f64;
        let mut best_hit: Option<Hit> = None;

        for doc in docs {
            let doc_len = doc.tokens.len() as f64;
            let mut bm25 = 0.0;
            for token in query_tokens {
                let freq = doc.tokens.iter().filter(|t| *t == token).count() as f64;
                if freq == 0.0 {
                    continue;
                }
                let token_idf = *idf.get(token).unwrap_or(&0.0);
                let denom = freq
                    + self.config.k1 * (1.0 - self.config.b + self.config.b * (doc_len / avg_doc_len));
                bm25 += token_idf * (freq * (self.config.k1 + 1.0)) / denom;
            }
            if bm25 <= 0.0 {
                continue;
            }
            let proximity = proximity_bonus(&doc.tokens, query_tokens, self.config.window, self.config.alpha_proximity);
            let weighted = (bm25 + proximity) * doc.weight;
            if weighted > best_score {
                best_score = weighted;
                best_hit = Some(Hit {
                    jd_text: query_text.to_string(),
                    resume_text: doc.text.clone(),
                    bm25,
                    proximity_bonus: proximity,
                    section: doc.section,
                    weight: doc.weight,
                });
            }
        }
        best_hit
    }

    fn title_bonus(&self, candidate: &CandidateProfile, job: &JobDescription) -> f64 {
        if job.role_titles.is_empty() {
            return 0.0;
        }
        let candidate_titles: Vec<&str> = candidate
            .experiences
            .iter()
            .map(|e| e.title.as_str())
            .filter(|t| !t.trim().is_empty())
            .collect();
        if candidate_titles.is_empty() {
            return 0.0;
        }
        let mut best = 0.0f64;
        for job_title in &job.role_titles {
            for candidate_title in &candidate_titles {
                let ratio = fuzzy_token_set_ratio(job_title, candidate_title) / 100.0;
                best = best.max(ratio);
            }
        }
        round4(best * 0.2)
    }

    fn payload(&self, bm25_score: f64, title_bonus: f64, hits: Vec<Hit>) -> EvaluationResult {
        let hits_json: Vec<Value> = hits
            .iter()
            .map(|h| {
                json!({
                    "jd_text": h.jd_text,
                    "resume_text": h.resume_text,
                    "bm25": h.bm25,
                    "proximity_bonus": h.proximity_bonus,
                    "section": h.section,
                    "weight": h.weight,
                })
            })
            .collect();

        EvaluationResult::new("bm25_proximity")
            .with_score("bm25_prox", bm25_score)
            .with_score("title_bonus", title_bonus)
            .with_metadata("k1", json!(self.config.k1))
            .with_metadata("b", json!(self.config.b))
            .with_metadata("alpha_proximity", json!(self.config.alpha_proximity))
            .with_metadata("window", json!(self.config.window))
            .with_metadata("hits", json!(hits_json))
    }
}

fn raw_doc(text: &str, section: &'static str, weight: f64) -> WeightedDoc {
    WeightedDoc {
        text: text.to_string(),
        section,
        weight,
        tokens: tokenize(text),
    }
}

fn compute_idf<'a>(docs: impl Iterator<Item = &'a [String]>) -> HashMap<String, f64> {
    let mut df: HashMap<String, usize> = HashMap::new();
    let mut total_docs = 0usize;
    for tokens in docs {
        total_docs += 1;
        let seen: std::collections::HashSet<&String> = tokens.iter().collect();
        for token in seen {
            *df.entry(token.clone()).or_insert(0) += 1;
        }
    }
    df.into_iter()
        .map(|(token, freq)| {
            let value = (1.0 + (total_docs as f64 - freq as f64 + 0.5) / (freq as f64 + 0.5)).ln();
            (token, value)
        })
        .collect()
}

/// Minimal-span proximity bonus: the smallest window containing at least one
/// occurrence of every query token, scored `alpha / (1 + span)` when the span
/// fits inside `window`.
fn proximity_bonus(doc_tokens: &[String], query_tokens: &[String], window: usize, alpha: f64) -> f64 {
    if query_tokens.len() <= 1 {
        return 0.0;
    }
    let unique_tokens: std::collections::HashSet<&String> = query_tokens.iter().collect();
    let mut positions: HashMap<&String, Vec<usize>> = HashMap::new();
    for token in &unique_tokens {
        positions.insert(token, Vec::new());
    }
    for (idx, token) in doc_tokens.iter().enumerate() {
        if let Some(list) = positions.get_mut(token) {
            list.push(idx);
        }
    }
    if positions.values().any(|p| p.is_empty()) {
        return 0.0;
    }

    let mut min_span = usize::MAX;
    for start_positions in positions.values() {
        for &start_idx in start_positions {
            let mut max_idx = start_idx;
            for token_positions in positions.values() {
                let nearest = token_positions
                    .iter()
                    .min_by_key(|&&pos| (pos as i64 - start_idx as i64).abs())
                    .copied()
                    .unwrap();
                max_idx = max_idx.max(nearest);
            }
            let span = max_idx - start_idx + 1;
            min_span = min_span.min(span);
        }
    }

    if min_span == usize::MAX {
        return 0.0;
    }
    if min_span <= window {
        alpha / (1.0 + min_span as f64)
    } else {
        0.0
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ExperienceEntry;
    use chrono::NaiveDate;

    fn ctx() -> EvaluatorContext {
        EvaluatorContext::new(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
    }

    fn sre_candidate() -> CandidateProfile {
        let mut candidate = CandidateProfile::new("bizreach", "c-1");
        candidate.experiences.push(ExperienceEntry {
            company: "Acme".to_string(),
            title: "Site Reliability Engineer".to_string(),
            start: Some("2020-01".to_string()),
            end: None,
            employment_type: None,
            summary: "Ran Terraform and AWS infrastructure".to_string(),
            bullets: vec!["Operated Prometheus monitoring for AWS".to_string()],
        });
        candidate.skills = vec!["Terraform".to_string(), "AWS".to_string(), "Prometheus".to_string()];
        candidate
    }

    fn sre_job() -> JobDescription {
        let mut job = JobDescription::new("jd-1");
        job.role_titles = vec!["Site Reliability Engineer".to_string()];
        job.requirements_text = vec![
            "Terraform AWS infrastructure".to_string(),
            "Prometheus monitoring".to_string(),
        ];
        job
    }

    #[test]
    fn test_matching_resume_scores_positive_bm25() {
        let evaluator = BM25Proximity::default();
        let result = evaluator.evaluate(&sre_candidate(), &sre_job(), &ctx()).unwrap();
        assert!(result.scores["bm25_prox"] > 0.0);
    }

    #[test]
    fn test_title_bonus_rewards_exact_title_match() {
        let evaluator = BM25Proximity::default();
        let result = evaluator.evaluate(&sre_candidate(), &sre_job(), &ctx()).unwrap();
        assert!((result.scores["title_bonus"] - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_empty_candidate_yields_zero_scores() {
        let evaluator = BM25Proximity::default();
        let candidate = CandidateProfile::new("bizreach", "c-empty");
        let result = evaluator.evaluate(&candidate, &sre_job(), &ctx()).unwrap();
        assert_eq!(result.scores["bm25_prox"], 0.0);
        assert_eq!(result.scores["title_bonus"], 0.0);
    }

    #[test]
    fn test_no_role_titles_gives_zero_title_bonus() {
        let evaluator = BM25Proximity::default();
        let job = JobDescription::new("jd-no-title");
        let result = evaluator.evaluate(&sre_candidate(), &job, &ctx()).unwrap();
        assert_eq!(result.scores["title_bonus"], 0.0);
    }

    #[test]
    fn test_proximity_bonus_requires_all_tokens_present() {
        let tokens: Vec<String> = vec!["terraform".into(), "aws".into(), "prometheus".into()];
        let query: Vec<String> = vec!["terraform".into(), "missing".into()];
        assert_eq!(proximity_bonus(&tokens, &query, 8, 0.2), 0.0);
    }

    #[test]
    fn test_proximity_bonus_within_window() {
        let tokens: Vec<String> = vec!["terraform".into(), "and".into(), "aws".into()];
        let query: Vec<String> = vec!["terraform".into(), "aws".into()];
        let bonus = proximity_bonus(&tokens, &query, 8, 0.2);
        assert!(bonus > 0.0);
    }
}
