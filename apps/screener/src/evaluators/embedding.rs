//! Deterministic TF-IDF cosine evaluator (`method = "embed_similarity"`).

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::errors::AppError;
use crate::schema::{CandidateProfile, EvaluationResult, JobDescription};
use crate::tokenizer::tokenize;

use super::{Evaluator, EvaluatorContext};

#[derive(Debug, Clone)]
pub struct EmbeddingSimilarityConfig {
    pub top_k: usize,
    pub section_weights: SectionWeights,
    pub synonyms: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct SectionWeights {
    pub title: f64,
    pub summary: f64,
    pub bullets: f64,
}

impl Default for SectionWeights {
    fn default() -> Self {
        Self {
            title: 0.7,
            summary: 0.8,
            bullets: 1.0,
        }
    }
}

impl Default for EmbeddingSimilarityConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            section_weights: SectionWeights::default(),
            synonyms: HashMap::new(),
        }
    }
}

pub struct EmbeddingSimilarity {
    config: EmbeddingSimilarityConfig,
}

impl EmbeddingSimilarity {
    pub fn new(config: EmbeddingSimilarityConfig) -> Self {
        Self { config }
    }
}

impl Default for EmbeddingSimilarity {
    fn default() -> Self {
        Self::new(EmbeddingSimilarityConfig::default())
    }
}

struct ResumeEntry {
    text: String,
    augmented: String,
    section: &'static str,
    weight: f64,
}

struct Evidence {
    jd_text: String,
    resume_text: String,
    similarity: f64,
    section: &'static str,
    weight: f64,
}

type Vector = HashMap<String, f64>;

impl Evaluator for EmbeddingSimilarity {
    fn method(&self) -> &'static str {
        "embed_similarity"
    }

    fn evaluate(
        &self,
        candidate: &CandidateProfile,
        job: &JobDescription,
        _context: &EvaluatorContext,
    ) -> Result<EvaluationResult, AppError> {
        let jd_texts: Vec<&str> = job
            .requirements_text
            .iter()
            .map(String::as_str)
            .filter(|t| !t.is_empty())
            .collect();
        if jd_texts.is_empty() {
            return Ok(self.empty_payload());
        }

        let resume_entries = self.collect_resume_entries(candidate);
        if resume_entries.is_empty() {
            return Ok(self.empty_payload());
        }

        let augmented_jd: Vec<String> = jd_texts.iter().map(|t| self.augment_text(t)).collect();
        let jd_corpus: Vec<Vec<String>> = augmented_jd.iter().map(|t| tokenize(t)).collect();
        let resume_corpus: Vec<Vec<String>> = resume_entries.iter().map(|e| tokenize(&e.augmented)).collect();

        if jd_corpus.iter().all(|t| t.is_empty()) || resume_corpus.iter().all(|t| t.is_empty()) {
            return Ok(self.empty_payload());
        }

        let idf = compute_idf(jd_corpus.iter().chain(resume_corpus.iter()));
        let jd_vectors: Vec<Vector> = jd_corpus.iter().map(|t| tfidf_vector(t, &idf)).collect();
        let resume_vectors: Vec<Vector> = resume_corpus.iter().map(|t| tfidf_vector(t, &idf)).collect();

        let mut evidence = Vec::new();
        for (jd_index, jd_text) in jd_texts.iter().enumerate() {
            for (entry, resume_vec) in resume_entries.iter().zip(resume_vectors.iter()) {
                let similarity = cosine_similarity(&jd_vectors[jd_index], resume_vec);
                if similarity <= 0.0 {
                    continue;
                }
                evidence.push(Evidence {
                    jd_text: jd_text.to_string(),
                    resume_text: entry.text.clone(),
                    similarity,
                    section: entry.section,
                    weight: entry.weight,
                });
            }
        }
        evidence.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap());

        if evidence.is_empty() {
            return Ok(self.empty_payload());
        }

        let top_k = self.config.top_k;
        let take = top_k.min(evidence.len());
        let avg_similarity: f64 = evidence[..take].iter().map(|e| e.similarity).sum::<f64>() / take as f64;
        let title_similarity = self.title_similarity(job, candidate, &idf);

        Ok(self.payload(round4(avg_similarity), round4(title_similarity), &evidence[..take]))
    }
}

impl EmbeddingSimilarity {
    fn collect_resume_entries(&self, candidate: &CandidateProfile) -> Vec<ResumeEntry> {
        let mut entries = Vec::new();
        for exp in &candidate.experiences {
            if !exp.title.is_empty() {
                entries.push(ResumeEntry {
                    text: exp.title.clone(),
                    augmented: self.augment_text(&exp.title),
                    section: "title",
                    weight: self.config.section_weights.title,
                });
            }
            if !exp.summary.is_empty() {
                entries.push(ResumeEntry {
                    text: exp.summary.clone(),
                    augmented: self.augment_text(&exp.summary),
                    section: "summary",
                    weight: self.config.section_weights.summary,
                });
            }
            for bullet in &exp.bullets {
                if bullet.is_empty() {
                    continue;
                }
                entries.push(ResumeEntry {
                    text: bullet.clone(),
                    augmented: self.augment_text(bullet),
                    section: "bullets",
                    weight: self.config.section_weights.bullets,
                });
            }
        }
        entries
    }

    fn augment_text(&self, text: &str) -> String {
        let tokens = tokenize(text);
        let mut extras: std::collections::BTreeSet<String> = std::collections::BTreeSet::new();
        for token in &tokens {
            if let Some(alts) = self.config.synonyms.get(token) {
                extras.extend(alts.iter().cloned());
            }
        }
        if extras.is_empty() {
            text.to_string()
        } else {
            format!("{} {}", text, extras.into_iter().collect::<Vec<_>>().join(" "))
        }
    }

    fn title_similarity(&self, job: &JobDescription, candidate: &CandidateProfile, idf: &HashMap<String, f64>) -> f64 {
        if job.role_titles.is_empty() {
            return 0.0;
        }
        let candidate_titles: Vec<&str> = candidate
            .experiences
            .iter()
            .map(|e| e.title.as_str())
            .filter(|t| !t.is_empty())
            .collect();
        if candidate_titles.is_empty() {
            return 0.0;
        }

        let job_vectors: Vec<Vector> = job
            .role_titles
            .iter()
            .map(|t| tfidf_vector(&tokenize(&self.augment_text(t)), idf))
            .collect();
        let candidate_vectors: Vec<Vector> = candidate_titles
            .iter()
            .map(|t| tfidf_vector(&tokenize(&self.augment_text(t)), idf))
            .collect();

        let mut best = 0.0f64;
        for job_vec in &job_vectors {
            for candidate_vec in &candidate_vectors {
                best = best.max(cosine_similarity(job_vec, candidate_vec));
            }
        }
        best
    }

    fn payload(&self, embed_sim: f64, sim_title: f64, evidence: &[Evidence]) -> EvaluationResult {
        let evidence_json: Vec<Value> = evidence
            .iter()
            .map(|e| {
                json!({
                    "jd_text": e.jd_text,
                    "resume_text": e.resume_text,
                    "similarity": e.similarity,
                    "section": e.section,
                    "weight": e.weight,
                })
            })
            .collect();

        EvaluationResult::new("embed_similarity")
            .with_score("embed_sim", embed_sim)
            .with_score("sim_title", sim_title)
            .with_metadata("model", json!("tfidf-cosine-lite"))
            .with_metadata("top_k", json!(self.config.top_k))
            .with_metadata("evidence_pairs", json!(evidence_json))
    }

    fn empty_payload(&self) -> EvaluationResult {
        EvaluationResult::new("embed_similarity")
            .with_score("embed_sim", 0.0)
            .with_score("sim_title", 0.0)
            .with_metadata("model", json!("tfidf-cosine-lite"))
            .with_metadata("top_k", json!(self.config.top_k))
            .with_metadata("evidence_pairs", json!(Vec::<Value>::new()))
    }
}

fn tfidf_vector(tokens: &[String], idf: &HashMap<String, f64>) -> Vector {
    if tokens.is_empty() {
        return Vector::new();
    }
    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    let total = tokens.len() as f64;
    let mut vector = Vector::new();
    for (token, count) in counts {
        let weight = (count as f64 / total) * idf.get(&token).copied().unwrap_or(0.0);
        if weight > 0.0 {
            vector.insert(token, weight);
        }
    }
    vector
}

fn compute_idf<'a>(documents: impl Iterator<Item = &'a Vec<String>>) -> HashMap<String, f64> {
    let mut doc_freq: HashMap<String, usize> = HashMap::new();
    let mut total_docs = 0usize;
    for tokens in documents {
        if tokens.is_empty() {
            continue;
        }
        total_docs += 1;
        let seen: std::collections::HashSet<&String> = tokens.iter().collect();
        for token in seen {
            *doc_freq.entry(token.clone()).or_insert(0) += 1;
        }
    }
    doc_freq
        .into_iter()
        .map(|(token, freq)| {
            let value = ((1.0 + total_docs as f64) / (1.0 + freq as f64)).ln() + 1.0;
            (token, value)
        })
        .collect()
}

fn cosine_similarity(a: &Vector, b: &Vector) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let dot: f64 = a.iter().map(|(token, value)| value * b.get(token).copied().unwrap_or(0.0)).sum();
    if dot == 0.0 {
        return 0.0;
    }
    let norm_a = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.values().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
