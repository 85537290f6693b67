//! Crate-wide configuration document.
//!
//! `ScreeningConfig` mirrors the shape of a JD's `evaluation_overrides` but
//! applies across every JD instead of per-document. Every field is optional
//! and defaults to the evaluator's own built-in constant; the host CLI loads
//! this from the path given by `--config`, if any.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::core::{ScoreWeights, Thresholds};
use crate::errors::AppError;
use crate::evaluators::bm25::BM25ProximityConfig;
use crate::evaluators::embedding::EmbeddingSimilarityConfig;
use crate::evaluators::jd_matcher::JDKeywordMatcherConfig;
use crate::evaluators::salary::SalaryConfig;
use crate::evaluators::tenure::TenureConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScreeningConfig {
    pub core: CoreConfigDoc,
    pub evaluators: EvaluatorConfigsDoc,
}

impl ScreeningConfig {
    /// Loads a `ScreeningConfig` from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        Ok(config)
    }

    pub fn score_weights(&self) -> ScoreWeights {
        let mut weights = ScoreWeights::default();
        if let Some(doc) = &self.core.score_weights {
            if let Some(v) = doc.bm25_prox {
                weights.bm25_prox = v;
            }
            if let Some(v) = doc.embed_sim {
                weights.embed_sim = v;
            }
            if let Some(v) = doc.sim_title {
                weights.sim_title = v;
            }
            if let Some(v) = doc.title_bonus {
                weights.title_bonus = v;
            }
        }
        weights
    }

    pub fn thresholds(&self) -> Thresholds {
        let mut thresholds = Thresholds::default();
        if let Some(doc) = &self.core.thresholds {
            if let Some(v) = doc.pass {
                thresholds.pass = v;
            }
            if let Some(v) = doc.borderline {
                thresholds.borderline = v;
            }
        }
        thresholds
    }

    pub fn bm25(&self) -> BM25ProximityConfig {
        let mut config = BM25ProximityConfig::default();
        if let Some(doc) = &self.evaluators.bm25 {
            if let Some(v) = doc.k1 {
                config.k1 = v;
            }
            if let Some(v) = doc.b {
                config.b = v;
            }
            if let Some(v) = doc.alpha_proximity {
                config.alpha_proximity = v;
            }
            if let Some(v) = doc.window {
                config.window = v;
            }
            if let Some(sw) = &doc.section_weights {
                if let Some(v) = sw.title {
                    config.section_weights.title = v;
                }
                if let Some(v) = sw.summary {
                    config.section_weights.summary = v;
                }
                if let Some(v) = sw.bullets {
                    config.section_weights.bullets = v;
                }
                if let Some(v) = sw.skills {
                    config.section_weights.skills = v;
                }
            }
            if let Some(synonyms) = &doc.synonyms {
                config.synonyms = synonyms.clone();
            }
        }
        config
    }

    pub fn embed(&self) -> EmbeddingSimilarityConfig {
        let mut config = EmbeddingSimilarityConfig::default();
        if let Some(doc) = &self.evaluators.embed {
            if let Some(v) = doc.top_k {
                config.top_k = v;
            }
            if let Some(sw) = &doc.section_weights {
                if let Some(v) = sw.title {
                    config.section_weights.title = v;
                }
                if let Some(v) = sw.summary {
                    config.section_weights.summary = v;
                }
                if let Some(v) = sw.bullets {
                    config.section_weights.bullets = v;
                }
            }
            if let Some(synonyms) = &doc.synonyms {
                config.synonyms = synonyms.clone();
            }
        }
        config
    }

    pub fn jd(&self) -> JDKeywordMatcherConfig {
        let mut config = JDKeywordMatcherConfig::default();
        if let Some(doc) = &self.evaluators.jd {
            if let Some(v) = doc.min_similarity {
                config.min_similarity = v;
            }
            if let Some(v) = doc.title_bonus {
                config.title_bonus = v;
            }
            if let Some(w) = &doc.weights {
                if let Some(v) = w.must {
                    config.weights.must = v;
                }
                if let Some(v) = w.nice {
                    config.weights.nice = v;
                }
                if let Some(v) = w.nice_to_have {
                    config.weights.nice_to_have = v;
                }
            }
        }
        config
    }

    pub fn tenure(&self) -> TenureConfig {
        let mut config = TenureConfig::default();
        if let Some(doc) = &self.evaluators.tenure {
            if let Some(v) = doc.average_threshold_months {
                config.average_threshold_months = v;
            }
            if let Some(v) = doc.recent_short_threshold_months {
                config.recent_short_threshold_months = v;
            }
            if let Some(v) = doc.contract_average_threshold_months {
                config.contract_average_threshold_months = v;
            }
            if let Some(v) = doc.recent_window {
                config.recent_window = v;
            }
            if let Some(v) = &doc.contract_types {
                config.contract_types = v.clone();
            }
        }
        config
    }

    pub fn salary(&self) -> SalaryConfig {
        let mut config = SalaryConfig::default();
        if let Some(doc) = &self.evaluators.salary {
            if let Some(v) = doc.tolerance_ratio {
                config.tolerance_ratio = v;
            }
        }
        config
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CoreConfigDoc {
    pub score_weights: Option<ScoreWeightsDoc>,
    pub thresholds: Option<ThresholdsDoc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScoreWeightsDoc {
    pub bm25_prox: Option<f64>,
    pub embed_sim: Option<f64>,
    pub sim_title: Option<f64>,
    pub title_bonus: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThresholdsDoc {
    pub pass: Option<f64>,
    pub borderline: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfigsDoc {
    pub bm25: Option<Bm25ConfigDoc>,
    pub embed: Option<EmbedConfigDoc>,
    pub tenure: Option<TenureConfigDoc>,
    pub salary: Option<SalaryConfigDoc>,
    pub jd: Option<JdConfigDoc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Bm25ConfigDoc {
    pub k1: Option<f64>,
    pub b: Option<f64>,
    pub alpha_proximity: Option<f64>,
    pub window: Option<usize>,
    pub section_weights: Option<Bm25SectionWeightsDoc>,
    pub synonyms: Option<HashMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Bm25SectionWeightsDoc {
    pub title: Option<f64>,
    pub summary: Option<f64>,
    pub bullets: Option<f64>,
    pub skills: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmbedConfigDoc {
    pub top_k: Option<usize>,
    pub section_weights: Option<EmbedSectionWeightsDoc>,
    pub synonyms: Option<HashMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmbedSectionWeightsDoc {
    pub title: Option<f64>,
    pub summary: Option<f64>,
    pub bullets: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TenureConfigDoc {
    pub average_threshold_months: Option<f64>,
    pub recent_short_threshold_months: Option<f64>,
    pub contract_average_threshold_months: Option<f64>,
    pub recent_window: Option<usize>,
    pub contract_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SalaryConfigDoc {
    pub tolerance_ratio: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JdConfigDoc {
    pub min_similarity: Option<f64>,
    pub title_bonus: Option<f64>,
    pub weights: Option<KeywordWeightsDoc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeywordWeightsDoc {
    pub must: Option<f64>,
    pub nice: Option<f64>,
    pub nice_to_have: Option<f64>,
}
