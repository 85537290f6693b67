//! Provider-neutral candidate résumé schema.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Contact channels for a candidate. Unknown nested fields are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A single employment-history entry.
///
/// Dates are `"YYYY-MM"` strings; `end` absent or the literal `"現在"` means
/// "ongoing". If both dates are present, `start` must be `<= end` — entries
/// that violate this are discarded by [`crate::evaluators::tenure`] but kept
/// for the textual evaluators, which don't care about chronology.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub employment_type: Option<String>,
    pub summary: String,
    pub bullets: Vec<String>,
}

impl ExperienceEntry {
    /// True when `end` is absent or the literal "現在" (ongoing marker).
    pub fn is_ongoing(&self) -> bool {
        match &self.end {
            None => true,
            Some(end) => end == "現在",
        }
    }
}

/// A single education-history entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct EducationEntry {
    pub school: String,
    pub major: Option<String>,
    pub degree: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// A declared language and optional proficiency level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageProficiency {
    pub language: String,
    pub level: Option<String>,
}

/// Candidate-stated hard constraints (consulted by the aggregator's gates).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CandidateConstraints {
    pub language: Vec<String>,
    pub location: Vec<String>,
    pub visa: Option<String>,
    pub can_relocate: Option<bool>,
    pub remote_ok: Option<bool>,
}

/// Per-skill aggregate metadata, keyed by skill name in
/// [`CandidateProfile::skills_agg`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SkillAggregate {
    pub years: Option<f64>,
    pub last_used: Option<String>,
}

/// Provider-neutral résumé. Unknown top-level fields are preserved verbatim
/// in [`CandidateProfile::extra`] rather than rejected, so an adapter's raw
/// payload fields survive round-trips even when this schema hasn't caught up
/// with a provider's newest field; unknown *nested* fields are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub provider: String,
    pub candidate_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contact: ContactInfo,
    #[serde(default)]
    pub experiences: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub languages: Vec<LanguageProficiency>,
    #[serde(default)]
    pub desired_salary_min_jpy: Option<i64>,
    #[serde(default)]
    pub desired_salary_max_jpy: Option<i64>,
    #[serde(default)]
    pub constraints: Option<CandidateConstraints>,
    #[serde(default)]
    pub skills_agg: HashMap<String, SkillAggregate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub provider_raw: Map<String, Value>,

    /// Unknown top-level fields, preserved for round-tripping.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CandidateProfile {
    /// Builds a minimal, valid profile — handy for tests and for adapters
    /// that only populate a handful of fields.
    pub fn new(provider: impl Into<String>, candidate_id: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            candidate_id: candidate_id.into(),
            name: None,
            gender: None,
            age: None,
            location: None,
            contact: ContactInfo::default(),
            experiences: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
            languages: Vec::new(),
            desired_salary_min_jpy: None,
            desired_salary_max_jpy: None,
            constraints: None,
            skills_agg: HashMap::new(),
            notes: None,
            provider_raw: Map::new(),
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_without_end_is_ongoing() {
        let exp = ExperienceEntry {
            start: Some("2020-01".to_string()),
            ..Default::default()
        };
        assert!(exp.is_ongoing());
    }

    #[test]
    fn test_experience_with_present_literal_is_ongoing() {
        let exp = ExperienceEntry {
            end: Some("現在".to_string()),
            ..Default::default()
        };
        assert!(exp.is_ongoing());
    }

    #[test]
    fn test_experience_with_concrete_end_is_not_ongoing() {
        let exp = ExperienceEntry {
            end: Some("2023-06".to_string()),
            ..Default::default()
        };
        assert!(!exp.is_ongoing());
    }

    #[test]
    fn test_unknown_top_level_field_is_preserved() {
        let json = serde_json::json!({
            "provider": "bizreach",
            "candidate_id": "c-1",
            "future_field": "kept"
        });
        let profile: CandidateProfile = serde_json::from_value(json).unwrap();
        assert_eq!(
            profile.extra.get("future_field").and_then(Value::as_str),
            Some("kept")
        );
    }

    #[test]
    fn test_unknown_nested_field_is_rejected() {
        let json = serde_json::json!({
            "provider": "bizreach",
            "candidate_id": "c-1",
            "contact": {"email": "a@b.com", "fax": "000"}
        });
        let result: Result<CandidateProfile, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let json = serde_json::json!({"candidate_id": "c-1"});
        let result: Result<CandidateProfile, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }
}
