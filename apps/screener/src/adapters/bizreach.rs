//! Adapter for the BizReach-native candidate export shape.

use serde_json::Value;

use crate::errors::AppError;
use crate::schema::{CandidateProfile, EducationEntry, ExperienceEntry, LanguageProficiency};

use super::CandidateAdapter;

#[derive(Debug, Default)]
pub struct BizreachAdapter;

impl CandidateAdapter for BizreachAdapter {
    fn provider(&self) -> &'static str {
        "bizreach"
    }

    fn can_handle(&self, text: &str, declared_provider: Option<&str>) -> bool {
        if let Some(provider) = declared_provider {
            if provider.eq_ignore_ascii_case(self.provider()) {
                return true;
            }
        }
        match serde_json::from_str::<Value>(text) {
            Ok(value) => value
                .get("provider")
                .and_then(Value::as_str)
                .map(|p| p.eq_ignore_ascii_case(self.provider()))
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    fn split_candidates(&self, text: &str) -> Vec<String> {
        vec![text.to_string()]
    }

    fn parse_candidate(&self, section: &str) -> Result<CandidateProfile, AppError> {
        let data: Value = serde_json::from_str(section)?;
        let payload = data.get("payload").unwrap_or(&data);

        let experiences = payload
            .get("experiences")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(parse_experience).collect())
            .unwrap_or_default();

        let languages = payload
            .get("languages")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(parse_language).collect())
            .unwrap_or_default();

        let education = payload
            .get("education")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(parse_education).collect())
            .unwrap_or_default();

        let skills = payload
            .get("skills")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default();

        let constraints = payload
            .get("constraints")
            .cloned()
            .filter(|v| !v.is_null())
            .map(serde_json::from_value)
            .transpose()?;

        Ok(CandidateProfile {
            provider: self.provider().to_string(),
            candidate_id: string_field(payload, "candidate_id"),
            name: optional_string_field(payload, "name"),
            gender: optional_string_field(payload, "gender"),
            age: payload.get("age").and_then(Value::as_i64),
            location: optional_string_field(payload, "location"),
            contact: Default::default(),
            experiences,
            education,
            skills,
            languages,
            desired_salary_min_jpy: payload.get("desired_salary_min_jpy").and_then(Value::as_i64),
            desired_salary_max_jpy: payload.get("desired_salary_max_jpy").and_then(Value::as_i64),
            constraints,
            skills_agg: Default::default(),
            notes: optional_string_field(payload, "notes"),
            provider_raw: payload.as_object().cloned().unwrap_or_default(),
            extra: Default::default(),
        })
    }
}

fn string_field(value: &Value, key: &str) -> String {
    value.get(key).and_then(Value::as_str).unwrap_or("").to_string()
}

fn optional_string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn parse_experience(item: &Value) -> ExperienceEntry {
    ExperienceEntry {
        company: string_field(item, "company"),
        title: string_field(item, "title"),
        start: optional_string_field(item, "start"),
        end: optional_string_field(item, "end"),
        employment_type: optional_string_field(item, "employment_type"),
        summary: string_field(item, "summary"),
        bullets: item
            .get("bullets")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default(),
    }
}

fn parse_language(entry: &Value) -> LanguageProficiency {
    LanguageProficiency {
        language: string_field(entry, "language"),
        level: optional_string_field(entry, "level"),
    }
}

fn parse_education(item: &Value) -> EducationEntry {
    EducationEntry {
        school: string_field(item, "school"),
        major: optional_string_field(item, "major"),
        degree: optional_string_field(item, "degree"),
        start: optional_string_field(item, "start"),
        end: optional_string_field(item, "end"),
    }
}
