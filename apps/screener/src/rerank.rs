//! Pure projection from a [`ScreeningOutcome`] plus its inputs to the JSON
//! document an external reranker consumes.

use serde_json::{json, Value};

use crate::schema::{CandidateProfile, JobDescription, ScreeningOutcome};

/// Builds the rerank payload sent to an external reranker. Extracts the BM25 and
/// embedding evaluations by `method` if present; absent evaluators simply
/// contribute an empty sub-object rather than failing the projection.
pub fn build_rerank_payload(
    outcome: &ScreeningOutcome,
    job: &JobDescription,
    candidate: &CandidateProfile,
) -> Value {
    let bm25 = outcome.evaluations.iter().find(|e| e.method == "bm25_proximity");
    let embed = outcome.evaluations.iter().find(|e| e.method == "embed_similarity");

    let hits_top: Vec<Value> = bm25
        .and_then(|e| e.metadata.get("hits"))
        .and_then(Value::as_array)
        .map(|hits| hits.iter().take(3).cloned().collect())
        .unwrap_or_default();

    let evidence_pairs_top: Vec<Value> = embed
        .and_then(|e| e.metadata.get("evidence_pairs"))
        .and_then(Value::as_array)
        .map(|pairs| pairs.iter().take(3).cloned().collect())
        .unwrap_or_default();

    let skills_agg_top: Vec<&String> = candidate.skills_agg.keys().take(5).collect();

    json!({
        "job_id": outcome.job_id,
        "candidate_id": outcome.candidate_id,
        "jd": {
            "role_titles": job.role_titles,
            "requirements_top": job.requirements_text.iter().take(5).collect::<Vec<_>>(),
            "constraints": job.constraints,
        },
        "candidate_summary": {
            "titles": candidate.experiences.iter().map(|e| &e.title).collect::<Vec<_>>(),
            "skills_agg_top": skills_agg_top,
        },
        "method1_bm25": {
            "bm25_prox": outcome.aggregate.scores.get("bm25_prox").copied().unwrap_or(0.0),
            "title_bonus": outcome.aggregate.scores.get("title_bonus").copied().unwrap_or(0.0),
            "hits_top": hits_top,
        },
        "method2_embed": {
            "embed_sim": outcome.aggregate.scores.get("embed_sim").copied().unwrap_or(0.0),
            "sim_title": outcome.aggregate.scores.get("sim_title").copied().unwrap_or(0.0),
            "evidence_pairs_top": evidence_pairs_top,
        },
        "pre_llm_score": outcome.aggregate.pre_llm_score,
        "penalties": outcome.decision.hard_gate_flags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AggregateScores, Decision, DecisionSummary};
    use std::collections::HashMap;

    fn outcome() -> ScreeningOutcome {
        ScreeningOutcome {
            candidate_id: "c-1".to_string(),
            job_id: "jd-1".to_string(),
            evaluations: vec![],
            aggregate: AggregateScores {
                scores: HashMap::from([("bm25_prox".to_string(), 1.5)]),
                pre_llm_score: 0.9,
            },
            decision: DecisionSummary {
                decision: Decision::Pass,
                pre_llm_score: 0.9,
                hard_gate_flags: HashMap::from([("language".to_string(), true)]),
                hard_gate_details: serde_json::Map::new(),
                hard_failures: vec![],
            },
        }
    }

    #[test]
    fn test_payload_carries_pre_llm_score_and_ids() {
        let job = JobDescription::new("jd-1");
        let candidate = CandidateProfile::new("bizreach", "c-1");
        let payload = build_rerank_payload(&outcome(), &job, &candidate);
        assert_eq!(payload["job_id"], "jd-1");
        assert_eq!(payload["candidate_id"], "c-1");
        assert_eq!(payload["pre_llm_score"], 0.9);
    }

    #[test]
    fn test_payload_defaults_missing_evaluations_to_zero() {
        let job = JobDescription::new("jd-1");
        let candidate = CandidateProfile::new("bizreach", "c-1");
        let payload = build_rerank_payload(&outcome(), &job, &candidate);
        assert_eq!(payload["method2_embed"]["embed_sim"], 0.0);
    }
}
