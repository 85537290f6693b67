//! End-to-end CLI flow: NDJSON candidates + a JD document in, the aggregate
//! screening JSON document out. Exercises the host shell (`main.rs`) rather
//! than calling the library directly, since that's the boundary the CLI
//! actually promises to callers.

use std::process::Command;

use serde_json::{json, Value};

fn write(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn run_screener(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_screener"))
        .args(args)
        .output()
        .expect("failed to execute screener binary")
}

#[test]
fn test_positive_sre_candidate_passes_end_to_end() {
    let dir = tempfile::tempdir().unwrap();

    let job = json!({
        "job_id": "jd-sre-1",
        "role_titles": ["Site Reliability Engineer"],
        "requirements_text": ["Terraform AWS infrastructure", "Prometheus monitoring"],
        "key_phrases": ["Terraform", "AWS", "Prometheus"],
        "constraints": {
            "language": ["ja"],
            "salary_range": {"min_jpy": 6_000_000, "max_jpy": 9_500_000}
        }
    });
    let job_path = write(dir.path(), "job.json", &job.to_string());

    let candidate = json!({
        "provider": "bizreach",
        "payload": {
            "candidate_id": "cand-1",
            "experiences": [{
                "company": "Acme",
                "title": "Site Reliability Engineer",
                "start": "2018-01",
                "summary": "Operated Terraform and AWS infrastructure",
                "bullets": ["Built Prometheus alerting for AWS"]
            }],
            "skills": ["Terraform", "AWS", "Prometheus"],
            "languages": [{"language": "日本語"}],
            "desired_salary_min_jpy": 7_000_000,
            "desired_salary_max_jpy": 9_000_000
        }
    });
    let candidates_path = write(dir.path(), "candidates.ndjson", &candidate.to_string());
    let output_path = dir.path().join("output.json");
    let audit_path = dir.path().join("audit.ndjson");

    let output = run_screener(&[
        "--candidates",
        candidates_path.to_str().unwrap(),
        "--job",
        job_path.to_str().unwrap(),
        "--output",
        output_path.to_str().unwrap(),
        "--as-of",
        "2026-01-01",
        "--audit-log",
        audit_path.to_str().unwrap(),
        "--log-level",
        "error",
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let document: Value = serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(document["metadata"]["job_id"], "jd-sre-1");
    assert_eq!(document["metadata"]["candidate_count"], 1);
    assert!(document["metadata"]["errors"].as_array().unwrap().is_empty());

    let results = document["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    let outcome = &results[0];
    assert_eq!(outcome["candidate_id"], "cand-1");
    assert_eq!(outcome["decision"]["hard_failures"].as_array().unwrap().len(), 0);
    assert!(outcome["aggregate"]["scores"]["bm25_prox"].as_f64().unwrap() > 0.0);

    let audit_contents = std::fs::read_to_string(&audit_path).unwrap();
    assert_eq!(audit_contents.lines().count(), 1);
}

#[test]
fn test_language_gate_miss_forces_reject_in_output() {
    let dir = tempfile::tempdir().unwrap();

    let job = json!({
        "job_id": "jd-2",
        "constraints": {"language": ["ja"]}
    });
    let job_path = write(dir.path(), "job.json", &job.to_string());

    let candidate = json!({
        "provider": "bizreach",
        "payload": {
            "candidate_id": "cand-2",
            "languages": [{"language": "英語"}]
        }
    });
    let candidates_path = write(dir.path(), "candidates.ndjson", &candidate.to_string());
    let output_path = dir.path().join("output.json");

    let output = run_screener(&[
        "--candidates",
        candidates_path.to_str().unwrap(),
        "--job",
        job_path.to_str().unwrap(),
        "--output",
        output_path.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let document: Value = serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    let outcome = &document["results"][0];
    assert_eq!(outcome["decision"]["decision"], "reject");
    assert!(outcome["decision"]["hard_failures"]
        .as_array()
        .unwrap()
        .iter()
        .any(|v| v == "language"));
}

#[test]
fn test_unknown_provider_is_skipped_and_reported() {
    let dir = tempfile::tempdir().unwrap();

    let job_path = write(dir.path(), "job.json", &json!({"job_id": "jd-3"}).to_string());
    let candidate = json!({"provider": "greenhouse", "payload": {"candidate_id": "cand-3"}});
    let candidates_path = write(dir.path(), "candidates.ndjson", &candidate.to_string());
    let output_path = dir.path().join("output.json");

    let output = run_screener(&[
        "--candidates",
        candidates_path.to_str().unwrap(),
        "--job",
        job_path.to_str().unwrap(),
        "--output",
        output_path.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let document: Value = serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(document["metadata"]["candidate_count"], 0);
    assert_eq!(document["results"].as_array().unwrap().len(), 0);
    assert_eq!(document["metadata"]["errors"].as_array().unwrap().len(), 1);
}
