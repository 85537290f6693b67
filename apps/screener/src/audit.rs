//! Append-only audit trail, one NDJSON line per screened candidate.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::schema::{Decision, DecisionSummary};

/// One audit-log line. `llm_payload`/`llm_response` are attached verbatim
/// from the reranker round trip, if one happened.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub candidate_id: String,
    pub job_id: String,
    pub pre_llm_score: f64,
    pub decision: Decision,
    pub hard_gate_flags: std::collections::HashMap<String, bool>,
    pub hard_gate_details: serde_json::Map<String, Value>,
    pub llm_payload: Value,
    pub llm_response: Option<Value>,
}

impl AuditEntry {
    pub fn from_decision(candidate_id: String, job_id: String, decision: &DecisionSummary, llm_payload: Value, llm_response: Option<Value>) -> Self {
        Self {
            candidate_id,
            job_id,
            pre_llm_score: decision.pre_llm_score,
            decision: decision.decision,
            hard_gate_flags: decision.hard_gate_flags.clone(),
            hard_gate_details: decision.hard_gate_details.clone(),
            llm_payload,
            llm_response,
        }
    }
}

pub trait AuditLogWriter {
    fn record(&mut self, entry: &AuditEntry) -> Result<(), AppError>;
}

/// Default writer: discards every entry.
#[derive(Debug, Default)]
pub struct NullAuditLogWriter;

impl AuditLogWriter for NullAuditLogWriter {
    fn record(&mut self, _entry: &AuditEntry) -> Result<(), AppError> {
        Ok(())
    }
}

/// Appends one JSON line per entry to the path given by `--audit-log`. No
/// retry, no rotation — a crash mid-run simply leaves a truncated log.
pub struct JsonlAuditLogWriter {
    file: std::fs::File,
}

impl JsonlAuditLogWriter {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

impl AuditLogWriter for JsonlAuditLogWriter {
    fn record(&mut self, entry: &AuditEntry) -> Result<(), AppError> {
        let line = serde_json::to_string(entry)?;
        writeln!(self.file, "{line}")?;
        Ok(())
    }
}
