use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use serde_json::json;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use screener::adapters::bizreach::BizreachAdapter;
use screener::adapters::{self, CandidateAdapter};
use screener::audit::{AuditEntry, AuditLogWriter, JsonlAuditLogWriter, NullAuditLogWriter};
use screener::cli::Args;
use screener::config::ScreeningConfig;
use screener::core::ScreeningCore;
use screener::evaluators::bm25::BM25Proximity;
use screener::evaluators::embedding::EmbeddingSimilarity;
use screener::evaluators::jd_matcher::JDKeywordMatcher;
use screener::evaluators::salary::Salary;
use screener::evaluators::tenure::Tenure;
use screener::evaluators::{Evaluator, EvaluatorContext};
use screener::rerank::build_rerank_payload;
use screener::reranker::RerankerClient;
use screener::schema::JobDescription;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();
    init_logging(args.log_level.as_deref());

    info!("screener v{} starting", env!("CARGO_PKG_VERSION"));

    let job = load_job(&args.job)?;
    let config = match &args.config {
        Some(path) => ScreeningConfig::load(path).with_context(|| format!("loading config file '{path}'"))?,
        None => ScreeningConfig::default(),
    };

    let as_of = match &args.as_of {
        Some(raw) => {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid --as-of date '{raw}'"))?
        }
        None => chrono::Utc::now().date_naive(),
    };
    let context = EvaluatorContext::new(as_of);

    let core = build_core(&config);
    let adapter_registry: Vec<Box<dyn CandidateAdapter>> = vec![Box::new(BizreachAdapter)];

    let mut audit_writer: Box<dyn AuditLogWriter> = match &args.audit_log {
        Some(path) => Box::new(JsonlAuditLogWriter::open(path).with_context(|| format!("opening audit log '{path}'"))?),
        None => Box::new(NullAuditLogWriter),
    };

    let reranker = build_reranker_client();

    let candidates_text =
        std::fs::read_to_string(&args.candidates).with_context(|| format!("reading candidates file '{}'", args.candidates))?;

    let mut results = Vec::new();
    let mut errors = Vec::new();

    for (line_number, line) in candidates_text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Err(err) = process_candidate(
            line,
            &adapter_registry,
            &core,
            &job,
            &context,
            &mut *audit_writer,
            reranker.as_ref(),
            &mut results,
        )
        .await
        {
            warn!(line = line_number + 1, error = %err, "skipping candidate");
            errors.push(format!("line {}: {err}", line_number + 1));
        }
    }

    let output = json!({
        "metadata": {
            "job_id": job.job_id,
            "candidate_count": results.len(),
            "errors": errors,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "app_version": env!("CARGO_PKG_VERSION"),
        },
        "results": results,
    });

    std::fs::write(&args.output, serde_json::to_string_pretty(&output)?)
        .with_context(|| format!("writing output file '{}'", args.output))?;

    info!(candidates = results.len(), errors = errors.len(), "screening complete");

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn process_candidate(
    line: &str,
    adapter_registry: &[Box<dyn CandidateAdapter>],
    core: &ScreeningCore,
    job: &JobDescription,
    context: &EvaluatorContext,
    audit_writer: &mut dyn AuditLogWriter,
    reranker: Option<&RerankerClient>,
    results: &mut Vec<serde_json::Value>,
) -> Result<()> {
    let declared_provider = declared_provider(line);
    let adapter = adapters::resolve(adapter_registry, line, declared_provider.as_deref())?;
    let candidate = adapter.parse_candidate(line)?;

    let outcome = core.evaluate(&candidate, job, context)?;

    let llm_payload = build_rerank_payload(&outcome, job, &candidate);
    let llm_response = match reranker {
        Some(client) => client.send(&llm_payload).await,
        None => None,
    };

    let entry = AuditEntry::from_decision(
        candidate.candidate_id.clone(),
        job.job_id.clone(),
        &outcome.decision,
        llm_payload,
        llm_response,
    );
    audit_writer.record(&entry)?;

    results.push(serde_json::to_value(&outcome)?);
    Ok(())
}

fn declared_provider(line: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(line).ok()?;
    value.get("provider").and_then(serde_json::Value::as_str).map(str::to_string)
}

fn load_job(path: &str) -> Result<JobDescription> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading job file '{path}'"))?;
    let job: JobDescription = serde_json::from_str(&text).with_context(|| format!("parsing job file '{path}'"))?;
    Ok(job)
}

fn build_core(config: &ScreeningConfig) -> ScreeningCore {
    let evaluators: Vec<Box<dyn Evaluator>> = vec![
        Box::new(BM25Proximity::new(config.bm25())),
        Box::new(EmbeddingSimilarity::new(config.embed())),
        Box::new(JDKeywordMatcher::new(config.jd())),
        Box::new(Tenure::new(config.tenure())),
        Box::new(Salary::new(config.salary())),
    ];
    ScreeningCore::new(evaluators, config.score_weights(), config.thresholds())
}

/// Builds an optional reranker client from `RERANKER_URL`/`RERANKER_TOKEN`.
/// Absence of `RERANKER_URL` simply disables the optional reranker call; the
/// CLI itself carries no dedicated flag for it.
fn build_reranker_client() -> Option<RerankerClient> {
    let endpoint = std::env::var("RERANKER_URL").ok()?;
    let token = std::env::var("RERANKER_TOKEN").ok();
    Some(RerankerClient::new(endpoint, token))
}

fn init_logging(log_level: Option<&str>) {
    let directive = log_level
        .map(str::to_string)
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    let result = tracing_subscriber::registry()
        .with(EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_err() {
        error!("tracing subscriber already initialized");
    }
}
