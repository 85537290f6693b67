use thiserror::Error;

/// Crate-wide error type. Every fallible boundary in the engine and its host
/// shell returns this; the library never calls `std::process::exit`. Schema
/// validation failures surface through [`AppError::Json`] (`#[serde(deny_unknown_fields)]`
/// rejections included); the optional reranker call degrades silently per
/// §7 rather than returning an error variant.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("no adapter registered for provider '{0}'")]
    UnknownProvider(String),

    #[error("evaluator contract violation in '{method}': {reason}")]
    EvaluatorContract { method: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("not implemented")]
    NotImplemented,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
