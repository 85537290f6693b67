//! Command-line surface. The CLI is a thin host shell: it owns I/O,
//! configuration, and logging, and never changes the core's scoring
//! semantics.

use clap::Parser;

/// Screens an NDJSON stream of candidate résumés against a job description.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the NDJSON candidate stream.
    #[arg(long)]
    pub candidates: String,

    /// Path to the job description JSON document.
    #[arg(long)]
    pub job: String,

    /// Path to write the aggregate output JSON document.
    #[arg(long)]
    pub output: String,

    /// Reference date for tenure math, as `YYYY-MM-DD`. Defaults to today.
    #[arg(long)]
    pub as_of: Option<String>,

    /// Path to an optional `ScreeningConfig` JSON overrides file.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level / `tracing` filter directive (falls back to `RUST_LOG`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to append an NDJSON audit-log line per candidate.
    #[arg(long)]
    pub audit_log: Option<String>,
}
