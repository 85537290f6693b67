//! Provider-specific payload conversion into [`CandidateProfile`].

pub mod bizreach;

use crate::errors::AppError;
use crate::schema::CandidateProfile;

/// Converts a provider-specific NDJSON line into a [`CandidateProfile`].
/// `split_candidates` exists for providers whose export format packs more
/// than one candidate per blob (e.g. a paginated export); the bundled
/// `bizreach` adapter always returns a single section.
pub trait CandidateAdapter {
    fn provider(&self) -> &'static str;
    fn can_handle(&self, text: &str, declared_provider: Option<&str>) -> bool;
    fn split_candidates(&self, text: &str) -> Vec<String>;
    fn parse_candidate(&self, section: &str) -> Result<CandidateProfile, AppError>;
}

/// Resolves an NDJSON line's declared provider against a fixed adapter
/// registry. Returns [`AppError::UnknownProvider`] when no adapter matches.
pub fn resolve<'a>(
    adapters: &'a [Box<dyn CandidateAdapter>],
    text: &str,
    declared_provider: Option<&str>,
) -> Result<&'a dyn CandidateAdapter, AppError> {
    adapters
        .iter()
        .map(|a| a.as_ref())
        .find(|a| a.can_handle(text, declared_provider))
        .ok_or_else(|| AppError::UnknownProvider(declared_provider.unwrap_or("<unspecified>").to_string()))
}
