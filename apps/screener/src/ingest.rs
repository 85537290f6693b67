//! Resume text ingestion. PDF-to-markdown conversion is out of scope for now;
//! this module realizes only the seam, stubbing an unbuilt ingestor rather
//! than omitting it entirely.

use crate::errors::AppError;

/// Converts raw resume bytes (PDF, DOCX, whatever a provider exports) into
/// plain text/markdown ready for the `bizreach` adapter or a future adapter.
pub trait ResumeIngestor {
    fn ingest(&self, bytes: &[u8]) -> Result<String, AppError>;
}

/// Unbuilt PDF ingestor. Always returns [`AppError::NotImplemented`]; present
/// so the host shell has a concrete type to wire in once a real PDF-to-text
/// pipeline lands.
#[derive(Debug, Default)]
pub struct PdfMarkdownIngestor;

impl ResumeIngestor for PdfMarkdownIngestor {
    fn ingest(&self, _bytes: &[u8]) -> Result<String, AppError> {
        Err(AppError::NotImplemented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_ingestor_is_not_implemented() {
        let ingestor = PdfMarkdownIngestor;
        let result = ingestor.ingest(b"%PDF-1.4");
        assert!(matches!(result, Err(AppError::NotImplemented)));
    }
}
