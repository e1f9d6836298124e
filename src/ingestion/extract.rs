//! Text extraction seam.
//!
//! Document-format parsing (office formats, PDF, and the like) lives behind
//! the [`TextExtractor`] trait; the pipeline only needs a title and a content
//! string. [`PlainTextExtractor`] covers UTF-8 text and doubles as the test
//! extractor.

use async_trait::async_trait;

use super::{split_title_content, ExtractedText};
use crate::types::RagError;

/// Produces a title and content string from raw document bytes.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract text from `bytes`.
    ///
    /// Fails with [`RagError::Parsing`] when the source is unreadable or the
    /// extracted text is empty after trimming.
    async fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, RagError>;
}

/// Extractor for sources that are already plain UTF-8 text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, RagError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|err| RagError::Parsing(format!("source is not valid UTF-8: {err}")))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(RagError::Parsing("document is empty".to_string()));
        }

        Ok(split_title_content(text))
    }
}
