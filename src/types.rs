//! Shared error type for the ingestion and query pipeline.

use thiserror::Error;

/// Errors surfaced by the chunking, retrieval, and answering pipeline.
///
/// Collaborator failures are never swallowed: storage and generation errors
/// are wrapped with the failing stage and returned to the caller. None of the
/// variants are retried internally; callers decide their own retry policy.
#[derive(Debug, Error)]
pub enum RagError {
    /// Malformed or empty caller input (empty question, empty content).
    #[error("invalid input: {0}")]
    Validation(String),

    /// No chunks exist anywhere; a query cannot be answered.
    #[error("no document chunks available; ingest a document first")]
    EmptyCorpus,

    /// The text extractor could not produce usable text.
    #[error("text extraction failed: {0}")]
    Parsing(String),

    /// Chunk store failure during create or read.
    #[error("storage failure: {0}")]
    Storage(String),

    /// The answer generator errored, timed out, or returned no content.
    #[error("answer generation failed: {0}")]
    Generation(String),
}

impl RagError {
    /// `true` when the error means the corpus has no chunks at all.
    pub fn is_empty_corpus(&self) -> bool {
        matches!(self, RagError::EmptyCorpus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failing_stage() {
        let err = RagError::Storage("disk full".into());
        assert_eq!(err.to_string(), "storage failure: disk full");

        let err = RagError::Generation("timeout".into());
        assert!(err.to_string().starts_with("answer generation failed"));
    }

    #[test]
    fn empty_corpus_predicate() {
        assert!(RagError::EmptyCorpus.is_empty_corpus());
        assert!(!RagError::Validation("x".into()).is_empty_corpus());
    }
}
