//! Keyword-based chunk selection with a full-corpus fallback.
//!
//! The query is tokenized on whitespace and the keywords are joined into a
//! single `LIKE` pattern (`%kw1%kw2%…%`), which requires a chunk to contain
//! every keyword in order, case-sensitively. Two situations deliberately
//! fall back to the entire corpus instead of returning nothing:
//!
//! - a query with no keywords (empty or whitespace-only) cannot filter, and
//! - a keyword query that matches zero chunks.
//!
//! The fallback trades possible irrelevance for availability: the answer
//! generator always receives *some* context when the corpus is non-empty.
//! It never masks a store failure, only a no-match outcome.

use crate::stores::{Chunk, ChunkStore};
use crate::types::RagError;

/// Default number of chunks returned by a keyword search.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Which code path produced a set of retrieved chunks.
///
/// Context assembly renders a different header for each, so the generator
/// knows whether it is looking at everything or at a filtered selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalScope {
    /// Every chunk in the store, in `(document_id, chunk_index)` order.
    FullCorpus,
    /// Chunks matched by the keyword pattern.
    KeywordMatch,
}

/// Retrieved chunks together with the scope that produced them.
#[derive(Debug, Clone)]
pub struct Retrieval {
    pub chunks: Vec<Chunk>,
    pub scope: RetrievalScope,
}

impl Retrieval {
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Escape `LIKE` metacharacters so keyword text matches literally.
fn escape_like(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Build the `%kw1%kw2%…%` pattern from whitespace-separated keywords.
///
/// Returns `None` when the query contains no keywords.
pub fn build_like_pattern(query: &str) -> Option<String> {
    let keywords: Vec<String> = query.split_whitespace().map(escape_like).collect();
    if keywords.is_empty() {
        return None;
    }
    Some(format!("%{}%", keywords.join("%")))
}

/// Fetch the entire corpus in `(document_id, chunk_index)` order.
pub async fn full_corpus(store: &dyn ChunkStore) -> Result<Retrieval, RagError> {
    let chunks = store.list_all_chunks().await?;
    Ok(Retrieval {
        chunks,
        scope: RetrievalScope::FullCorpus,
    })
}

/// Select up to `limit` chunks matching the query's keywords.
///
/// `limit == 0` is normalized to [`DEFAULT_SEARCH_LIMIT`]. Keyword-less
/// queries and queries with zero matches fall back to the full corpus,
/// ignoring `limit`.
pub async fn keyword_search(
    store: &dyn ChunkStore,
    query: &str,
    limit: usize,
) -> Result<Retrieval, RagError> {
    let limit = if limit == 0 { DEFAULT_SEARCH_LIMIT } else { limit };

    let Some(pattern) = build_like_pattern(query) else {
        tracing::debug!("query has no keywords, returning full corpus");
        return full_corpus(store).await;
    };

    let chunks = store.search_chunks(&pattern, limit).await?;
    if chunks.is_empty() {
        tracing::debug!(%pattern, "no keyword matches, falling back to full corpus");
        return full_corpus(store).await;
    }

    tracing::debug!(%pattern, matched = chunks.len(), "keyword search matched");
    Ok(Retrieval {
        chunks,
        scope: RetrievalScope::KeywordMatch,
    })
}
