//! Storage backends for documents and their ordered chunks.
//!
//! The [`ChunkStore`] trait abstracts over persistence so the retrieval
//! pipeline can run against any backend. The contract every implementation
//! must honor:
//!
//! - `create_document` is atomic: either the document and all its chunks
//!   become visible together, or nothing does.
//! - Chunk indices are contiguous zero-based positions assigned in the order
//!   the chunk texts were given.
//! - `list_all_chunks` and `search_chunks` return rows ordered by
//!   `(document_id, chunk_index)`.
//! - `search_chunks` applies case-sensitive literal substring semantics to
//!   the given `LIKE`-style pattern.
//!
//! # Supported backends
//!
//! - [`sqlite::SqliteChunkStore`] - bundled SQLite via `tokio-rusqlite`

pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::RagError;

pub use sqlite::SqliteChunkStore;

/// An ingested document. Owns its chunks; deleting a document deletes them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned identifier.
    pub id: i64,
    /// Title detected at extraction time; never empty.
    pub title: String,
    /// Original source file name.
    pub filename: String,
    /// Number of chunks created with this document.
    pub chunk_count: usize,
    pub created_at: DateTime<Utc>,
}

/// One retrieval unit of a document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Chunk {
    /// Store-assigned identifier.
    pub id: i64,
    /// Owning document.
    pub document_id: i64,
    /// Trimmed, non-empty text segment.
    pub text: String,
    /// Zero-based position among the owning document's chunks.
    pub chunk_index: usize,
    pub created_at: DateTime<Utc>,
}

/// Persistence seam for documents and chunks.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Atomically create a document together with its full chunk list.
    ///
    /// Chunk indices `0..chunks.len()` are assigned in the given order. On
    /// failure no partial document is left visible.
    async fn create_document(
        &self,
        title: &str,
        filename: &str,
        chunks: Vec<String>,
    ) -> Result<Document, RagError>;

    /// All chunks in the store, ordered by `(document_id, chunk_index)`.
    async fn list_all_chunks(&self) -> Result<Vec<Chunk>, RagError>;

    /// Chunks whose text matches `pattern` (case-sensitive `LIKE` semantics,
    /// `\` as the escape character), ordered by `(document_id, chunk_index)`
    /// and truncated to `limit`.
    async fn search_chunks(&self, pattern: &str, limit: usize) -> Result<Vec<Chunk>, RagError>;

    /// All documents, ordered by id, each carrying its chunk count.
    async fn list_documents(&self) -> Result<Vec<Document>, RagError>;

    /// Delete a document and, by cascade, all of its chunks. Returns `true`
    /// if a document was deleted.
    async fn delete_document(&self, id: i64) -> Result<bool, RagError>;

    /// Total number of chunks across all documents.
    async fn count_chunks(&self) -> Result<usize, RagError>;
}
