//! SQLite-backed [`ChunkStore`] using `tokio-rusqlite`.
//!
//! The schema is created at open time: a `documents` table and a `chunks`
//! table with `ON DELETE CASCADE`, so a document and its chunks live and die
//! together. Two pragmas back the store contract: `foreign_keys` for the
//! cascade and `case_sensitive_like` so `search_chunks` matches substrings
//! case-sensitively.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_rusqlite::Connection;

use super::{Chunk, ChunkStore, Document};
use crate::types::RagError;

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS documents (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    filename    TEXT NOT NULL,
    created_at  TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS chunks (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    document_id INTEGER NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    chunk_text  TEXT NOT NULL,
    chunk_index INTEGER NOT NULL,
    created_at  TEXT NOT NULL,
    UNIQUE (document_id, chunk_index)
);
CREATE INDEX IF NOT EXISTS idx_chunks_document ON chunks(document_id);
";

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|err| {
            tracing::warn!(raw, %err, "unparseable created_at, substituting epoch");
            DateTime::default()
        })
}

/// SQLite store for documents and their chunks.
#[derive(Clone)]
pub struct SqliteChunkStore {
    conn: Connection,
}

impl SqliteChunkStore {
    /// Open (or create) a store at `path` and apply the schema.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RagError> {
        let conn = Connection::open(path)
            .await
            .map_err(|err| RagError::Storage(err.to_string()))?;
        Self::initialize(conn).await
    }

    /// Open an in-memory store. Used by tests and demos.
    pub async fn open_in_memory() -> Result<Self, RagError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|err| RagError::Storage(err.to_string()))?;
        Self::initialize(conn).await
    }

    async fn initialize(conn: Connection) -> Result<Self, RagError> {
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA foreign_keys = ON;\n\
                 PRAGMA case_sensitive_like = ON;",
            )
            .map_err(tokio_rusqlite::Error::Rusqlite)?;
            conn.execute_batch(SCHEMA)
                .map_err(tokio_rusqlite::Error::Rusqlite)?;
            Ok(())
        })
        .await
        .map_err(|err| RagError::Storage(err.to_string()))?;
        Ok(Self { conn })
    }

    /// Underlying connection, for queries not covered by [`ChunkStore`].
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[async_trait]
impl ChunkStore for SqliteChunkStore {
    async fn create_document(
        &self,
        title: &str,
        filename: &str,
        chunks: Vec<String>,
    ) -> Result<Document, RagError> {
        let title = title.to_string();
        let filename = filename.to_string();
        let created_at = Utc::now();
        let stamp = created_at.to_rfc3339();
        let chunk_count = chunks.len();

        let (title_for_insert, filename_for_insert) = (title.clone(), filename.clone());
        let id = self
            .conn
            .call(move |conn| {
                let (title, filename) = (title_for_insert, filename_for_insert);
                let tx = conn.transaction().map_err(tokio_rusqlite::Error::Rusqlite)?;
                tx.execute(
                    "INSERT INTO documents (title, filename, created_at) VALUES (?1, ?2, ?3)",
                    (title.as_str(), filename.as_str(), stamp.as_str()),
                )
                .map_err(tokio_rusqlite::Error::Rusqlite)?;
                let doc_id = tx.last_insert_rowid();

                for (index, text) in chunks.iter().enumerate() {
                    tx.execute(
                        "INSERT INTO chunks (document_id, chunk_text, chunk_index, created_at) \
                         VALUES (?1, ?2, ?3, ?4)",
                        (doc_id, text.as_str(), index as i64, stamp.as_str()),
                    )
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;
                }

                tx.commit().map_err(tokio_rusqlite::Error::Rusqlite)?;
                Ok(doc_id)
            })
            .await
            .map_err(|err| RagError::Storage(err.to_string()))?;

        tracing::debug!(document_id = id, chunk_count, "document persisted");

        Ok(Document {
            id,
            title,
            filename,
            chunk_count,
            created_at,
        })
    }

    async fn list_all_chunks(&self) -> Result<Vec<Chunk>, RagError> {
        self.conn
            .call(|conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT id, document_id, chunk_text, chunk_index, created_at \
                         FROM chunks ORDER BY document_id, chunk_index",
                    )
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;

                let rows = stmt
                    .query_map([], |row| {
                        Ok(Chunk {
                            id: row.get(0)?,
                            document_id: row.get(1)?,
                            text: row.get(2)?,
                            chunk_index: row.get::<_, i64>(3)? as usize,
                            created_at: parse_timestamp(&row.get::<_, String>(4)?),
                        })
                    })
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;

                let mut results = Vec::new();
                for row in rows {
                    results.push(row.map_err(tokio_rusqlite::Error::Rusqlite)?);
                }
                Ok(results)
            })
            .await
            .map_err(|err| RagError::Storage(err.to_string()))
    }

    async fn search_chunks(&self, pattern: &str, limit: usize) -> Result<Vec<Chunk>, RagError> {
        let pattern = pattern.to_string();
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT id, document_id, chunk_text, chunk_index, created_at \
                         FROM chunks WHERE chunk_text LIKE ?1 ESCAPE '\\' \
                         ORDER BY document_id, chunk_index LIMIT ?2",
                    )
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;

                let rows = stmt
                    .query_map((pattern.as_str(), limit as i64), |row| {
                        Ok(Chunk {
                            id: row.get(0)?,
                            document_id: row.get(1)?,
                            text: row.get(2)?,
                            chunk_index: row.get::<_, i64>(3)? as usize,
                            created_at: parse_timestamp(&row.get::<_, String>(4)?),
                        })
                    })
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;

                let mut results = Vec::new();
                for row in rows {
                    results.push(row.map_err(tokio_rusqlite::Error::Rusqlite)?);
                }
                Ok(results)
            })
            .await
            .map_err(|err| RagError::Storage(err.to_string()))
    }

    async fn list_documents(&self) -> Result<Vec<Document>, RagError> {
        self.conn
            .call(|conn| {
                let mut stmt = conn
                    .prepare(
                        "SELECT d.id, d.title, d.filename, d.created_at, COUNT(c.id) \
                         FROM documents d LEFT JOIN chunks c ON c.document_id = d.id \
                         GROUP BY d.id ORDER BY d.id",
                    )
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;

                let rows = stmt
                    .query_map([], |row| {
                        Ok(Document {
                            id: row.get(0)?,
                            title: row.get(1)?,
                            filename: row.get(2)?,
                            created_at: parse_timestamp(&row.get::<_, String>(3)?),
                            chunk_count: row.get::<_, i64>(4)? as usize,
                        })
                    })
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;

                let mut results = Vec::new();
                for row in rows {
                    results.push(row.map_err(tokio_rusqlite::Error::Rusqlite)?);
                }
                Ok(results)
            })
            .await
            .map_err(|err| RagError::Storage(err.to_string()))
    }

    async fn delete_document(&self, id: i64) -> Result<bool, RagError> {
        self.conn
            .call(move |conn| {
                let deleted = conn
                    .execute("DELETE FROM documents WHERE id = ?1", [id])
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;
                Ok(deleted > 0)
            })
            .await
            .map_err(|err| RagError::Storage(err.to_string()))
    }

    async fn count_chunks(&self) -> Result<usize, RagError> {
        self.conn
            .call(|conn| {
                let count: i64 = conn
                    .query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))
                    .map_err(tokio_rusqlite::Error::Rusqlite)?;
                Ok(count as usize)
            })
            .await
            .map_err(|err| RagError::Storage(err.to_string()))
    }
}
