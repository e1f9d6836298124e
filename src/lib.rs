//! ```text
//! Ingestion:
//!   raw bytes ──► ingestion::TextExtractor ──► (title, content)
//!                                   │
//!   content ──► chunker::chunk_text ──► ordered overlapping chunks
//!                                   │
//!   chunks ──► stores::ChunkStore::create_document (atomic)
//!
//! Query:
//!   question ──► retrieval::keyword_search / full_corpus ──► Retrieval
//!             ──► context::assemble_context ──► system prompt
//!             ──► generation::AnswerGenerator ──► answer
//! ```
//!
//! The [`pipeline::RagPipeline`] wires the stages together; both the store
//! and the generator are injected collaborators.

pub mod chunker;
pub mod context;
pub mod generation;
pub mod ingestion;
pub mod pipeline;
pub mod retrieval;
pub mod stores;
pub mod types;

pub use chunker::{chunk_text, ChunkerConfig};
pub use generation::{AnswerGenerator, OpenAiChatGenerator};
pub use ingestion::{ExtractedText, PlainTextExtractor, TextExtractor};
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use retrieval::{Retrieval, RetrievalScope};
pub use stores::{Chunk, ChunkStore, Document, SqliteChunkStore};
pub use types::RagError;
