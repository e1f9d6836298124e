//! The RAG pipeline: ingestion on one side, question answering on the other.
//!
//! The pipeline is stateless across calls; every query fetches chunks fresh
//! from the store, assembles a prompt, and invokes the generator once. No
//! caching, no retries. Both collaborators are injected at construction
//! time.

use std::sync::Arc;

use crate::chunker::{chunk_text, ChunkerConfig};
use crate::context::{assemble_context, build_system_prompt};
use crate::generation::AnswerGenerator;
use crate::ingestion::ExtractedText;
use crate::retrieval::{self, Retrieval, DEFAULT_SEARCH_LIMIT};
use crate::stores::{ChunkStore, Document};
use crate::types::RagError;

/// Orchestrates chunking, retrieval, context assembly, and generation.
pub struct RagPipeline {
    store: Arc<dyn ChunkStore>,
    generator: Arc<dyn AnswerGenerator>,
    chunker: ChunkerConfig,
    search_limit: usize,
}

impl RagPipeline {
    /// Create a new builder for constructing a `RagPipeline`.
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Chunk `content` and persist it as a new document.
    ///
    /// The document and its chunks become visible atomically. Content that
    /// is empty after trimming fails with [`RagError::Validation`] before
    /// the store is touched.
    pub async fn ingest(
        &self,
        title: &str,
        filename: &str,
        content: &str,
    ) -> Result<Document, RagError> {
        if title.trim().is_empty() {
            return Err(RagError::Validation("title must not be empty".to_string()));
        }
        if content.trim().is_empty() {
            return Err(RagError::Validation(
                "document content is empty".to_string(),
            ));
        }

        let chunks = chunk_text(content, self.chunker);
        let document = self.store.create_document(title, filename, chunks).await?;

        tracing::info!(
            document_id = document.id,
            title = %document.title,
            chunk_count = document.chunk_count,
            "document ingested"
        );
        Ok(document)
    }

    /// Ingest already-extracted text, applying the title-detection rule.
    pub async fn ingest_extracted(
        &self,
        filename: &str,
        extracted: ExtractedText,
    ) -> Result<Document, RagError> {
        self.ingest(&extracted.title, filename, &extracted.content)
            .await
    }

    /// Answer `question` against the entire corpus.
    pub async fn answer(&self, question: &str) -> Result<String, RagError> {
        let question = validate_question(question)?;
        let retrieval = retrieval::full_corpus(self.store.as_ref()).await?;
        self.generate_from(retrieval, question).await
    }

    /// Answer `question` using keyword retrieval over the corpus.
    ///
    /// Falls back to the full corpus when the question's keywords match
    /// nothing; see [`retrieval::keyword_search`].
    pub async fn answer_with_search(&self, question: &str) -> Result<String, RagError> {
        let question = validate_question(question)?;
        let retrieval =
            retrieval::keyword_search(self.store.as_ref(), question, self.search_limit).await?;
        self.generate_from(retrieval, question).await
    }

    async fn generate_from(
        &self,
        retrieval: Retrieval,
        question: &str,
    ) -> Result<String, RagError> {
        // Retrieval falls back to the full corpus before giving up, so an
        // empty result means the store holds no chunks at all. The generator
        // is never invoked in that case.
        if retrieval.is_empty() {
            return Err(RagError::EmptyCorpus);
        }

        let context = assemble_context(&retrieval);
        let prompt = build_system_prompt(&context);

        tracing::debug!(
            chunks = retrieval.chunks.len(),
            scope = ?retrieval.scope,
            prompt_chars = prompt.chars().count(),
            "invoking answer generator"
        );

        let answer = self.generator.generate(&prompt, question).await?;
        tracing::info!(answer_chars = answer.chars().count(), "answer generated");
        Ok(answer)
    }
}

fn validate_question(question: &str) -> Result<&str, RagError> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err(RagError::Validation(
            "question must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

/// Builder for [`RagPipeline`] instances.
#[derive(Default)]
pub struct RagPipelineBuilder {
    store: Option<Arc<dyn ChunkStore>>,
    generator: Option<Arc<dyn AnswerGenerator>>,
    chunker: Option<ChunkerConfig>,
    search_limit: Option<usize>,
}

impl RagPipelineBuilder {
    /// Set the chunk store.
    ///
    /// This is required before calling [`build()`](Self::build).
    #[must_use]
    pub fn store(mut self, store: Arc<dyn ChunkStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the answer generator.
    ///
    /// This is required before calling [`build()`](Self::build).
    #[must_use]
    pub fn generator(mut self, generator: Arc<dyn AnswerGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Override the chunking window. Defaults to [`ChunkerConfig::default`].
    #[must_use]
    pub fn chunker(mut self, config: ChunkerConfig) -> Self {
        self.chunker = Some(config);
        self
    }

    /// Override the keyword-search result limit. Zero falls back to the
    /// retrieval default.
    #[must_use]
    pub fn search_limit(mut self, limit: usize) -> Self {
        self.search_limit = Some(limit);
        self
    }

    /// Build the [`RagPipeline`].
    ///
    /// # Panics
    ///
    /// Panics if [`store()`](Self::store) or [`generator()`](Self::generator)
    /// was not called.
    pub fn build(self) -> RagPipeline {
        self.try_build()
            .expect("RagPipelineBuilder requires a store and a generator")
    }

    /// Build the [`RagPipeline`], returning `None` if a collaborator is
    /// missing.
    pub fn try_build(self) -> Option<RagPipeline> {
        Some(RagPipeline {
            store: self.store?,
            generator: self.generator?,
            chunker: self.chunker.unwrap_or_default(),
            search_limit: self.search_limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
        })
    }
}
