//! End-to-end pipeline tests over an in-memory SQLite store and a recording
//! mock generator.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;

use docrag::{
    AnswerGenerator, ChunkStore, ChunkerConfig, PlainTextExtractor, RagError, RagPipeline,
    SqliteChunkStore, TextExtractor,
};

/// Generator that records every prompt it receives and replies with a canned
/// answer (or a failure, when configured).
struct RecordingGenerator {
    calls: AtomicUsize,
    prompts: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingGenerator {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_prompt(&self) -> (String, String) {
        self.prompts
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("generator was never invoked")
    }
}

#[async_trait]
impl AnswerGenerator for RecordingGenerator {
    async fn generate(&self, system_prompt: &str, question: &str) -> Result<String, RagError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), question.to_string()));
        if self.fail {
            return Err(RagError::Generation("mock upstream failure".to_string()));
        }
        Ok("mock answer".to_string())
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

async fn pipeline_with(
    generator: Arc<RecordingGenerator>,
) -> (RagPipeline, Arc<SqliteChunkStore>) {
    init_tracing();
    let store = Arc::new(SqliteChunkStore::open_in_memory().await.unwrap());
    let pipeline = RagPipeline::builder()
        .store(store.clone())
        .generator(generator)
        .build();
    (pipeline, store)
}

#[tokio::test]
async fn empty_corpus_fails_before_the_generator_runs() {
    let generator = Arc::new(RecordingGenerator::new());
    let (pipeline, _store) = pipeline_with(generator.clone()).await;

    let err = pipeline.answer("anything in there?").await.unwrap_err();
    assert!(err.is_empty_corpus());

    let err = pipeline
        .answer_with_search("anything in there?")
        .await
        .unwrap_err();
    assert!(err.is_empty_corpus());

    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn full_corpus_answer_sends_every_chunk() {
    let generator = Arc::new(RecordingGenerator::new());
    let (pipeline, _store) = pipeline_with(generator.clone()).await;

    pipeline
        .ingest("Handbook", "handbook.txt", "Vacation policy: 25 days.")
        .await
        .unwrap();
    pipeline
        .ingest("Menu", "menu.txt", "Friday lunch is pizza.")
        .await
        .unwrap();

    let answer = pipeline.answer("How many vacation days?").await.unwrap();
    assert_eq!(answer, "mock answer");

    let (prompt, question) = generator.last_prompt();
    assert_eq!(question, "How many vacation days?");
    assert!(prompt.contains("all available document content"));
    assert!(prompt.contains("[Chunk 1]\nVacation policy: 25 days."));
    assert!(prompt.contains("[Chunk 2]\nFriday lunch is pizza."));
}

#[tokio::test]
async fn keyword_search_narrows_the_context() {
    let generator = Arc::new(RecordingGenerator::new());
    let (pipeline, _store) = pipeline_with(generator.clone()).await;

    pipeline
        .ingest("Handbook", "handbook.txt", "Vacation policy: 25 days.")
        .await
        .unwrap();
    pipeline
        .ingest("Menu", "menu.txt", "Friday lunch is pizza.")
        .await
        .unwrap();

    pipeline.answer_with_search("Vacation policy").await.unwrap();

    let (prompt, _) = generator.last_prompt();
    assert!(prompt.contains("relevant to your question"));
    assert!(prompt.contains("Vacation policy: 25 days."));
    assert!(!prompt.contains("pizza"));
}

#[tokio::test]
async fn unmatched_keywords_fall_back_to_the_whole_corpus() {
    let generator = Arc::new(RecordingGenerator::new());
    let (pipeline, _store) = pipeline_with(generator.clone()).await;

    pipeline
        .ingest("Handbook", "handbook.txt", "Vacation policy: 25 days.")
        .await
        .unwrap();

    // No chunk contains this, yet the query still gets context.
    pipeline.answer_with_search("zzz_no_match").await.unwrap();

    let (prompt, _) = generator.last_prompt();
    assert!(prompt.contains("all available document content"));
    assert!(prompt.contains("Vacation policy: 25 days."));
}

#[tokio::test]
async fn generator_failure_is_wrapped_not_retried() {
    let generator = Arc::new(RecordingGenerator::failing());
    let (pipeline, _store) = pipeline_with(generator.clone()).await;

    pipeline
        .ingest("Doc", "doc.txt", "Some content.")
        .await
        .unwrap();

    let err = pipeline.answer("question?").await.unwrap_err();
    assert!(matches!(err, RagError::Generation(_)));
    assert_eq!(generator.call_count(), 1);
}

#[tokio::test]
async fn blank_inputs_are_rejected_up_front() {
    let generator = Arc::new(RecordingGenerator::new());
    let (pipeline, store) = pipeline_with(generator.clone()).await;

    let err = pipeline.ingest("Doc", "doc.txt", "   ").await.unwrap_err();
    assert!(matches!(err, RagError::Validation(_)));
    assert!(store.list_all_chunks().await.unwrap().is_empty());

    let err = pipeline.answer("   \n ").await.unwrap_err();
    assert!(matches!(err, RagError::Validation(_)));
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn long_documents_are_chunked_with_preserved_order() {
    let generator = Arc::new(RecordingGenerator::new());
    let store = Arc::new(SqliteChunkStore::open_in_memory().await.unwrap());
    let pipeline = RagPipeline::builder()
        .store(store.clone())
        .generator(generator)
        .chunker(ChunkerConfig::new(40, 8))
        .build();

    let content = "One sentence here. Another sentence follows. Then a third one arrives. \
                   And a fourth closes it out.";
    let doc = pipeline.ingest("Long", "long.txt", content).await.unwrap();
    assert!(doc.chunk_count > 1);

    let chunks = store.list_all_chunks().await.unwrap();
    let indices: Vec<usize> = chunks.iter().map(|c| c.chunk_index).collect();
    assert_eq!(indices, (0..doc.chunk_count).collect::<Vec<_>>());
    assert!(chunks.iter().all(|c| !c.text.trim().is_empty()));
}

#[tokio::test]
async fn extracted_upload_flows_end_to_end() {
    let generator = Arc::new(RecordingGenerator::new());
    let (pipeline, store) = pipeline_with(generator.clone()).await;

    let extracted = PlainTextExtractor
        .extract(b"Report\n\nBody text here.")
        .await
        .unwrap();
    let doc = pipeline
        .ingest_extracted("report.docx", extracted)
        .await
        .unwrap();

    assert_eq!(doc.title, "Report");
    let docs = store.list_documents().await.unwrap();
    assert_eq!(docs[0].filename, "report.docx");

    let answer = pipeline.answer_with_search("Body text").await.unwrap();
    assert_eq!(answer, "mock answer");
    let (prompt, _) = generator.last_prompt();
    assert!(prompt.contains("Body text here."));
}
