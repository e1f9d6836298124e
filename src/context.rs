//! Deterministic prompt assembly for the answer generator.
//!
//! Rendering is purely mechanical: a header announcing the retrieval scope,
//! then each chunk under an enumerated label with its text verbatim. The
//! instruction template wrapped around the context is a static constant and
//! identical for every query.

use crate::retrieval::{Retrieval, RetrievalScope};

const FULL_CORPUS_HEADER: &str = "The following is all available document content:";
const KEYWORD_HEADER: &str = "The following document content is relevant to your question:";

const INSTRUCTIONS: &str = "\
You are a document question-answering assistant. Your task is to answer the \
user's question based on the provided document content.

Follow these rules:
1. Answer only from the provided document content.
2. If the documents do not contain the relevant information, tell the user so explicitly.
3. Be accurate, concise, and well organized.
4. Where possible, cite the document content that supports your answer.";

/// Render the retrieved chunks into a context block.
///
/// Labels are enumerated from 1 in retrieval order, independent of each
/// chunk's stored index; chunk text is emitted unmodified.
pub fn assemble_context(retrieval: &Retrieval) -> String {
    let header = match retrieval.scope {
        RetrievalScope::FullCorpus => FULL_CORPUS_HEADER,
        RetrievalScope::KeywordMatch => KEYWORD_HEADER,
    };

    let mut out = String::new();
    out.push_str(header);
    out.push_str("\n\n");

    for (i, chunk) in retrieval.chunks.iter().enumerate() {
        out.push_str(&format!("[Chunk {}]\n{}\n\n", i + 1, chunk.text));
    }

    out
}

/// Wrap a rendered context block in the fixed instruction template.
pub fn build_system_prompt(context: &str) -> String {
    format!("{INSTRUCTIONS}\n\n{context}")
}
