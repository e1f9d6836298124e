//! Turning extracted document text into a title and chunkable content.

pub mod extract;

pub use extract::{PlainTextExtractor, TextExtractor};

/// Placeholder title for documents whose text has no non-blank line.
pub const UNTITLED: &str = "Untitled document";

/// Title and content as produced by a [`TextExtractor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub title: String,
    pub content: String,
}

/// Split extracted text into a title and the remaining content.
///
/// The first non-blank line becomes the title and the lines after it the
/// content. When no non-blank line exists the placeholder title is used and
/// the whole text becomes the content; when the title is the only non-blank
/// text, it doubles as the content so the document still has a body to chunk.
pub fn split_title_content(text: &str) -> ExtractedText {
    let lines: Vec<&str> = text.lines().collect();

    let mut title = None;
    let mut content_start = 0;
    for (i, line) in lines.iter().enumerate() {
        let line = line.trim();
        if !line.is_empty() {
            title = Some(line.to_string());
            content_start = i + 1;
            break;
        }
    }

    match title {
        None => ExtractedText {
            title: UNTITLED.to_string(),
            content: text.to_string(),
        },
        Some(title) => {
            let content = lines[content_start.min(lines.len())..]
                .join("\n")
                .trim()
                .to_string();
            let content = if content.is_empty() {
                title.clone()
            } else {
                content
            };
            ExtractedText { title, content }
        }
    }
}
