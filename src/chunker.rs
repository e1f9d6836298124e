//! Boundary-aware sliding-window text chunking.
//!
//! Splits a document's content into overlapping segments measured in Unicode
//! code points. Windows that would sever a sentence near their end are
//! truncated at the last sentence-terminal character past the window
//! midpoint, so a chunk is never shorter than roughly half the configured
//! size. Adjacent chunks share up to [`ChunkerConfig::overlap`] code points
//! of the original text.

/// Default window size in code points.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default overlap between adjacent windows in code points.
pub const DEFAULT_OVERLAP: usize = 200;

/// Characters treated as sentence terminals for boundary snapping.
const SENTENCE_TERMINALS: [char; 7] = ['。', '！', '？', '\n', '.', '!', '?'];

/// Window parameters for [`chunk_text`].
///
/// Values are normalized before use: a zero `chunk_size` falls back to
/// [`DEFAULT_CHUNK_SIZE`], and an `overlap` that would prevent forward
/// progress (`overlap >= chunk_size`) is clamped to `chunk_size / 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkerConfig {
    /// Maximum chunk length in code points.
    pub chunk_size: usize,
    /// Number of code points shared between adjacent chunks.
    pub overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

impl ChunkerConfig {
    /// Create a config from raw values; normalization happens at chunk time.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Apply the defaulting and clamping rules.
    pub fn normalized(self) -> Self {
        let chunk_size = if self.chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            self.chunk_size
        };
        let overlap = if self.overlap >= chunk_size {
            chunk_size / 4
        } else {
            self.overlap
        };
        Self {
            chunk_size,
            overlap,
        }
    }
}

fn is_sentence_terminal(c: char) -> bool {
    SENTENCE_TERMINALS.contains(&c)
}

/// Split `text` into an ordered sequence of overlapping chunks.
///
/// The input is trimmed first; empty or whitespace-only input yields an
/// empty vector. Text that fits in a single window is returned as one chunk.
/// Otherwise a sliding window advances through the code points, snapping
/// each non-final window back to the last sentence terminal found past the
/// window midpoint, and the next window starts `overlap` code points before
/// the previous window's actual end, always advancing by at least one code
/// point. Every emitted chunk is trimmed and non-empty.
pub fn chunk_text(text: &str, config: ChunkerConfig) -> Vec<String> {
    let ChunkerConfig {
        chunk_size,
        overlap,
    } = config.normalized();

    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let text_len = chars.len();
    if text_len <= chunk_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < text_len {
        let mut end = (start + chunk_size).min(text_len);

        // Snap a non-final window back to the last sentence terminal, but
        // only when it sits past the midpoint so chunks stay at least
        // chunk_size / 2 long.
        if end < text_len {
            let window = &chars[start..end];
            if let Some(pos) = window.iter().rposition(|c| is_sentence_terminal(*c)) {
                if pos > chunk_size / 2 {
                    end = start + pos + 1;
                }
            }
        }

        let piece: String = chars[start..end].iter().collect();
        let piece = piece.trim();
        if !piece.is_empty() {
            chunks.push(piece.to_string());
        }

        // The final window covers the rest of the text; stepping back by
        // the overlap from here would never advance again.
        if end == text_len {
            break;
        }
        // Snapping can pull `end` back to within `overlap` of the current
        // start; the floor keeps the window advancing.
        let next = end.saturating_sub(overlap);
        start = next.max(start + 1);
    }

    chunks
}
