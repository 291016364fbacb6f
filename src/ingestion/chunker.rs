//! Sentence-accumulating text chunker

/// A chunk produced by the splitter, before it is tied to a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkDraft {
    /// Chunk text: accumulated sentences joined with ". ", closed with "."
    pub content: String,
    /// Zero-based position in emission order
    pub chunk_index: u32,
}

/// Splits text into bounded chunks along sentence boundaries.
///
/// Sentences are accumulated until appending the next one would push the
/// accumulation past the target size; the accumulation is then emitted and
/// the overflowing sentence starts the next chunk. The final accumulation is
/// emitted even when under the target size. A sentence longer than the
/// target size becomes a chunk of its own.
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Accepted for interface parity with sliding-window chunkers; this
    /// splitter keeps sentences whole and emits no literal overlap.
    #[allow(dead_code)]
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Split text into chunks. Empty or whitespace-only text yields none;
    /// text without sentence-terminal punctuation yields exactly one.
    pub fn split(&self, text: &str) -> Vec<ChunkDraft> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut chunk_index = 0u32;

        for sentence in split_sentences(text) {
            let joined_len = if current.is_empty() {
                sentence.len()
            } else {
                current.len() + 2 + sentence.len() // ". " joiner
            };

            if joined_len <= self.chunk_size {
                if !current.is_empty() {
                    current.push_str(". ");
                }
                current.push_str(sentence);
            } else {
                if !current.is_empty() {
                    chunks.push(ChunkDraft {
                        content: format!("{}.", current),
                        chunk_index,
                    });
                    chunk_index += 1;
                }
                current = sentence.to_string();
            }
        }

        if !current.is_empty() {
            chunks.push(ChunkDraft {
                content: format!("{}.", current),
                chunk_index,
            });
        }

        chunks
    }
}

/// Split on runs of sentence-terminal punctuation, dropping empty units
fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
