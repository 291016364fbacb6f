//! Lexical relevance scoring over stored chunks

use crate::config::RetrievalConfig;
use crate::types::document::Chunk;

/// A chunk paired with the name of its owning document
#[derive(Debug, Clone)]
pub struct AttributedChunk {
    pub chunk: Chunk,
    pub document_name: String,
}

/// A ranked chunk with its relevance score
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub document_name: String,
    /// Relevance in [0, 1]
    pub score: f32,
}

/// Ranks chunks against a question by lexical token overlap.
///
/// Each query token found as a case-insensitive substring of a chunk adds a
/// fixed increment, clamped to 1.0. Deterministic and pure: identical input
/// always produces identical scores and ordering. A stand-in for embedding
/// similarity behind the same interface.
pub struct RelevanceScorer {
    top_k: usize,
    score_threshold: f32,
    token_weight: f32,
}

impl RelevanceScorer {
    /// Create a scorer from retrieval configuration
    pub fn new(config: &RetrievalConfig) -> Self {
        Self {
            top_k: config.top_k,
            score_threshold: config.score_threshold,
            token_weight: config.token_weight,
        }
    }

    /// Rank chunks by relevance to the question. Returns at most `top_k`
    /// chunks scoring strictly above the threshold, descending by score,
    /// ties kept in input order.
    pub fn rank(&self, question: &str, chunks: &[AttributedChunk]) -> Vec<ScoredChunk> {
        let tokens = tokenize(question);

        let mut scored: Vec<ScoredChunk> = chunks
            .iter()
            .map(|attributed| {
                let content = attributed.chunk.content.to_lowercase();
                let mut score = 0.0f32;
                for token in &tokens {
                    if content.contains(token.as_str()) {
                        score += self.token_weight;
                    }
                }
                ScoredChunk {
                    chunk: attributed.chunk.clone(),
                    document_name: attributed.document_name.clone(),
                    score: score.min(1.0),
                }
            })
            .collect();

        scored.retain(|s| s.score > self.score_threshold);
        // Stable sort keeps the original chunk order for equal scores.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(self.top_k);
        scored
    }
}

/// Lowercase whitespace-delimited tokens, with punctuation trimmed from the
/// edges so "sky?" still matches "sky".
fn tokenize(question: &str) -> Vec<String> {
    question
        .to_lowercase()
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|token| !token.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn chunk_set(contents: &[&str]) -> Vec<AttributedChunk> {
        let document_id = Uuid::new_v4();
        contents
            .iter()
            .enumerate()
            .map(|(i, content)| AttributedChunk {
                chunk: Chunk::new(document_id, content.to_string(), i as u32),
                document_name: "facts.txt".to_string(),
            })
            .collect()
    }

    fn scorer() -> RelevanceScorer {
        RelevanceScorer::new(&RetrievalConfig::default())
    }

    #[test]
    fn question_ranks_the_matching_chunk_first() {
        let chunks = chunk_set(&["The sky is blue.", "Grass is green.", "Water is wet."]);
        let ranked = scorer().rank("What color is the sky?", &chunks);

        assert!(!ranked.is_empty());
        assert!(ranked[0].chunk.content.contains("sky"));
        assert!(ranked[0].chunk.content.contains("blue"));
    }

    #[test]
    fn scoring_is_deterministic() {
        let chunks = chunk_set(&["The sky is blue.", "Grass is green.", "Water is wet."]);
        let first = scorer().rank("What color is the sky?", &chunks);
        let second = scorer().rank("What color is the sky?", &chunks);

        let scores: Vec<f32> = first.iter().map(|s| s.score).collect();
        let again: Vec<f32> = second.iter().map(|s| s.score).collect();
        assert_eq!(scores, again);

        let order: Vec<u32> = first.iter().map(|s| s.chunk.chunk_index).collect();
        let order_again: Vec<u32> = second.iter().map(|s| s.chunk.chunk_index).collect();
        assert_eq!(order, order_again);
    }

    #[test]
    fn chunks_at_or_below_the_threshold_are_dropped() {
        // Two matching tokens score exactly 0.2, which does not exceed the
        // 0.2 threshold.
        let chunks = chunk_set(&["alpha beta", "alpha beta gamma"]);
        let ranked = scorer().rank("alpha beta gamma", &chunks);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].chunk.chunk_index, 1);
    }

    #[test]
    fn never_more_than_top_k_results() {
        let contents: Vec<String> = (0..10)
            .map(|i| format!("alpha beta gamma delta chunk number {}", i))
            .collect();
        let refs: Vec<&str> = contents.iter().map(String::as_str).collect();
        let chunks = chunk_set(&refs);

        let ranked = scorer().rank("alpha beta gamma delta", &chunks);
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn ties_keep_original_chunk_order() {
        let chunks = chunk_set(&[
            "alpha beta gamma one",
            "alpha beta gamma two",
            "alpha beta gamma three",
        ]);
        let ranked = scorer().rank("alpha beta gamma", &chunks);

        let order: Vec<u32> = ranked.iter().map(|s| s.chunk.chunk_index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn score_is_clamped_to_one() {
        let many_tokens = "a b c d e f g h i j k l m n o p q r s t";
        let chunks = chunk_set(&["abcdefghijklmnopqrst"]);
        let ranked = scorer().rank(many_tokens, &chunks);

        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].score <= 1.0);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let chunks = chunk_set(&["THE SKY IS BLUE TODAY."]);
        let ranked = scorer().rank("what color is the sky?", &chunks);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn empty_inputs_rank_nothing() {
        assert!(scorer().rank("anything at all", &[]).is_empty());

        let chunks = chunk_set(&["The sky is blue."]);
        assert!(scorer().rank("", &chunks).is_empty());
    }
}
