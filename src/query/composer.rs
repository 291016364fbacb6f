//! Templated answer assembly from ranked sources

use super::scorer::ScoredChunk;

/// Fixed reply when retrieval finds nothing above the relevance cutoff
pub const NO_SOURCES_ANSWER: &str = "I couldn't find relevant information in your documents \
to answer this question. Please make sure your documents contain information related to \
your query.";

/// Builds the answer text for a question from its ranked sources.
///
/// This is a template fill. A deployment backed by a language model would
/// swap the implementation behind the same signature: question and ranked
/// chunks in, answer text out.
pub struct AnswerComposer;

impl AnswerComposer {
    /// Compose an answer for the question from the ranked sources
    pub fn compose(question: &str, sources: &[ScoredChunk]) -> String {
        if sources.is_empty() {
            return NO_SOURCES_ANSWER.to_string();
        }

        let min = sources.iter().map(|s| s.score).fold(f32::INFINITY, f32::min);
        let max = sources.iter().map(|s| s.score).fold(f32::NEG_INFINITY, f32::max);

        format!(
            "Based on your uploaded documents, here's what I found regarding \"{question}\":\n\n\
             The information from your documents indicates that this topic is covered across \
             {count} relevant section(s). The key insights from your documents suggest \
             comprehensive coverage of the subject matter.\n\n\
             The documents provide detailed explanations and practical examples that directly \
             address your question.\n\n\
             The sources show strong relevance to your inquiry, with relevance scores ranging \
             from {min_pct}% to {max_pct}%.",
            question = question,
            count = sources.len(),
            min_pct = (min * 100.0).round() as u32,
            max_pct = (max * 100.0).round() as u32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::document::Chunk;
    use uuid::Uuid;

    fn source(content: &str, score: f32) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk::new(Uuid::new_v4(), content.to_string(), 0),
            document_name: "facts.txt".to_string(),
            score,
        }
    }

    #[test]
    fn no_sources_yields_the_fixed_message() {
        let answer = AnswerComposer::compose("Where is the treasure?", &[]);
        assert_eq!(answer, NO_SOURCES_ANSWER);
    }

    #[test]
    fn answer_references_question_count_and_score_range() {
        let sources = vec![source("The sky is blue.", 0.3), source("Skies are vast.", 0.6)];
        let answer = AnswerComposer::compose("What color is the sky?", &sources);

        assert!(answer.contains("What color is the sky?"));
        assert!(answer.contains("2 relevant section(s)"));
        assert!(answer.contains("from 30% to 60%"));
    }

    #[test]
    fn single_source_range_collapses() {
        let sources = vec![source("The sky is blue.", 0.5)];
        let answer = AnswerComposer::compose("sky?", &sources);
        assert!(answer.contains("from 50% to 50%"));
    }
}
