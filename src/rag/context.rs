//! Context building for RAG responses.

use super::ContextChunk;
use crate::corpus::Corpus;
use crate::embedding::Embedder;
use crate::error::Result;
use crate::links::VideoLibrary;
use crate::retrieval::Retriever;
use serde::Serialize;
use std::sync::Arc;

/// Builds context from retrieval results for RAG.
pub struct ContextBuilder {
    corpus: Arc<Corpus>,
    retriever: Retriever,
    library: VideoLibrary,
    max_chunks: usize,
    min_score: f32,
}

impl ContextBuilder {
    /// Create a new context builder.
    pub fn new(corpus: Arc<Corpus>, embedder: Arc<dyn Embedder>, library: VideoLibrary) -> Self {
        Self {
            corpus,
            retriever: Retriever::new(embedder),
            library,
            max_chunks: 5,
            min_score: 0.0,
        }
    }

    /// Set the maximum number of context chunks.
    pub fn with_max_chunks(mut self, max_chunks: usize) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    /// Set the minimum similarity score threshold.
    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Retrieve the most relevant chunks for a query as display-ready
    /// context, dropping anything below the score floor.
    pub async fn build(&self, query: &str) -> Result<Vec<ContextChunk>> {
        let results = self
            .retriever
            .retrieve(&self.corpus, query, self.max_chunks)
            .await?;

        let chunks = results
            .into_iter()
            .filter(|r| r.score >= self.min_score)
            .map(|r| ContextChunk::from_scored(r, &self.library))
            .collect();

        Ok(chunks)
    }
}

/// Chunk fields that go into the prompt, matching what the answer should
/// cite (video number + timestamps).
#[derive(Serialize)]
struct PromptRecord<'a> {
    title: &'a str,
    number: u32,
    start: f64,
    end: f64,
    text: &'a str,
}

/// Serialize context chunks as JSON records for the prompt.
pub fn format_context_for_prompt(chunks: &[ContextChunk]) -> String {
    let records: Vec<PromptRecord<'_>> = chunks
        .iter()
        .map(|c| PromptRecord {
            title: &c.title,
            number: c.video_number,
            start: c.start_seconds,
            end: c.end_seconds,
            text: &c.text,
        })
        .collect();

    serde_json::to_string_pretty(&records).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_chunk(number: u32, title: &str, score: f32) -> ContextChunk {
        ContextChunk {
            video_number: number,
            title: title.to_string(),
            timestamp: "00:10".to_string(),
            start_seconds: 10.0,
            end_seconds: 40.0,
            text: "example text".to_string(),
            score,
            url: None,
        }
    }

    #[test]
    fn test_prompt_context_is_json_records() {
        let chunks = vec![context_chunk(11, "SQL Joins", 0.9)];
        let rendered = format_context_for_prompt(&chunks);

        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed[0]["number"], 11);
        assert_eq!(parsed[0]["title"], "SQL Joins");
        assert_eq!(parsed[0]["start"], 10.0);
        // Score is display-only, not part of the prompt.
        assert!(parsed[0].get("score").is_none());
    }
}
