//! Top-k retrieval over the chunk corpus.
//!
//! A retrieval is a pure request/response operation: embed the query (one
//! call, batch size 1), score every chunk with cosine similarity, and return
//! the k best. The corpus is never mutated and nothing is cached.

use crate::corpus::{Chunk, Corpus};
use crate::embedding::Embedder;
use crate::error::{Result, SvarError};
use std::sync::Arc;
use tracing::{debug, instrument};

/// A chunk with its similarity score against a query.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The matched chunk (owned copy, callers may mutate freely).
    pub chunk: Chunk,
    /// Cosine similarity score (higher is better).
    pub score: f32,
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 when the vectors differ in length or either has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Embedding-based top-k retriever.
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
}

impl Retriever {
    /// Create a retriever with the given embedder.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Return the `top_k` chunks most similar to `query`, best first.
    ///
    /// `top_k` is clamped to the corpus size. Ties keep corpus order.
    /// Fails with `InvalidInput` on an empty corpus, an empty query, or
    /// `top_k == 0`; embedding failures propagate unchanged.
    #[instrument(skip(self, corpus), fields(corpus_len = corpus.len(), top_k))]
    pub async fn retrieve(
        &self,
        corpus: &Corpus,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        if corpus.is_empty() {
            return Err(SvarError::InvalidInput("Corpus is empty".to_string()));
        }
        if query.trim().is_empty() {
            return Err(SvarError::InvalidInput("Query is empty".to_string()));
        }
        if top_k == 0 {
            return Err(SvarError::InvalidInput(
                "top_k must be at least 1".to_string(),
            ));
        }

        let query_embedding = self.embedder.embed(query).await?;

        let mut results: Vec<ScoredChunk> = corpus
            .chunks()
            .iter()
            .map(|chunk| ScoredChunk {
                score: cosine_similarity(&query_embedding, &chunk.embedding),
                chunk: chunk.clone(),
            })
            .collect();

        // sort_by is stable, so equal scores keep corpus order.
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k.min(corpus.len()));

        debug!("Retrieved {} chunks", results.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Deterministic embedder that returns a fixed vector for every query.
    struct FixedEmbedder {
        vector: Vec<f32>,
    }

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(self.vector.clone())
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| self.vector.clone()).collect())
        }

        fn dimensions(&self) -> usize {
            self.vector.len()
        }
    }

    /// Embedder that always fails, for propagation tests.
    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(SvarError::Upstream("connection refused".to_string()))
        }

        async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(SvarError::Upstream("connection refused".to_string()))
        }

        fn dimensions(&self) -> usize {
            0
        }
    }

    fn chunk(id: u64, number: u32, title: &str, embedding: Vec<f32>) -> Chunk {
        Chunk {
            id,
            video_number: number,
            title: title.to_string(),
            start_seconds: 0.0,
            end_seconds: 30.0,
            text: format!("chunk {}", id),
            embedding,
        }
    }

    fn retriever(query_vector: Vec<f32>) -> Retriever {
        Retriever::new(Arc::new(FixedEmbedder {
            vector: query_vector,
        }))
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let zero = vec![0.0, 0.0];
        let q = vec![1.0, 0.0];
        assert_eq!(cosine_similarity(&zero, &q), 0.0);
        assert_eq!(cosine_similarity(&q, &zero), 0.0);
    }

    #[test]
    fn test_cosine_similarity_length_mismatch() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0]), 0.0);
    }

    #[tokio::test]
    async fn test_retrieve_returns_exactly_k_sorted() {
        let corpus = Corpus::from_chunks(vec![
            chunk(1, 1, "a", vec![1.0, 0.0]),
            chunk(2, 1, "b", vec![0.8, 0.2]),
            chunk(3, 1, "c", vec![0.0, 1.0]),
            chunk(4, 1, "d", vec![0.5, 0.5]),
        ]);

        let results = retriever(vec![1.0, 0.0])
            .retrieve(&corpus, "query", 3)
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn test_identical_embedding_ranks_first_with_score_one() {
        let corpus = Corpus::from_chunks(vec![
            chunk(1, 1, "other", vec![0.2, 0.9]),
            chunk(2, 1, "exact", vec![3.0, 4.0]),
        ]);

        let results = retriever(vec![3.0, 4.0])
            .retrieve(&corpus, "query", 2)
            .await
            .unwrap();

        assert_eq!(results[0].chunk.id, 2);
        assert!((results[0].score - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_k_larger_than_corpus_clamps() {
        let corpus = Corpus::from_chunks(vec![
            chunk(1, 1, "a", vec![1.0, 0.0]),
            chunk(2, 1, "b", vec![0.0, 1.0]),
        ]);

        let results = retriever(vec![1.0, 0.0])
            .retrieve(&corpus, "query", 10)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_ties_preserve_corpus_order() {
        // Same vector scaled: identical cosine similarity.
        let corpus = Corpus::from_chunks(vec![
            chunk(1, 1, "first", vec![1.0, 0.0]),
            chunk(2, 1, "second", vec![2.0, 0.0]),
            chunk(3, 1, "third", vec![0.5, 0.0]),
        ]);

        let results = retriever(vec![1.0, 0.0])
            .retrieve(&corpus, "query", 3)
            .await
            .unwrap();

        let ids: Vec<u64> = results.iter().map(|r| r.chunk.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_zero_embedding_chunk_scores_zero() {
        let corpus = Corpus::from_chunks(vec![
            chunk(1, 1, "zero", vec![0.0, 0.0]),
            chunk(2, 1, "hit", vec![1.0, 0.0]),
        ]);

        let results = retriever(vec![1.0, 0.0])
            .retrieve(&corpus, "query", 2)
            .await
            .unwrap();

        assert_eq!(results[0].chunk.id, 2);
        assert_eq!(results[1].score, 0.0);
    }

    #[tokio::test]
    async fn test_join_vs_select_example() {
        let corpus = Corpus::from_chunks(vec![
            chunk(1, 11, "JOIN syntax", vec![1.0, 0.0]),
            chunk(2, 5, "SELECT basics", vec![0.0, 1.0]),
        ]);

        let results = retriever(vec![1.0, 0.0])
            .retrieve(&corpus, "How do I use SQL JOIN?", 1)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.id, 1);
        assert!((results[0].score - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_empty_corpus_is_invalid_input() {
        let corpus = Corpus::default();
        let err = retriever(vec![1.0])
            .retrieve(&corpus, "query", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, SvarError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_empty_query_is_invalid_input() {
        let corpus = Corpus::from_chunks(vec![chunk(1, 1, "a", vec![1.0])]);
        let err = retriever(vec![1.0])
            .retrieve(&corpus, "   ", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, SvarError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_zero_k_is_invalid_input() {
        let corpus = Corpus::from_chunks(vec![chunk(1, 1, "a", vec![1.0])]);
        let err = retriever(vec![1.0])
            .retrieve(&corpus, "query", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, SvarError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_embedder_failure_propagates() {
        let corpus = Corpus::from_chunks(vec![chunk(1, 1, "a", vec![1.0])]);
        let retriever = Retriever::new(Arc::new(FailingEmbedder));
        let err = retriever.retrieve(&corpus, "query", 1).await.unwrap_err();
        assert!(matches!(err, SvarError::Upstream(_)));
    }
}
