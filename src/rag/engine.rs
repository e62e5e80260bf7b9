//! RAG answer generation.

use super::{context::format_context_for_prompt, ContextBuilder, ContextChunk};
use crate::config::RagPrompts;
use crate::error::Result;
use crate::generation::Generator;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// RAG engine for question answering.
pub struct RagEngine {
    generator: Arc<dyn Generator>,
    context_builder: ContextBuilder,
    prompts: RagPrompts,
}

impl RagEngine {
    /// Create a new RAG engine.
    pub fn new(context_builder: ContextBuilder, generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            context_builder,
            prompts: RagPrompts::default(),
        }
    }

    /// Set custom prompts.
    pub fn with_prompts(mut self, prompts: RagPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Ask a single question and get an answer with sources.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn ask(&self, question: &str) -> Result<RagResponse> {
        info!("Processing question: {}", question);

        let context_chunks = self.context_builder.build(question).await?;

        if context_chunks.is_empty() {
            return Ok(RagResponse {
                answer: "I couldn't find any relevant information in the video library for this question."
                    .to_string(),
                sources: Vec::new(),
            });
        }

        let context_text = format_context_for_prompt(&context_chunks);

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), question.to_string());
        vars.insert("context".to_string(), context_text);

        let prompt = RagPrompts::render(&self.prompts.user, &vars);

        let answer = self.generator.generate(&prompt).await?;

        debug!("Generated response with {} sources", context_chunks.len());

        Ok(RagResponse {
            answer,
            sources: context_chunks,
        })
    }
}

/// A RAG response with answer and sources.
#[derive(Debug, Clone)]
pub struct RagResponse {
    /// The generated answer.
    pub answer: String,
    /// Source chunks used for the answer.
    pub sources: Vec<ContextChunk>,
}

impl RagResponse {
    /// Format the response for display.
    pub fn format_for_display(&self) -> String {
        let mut output = self.answer.clone();

        if !self.sources.is_empty() {
            output.push_str("\n\n--- Sources ---\n");
            for source in &self.sources {
                output.push_str(&format!(
                    "\nVideo {}: {} @ {} (score: {:.2})",
                    source.video_number, source.title, source.timestamp, source.score
                ));
                if let Some(url) = &source.url {
                    output.push_str(&format!("\n  {}", url));
                }
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Chunk, Corpus};
    use crate::embedding::Embedder;
    use crate::error::SvarError;
    use crate::links::VideoLibrary;
    use async_trait::async_trait;

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

    /// Generator that echoes the prompt back, so tests can inspect it.
    struct EchoGenerator;

    #[async_trait]
    impl Generator for EchoGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            Ok(prompt.to_string())
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl Generator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(SvarError::Upstream("timed out".to_string()))
        }

        fn model(&self) -> &str {
            "failing"
        }
    }

    fn test_corpus() -> Arc<Corpus> {
        Arc::new(Corpus::from_chunks(vec![
            Chunk {
                id: 1,
                video_number: 11,
                title: "SQL Joins".to_string(),
                start_seconds: 12.0,
                end_seconds: 45.0,
                text: "JOIN syntax".to_string(),
                embedding: vec![1.0, 0.0],
            },
            Chunk {
                id: 2,
                video_number: 5,
                title: "Select, Where".to_string(),
                start_seconds: 0.0,
                end_seconds: 30.0,
                text: "SELECT basics".to_string(),
                embedding: vec![0.0, 1.0],
            },
        ]))
    }

    fn engine_with(generator: Arc<dyn Generator>, min_score: f32) -> RagEngine {
        let builder = ContextBuilder::new(
            test_corpus(),
            Arc::new(FixedEmbedder {
                vector: vec![1.0, 0.0],
            }),
            VideoLibrary::default(),
        )
        .with_max_chunks(1)
        .with_min_score(min_score);

        RagEngine::new(builder, generator)
    }

    #[tokio::test]
    async fn test_ask_includes_context_and_question_in_prompt() {
        let engine = engine_with(Arc::new(EchoGenerator), 0.0);
        let response = engine.ask("How do I use SQL JOIN?").await.unwrap();

        assert!(response.answer.contains("How do I use SQL JOIN?"));
        assert!(response.answer.contains("JOIN syntax"));
        assert_eq!(response.sources.len(), 1);
        assert_eq!(response.sources[0].video_number, 11);
        assert!(response.sources[0].url.as_ref().unwrap().contains("t=12s"));
    }

    #[tokio::test]
    async fn test_ask_without_relevant_context_skips_generation() {
        // Score floor above 1.0 filters everything out; the generator would
        // fail if called.
        let engine = engine_with(Arc::new(FailingGenerator), 2.0);
        let response = engine.ask("unrelated question").await.unwrap();

        assert!(response.sources.is_empty());
        assert!(response.answer.contains("couldn't find"));
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        let engine = engine_with(Arc::new(FailingGenerator), 0.0);
        let err = engine.ask("How do I use SQL JOIN?").await.unwrap_err();
        assert!(matches!(err, SvarError::Upstream(_)));
    }
}
