//! Ollama embeddings implementation.
//!
//! Talks to a local Ollama server's `/api/embed` endpoint.

use super::Embedder;
use crate::config::{EmbeddingSettings, OllamaSettings};
use crate::error::{Result, SvarError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Ollama-based embedder.
pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder from settings.
    pub fn new(ollama: &OllamaSettings, embedding: &EmbeddingSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(ollama.embed_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: ollama.base_url.trim_end_matches('/').to_string(),
            model: embedding.model.clone(),
            dimensions: embedding.dimensions as usize,
        })
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| SvarError::MalformedResponse("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let url = format!("{}/api/embed", self.base_url);
        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    SvarError::Upstream(format!("Embedding request to {} failed: {}", url, e))
                } else {
                    SvarError::Embedding(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(SvarError::Embedding(format!(
                "Ollama embed API returned {}",
                response.status()
            )));
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| SvarError::MalformedResponse(format!("Invalid embed response: {}", e)))?;

        if parsed.embeddings.len() != texts.len() {
            return Err(SvarError::MalformedResponse(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                parsed.embeddings.len()
            )));
        }

        Ok(parsed.embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
