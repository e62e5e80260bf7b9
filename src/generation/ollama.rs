//! Ollama generation implementation.
//!
//! Uses the non-streaming `/api/generate` endpoint.

use super::Generator;
use crate::config::OllamaSettings;
use crate::error::{Result, SvarError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Ollama-based generator.
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    /// Create a new Ollama generator from settings.
    pub fn new(ollama: &OllamaSettings, model: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(ollama.generate_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: ollama.base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        debug!("Requesting completion ({} prompt chars)", prompt.len());

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    SvarError::Upstream(format!("Generation request to {} failed: {}", url, e))
                } else {
                    SvarError::Generation(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(SvarError::Generation(format!(
                "Ollama generate API returned {}",
                response.status()
            )));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            SvarError::MalformedResponse(format!("Invalid generate response: {}", e))
        })?;

        parsed.response.ok_or_else(|| {
            SvarError::MalformedResponse("Generate response missing 'response' field".to_string())
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_creation() {
        let generator = OllamaGenerator::new(&OllamaSettings::default(), "llama3.2").unwrap();
        assert_eq!(generator.model(), "llama3.2");
    }

    #[test]
    fn test_missing_response_field_is_malformed() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.response.is_none());
    }
}
