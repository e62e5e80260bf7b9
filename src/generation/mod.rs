//! Answer generation via a local language model.

mod ollama;

pub use ollama::OllamaGenerator;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for prompt-in, text-out generation.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// The model name used for generation.
    fn model(&self) -> &str;
}
