//! Configuration module for Svar.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::RagPrompts;
pub use settings::{
    ConversionSettings, CorpusSettings, EmbeddingSettings, GeneralSettings, GenerationSettings,
    OllamaSettings, RetrievalSettings, Settings,
};
