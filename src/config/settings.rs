//! Configuration settings for Svar.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub ollama: OllamaSettings,
    pub embedding: EmbeddingSettings,
    pub generation: GenerationSettings,
    pub retrieval: RetrievalSettings,
    pub corpus: CorpusSettings,
    pub conversion: ConversionSettings,
    /// Overrides for the video number -> URL mapping. Keys are lesson
    /// numbers as strings ("1", "2", ...). Empty means use the built-in map.
    pub videos: BTreeMap<String, String>,
    pub prompts: crate::config::RagPrompts,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.svar".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Ollama server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSettings {
    /// Base URL of the Ollama server.
    pub base_url: String,
    /// Timeout for embedding requests, in seconds.
    pub embed_timeout_seconds: u64,
    /// Timeout for generation requests, in seconds.
    pub generate_timeout_seconds: u64,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_timeout_seconds: 30,
            generate_timeout_seconds: 120,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "bge-m3".to_string(),
            dimensions: 1024,
        }
    }
}

/// Answer generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// LLM model for answer generation.
    pub model: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "llama3.2".to_string(),
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Number of chunks to retrieve by default.
    pub top_k: usize,
    /// Minimum similarity score for a chunk to be used as context.
    pub min_score: f32,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 5,
            min_score: 0.0,
        }
    }
}

/// Corpus store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    /// Path to the precomputed chunk embeddings (JSON).
    pub path: String,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            path: "~/.svar/chunks.json".to_string(),
        }
    }
}

/// Video-to-audio conversion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    /// Directory scanned for video files.
    pub input_dir: String,
    /// Directory where extracted MP3 files are written.
    pub output_dir: String,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            input_dir: "videos".to_string(),
            output_dir: "audios".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SvarError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("svar")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded corpus file path.
    pub fn corpus_path(&self) -> PathBuf {
        Self::expand_path(&self.corpus.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.ollama.base_url, "http://localhost:11434");
        assert_eq!(settings.embedding.model, "bge-m3");
        assert_eq!(settings.generation.model, "llama3.2");
        assert_eq!(settings.retrieval.top_k, 5);
        assert!(settings.videos.is_empty());
    }

    #[test]
    fn test_partial_config_parses() {
        let toml_str = r#"
            [generation]
            model = "deepseek-r1"

            [videos]
            "12" = "https://youtu.be/abc123"
        "#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.generation.model, "deepseek-r1");
        assert_eq!(settings.embedding.model, "bge-m3");
        assert_eq!(settings.videos.get("12").unwrap(), "https://youtu.be/abc123");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.retrieval.top_k = 8;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.retrieval.top_k, 8);
    }
}
