//! Corpus of precomputed transcript chunks.
//!
//! The corpus is produced offline (transcription + embedding of the course
//! videos) and consumed here read-only: it is loaded once at startup and
//! never mutated, so it can be shared across tasks behind an `Arc` without
//! locking.

use crate::error::{Result, SvarError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A transcript chunk with its precomputed embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID.
    pub id: u64,
    /// Lesson number of the source video.
    #[serde(rename = "number")]
    pub video_number: u32,
    /// Video title.
    pub title: String,
    /// Start time in the video (seconds).
    #[serde(rename = "start")]
    pub start_seconds: f64,
    /// End time in the video (seconds).
    #[serde(rename = "end")]
    pub end_seconds: f64,
    /// Transcript text of this chunk.
    pub text: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
}

impl Chunk {
    /// Format the chunk start time for display.
    pub fn format_timestamp(&self) -> String {
        crate::links::format_timestamp(self.start_seconds)
    }
}

/// Summary information about one video in the corpus.
#[derive(Debug, Clone)]
pub struct VideoSummary {
    /// Lesson number.
    pub video_number: u32,
    /// Video title.
    pub title: String,
    /// Number of chunks from this video.
    pub chunk_count: usize,
    /// Largest end time across chunks (seconds).
    pub duration_seconds: f64,
}

/// An ordered, read-only collection of chunks.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    chunks: Vec<Chunk>,
}

impl Corpus {
    /// Build a corpus from chunks, preserving their order.
    pub fn from_chunks(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    /// Load the corpus from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SvarError::Corpus(format!(
                "Chunk embeddings not found at {}. Generate them first, or point \
                 corpus.path in the config at the right file.",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let chunks: Vec<Chunk> = serde_json::from_str(&content)?;
        tracing::info!("Loaded {} chunks from {}", chunks.len(), path.display());

        Ok(Self { chunks })
    }

    /// Number of chunks in the corpus.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the corpus has no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The chunks, in corpus order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Summarize the corpus per video, ordered by lesson number.
    pub fn videos(&self) -> Vec<VideoSummary> {
        let mut map: BTreeMap<u32, VideoSummary> = BTreeMap::new();

        for chunk in &self.chunks {
            let entry = map.entry(chunk.video_number).or_insert_with(|| VideoSummary {
                video_number: chunk.video_number,
                title: chunk.title.clone(),
                chunk_count: 0,
                duration_seconds: 0.0,
            });
            entry.chunk_count += 1;
            if chunk.end_seconds > entry.duration_seconds {
                entry.duration_seconds = chunk.end_seconds;
            }
        }

        map.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn chunk(id: u64, number: u32, title: &str, start: f64, embedding: Vec<f32>) -> Chunk {
        Chunk {
            id,
            video_number: number,
            title: title.to_string(),
            start_seconds: start,
            end_seconds: start + 30.0,
            text: format!("chunk {}", id),
            embedding,
        }
    }

    #[test]
    fn test_load_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":1,"number":11,"title":"SQL Joins","start":12.5,"end":45.0,
                "text":"JOIN syntax","embedding":[1.0,0.0]}}]"#
        )
        .unwrap();

        let corpus = Corpus::load(file.path()).unwrap();
        assert_eq!(corpus.len(), 1);

        let c = &corpus.chunks()[0];
        assert_eq!(c.video_number, 11);
        assert_eq!(c.title, "SQL Joins");
        assert_eq!(c.embedding, vec![1.0, 0.0]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Corpus::load(Path::new("/nonexistent/chunks.json")).unwrap_err();
        assert!(matches!(err, SvarError::Corpus(_)));
    }

    #[test]
    fn test_videos_summary() {
        let corpus = Corpus::from_chunks(vec![
            chunk(1, 5, "Select, Where", 0.0, vec![1.0]),
            chunk(2, 5, "Select, Where", 60.0, vec![1.0]),
            chunk(3, 1, "What is SQL", 0.0, vec![1.0]),
        ]);

        let videos = corpus.videos();
        assert_eq!(videos.len(), 2);
        // Ordered by lesson number.
        assert_eq!(videos[0].video_number, 1);
        assert_eq!(videos[1].video_number, 5);
        assert_eq!(videos[1].chunk_count, 2);
        assert_eq!(videos[1].duration_seconds, 90.0);
    }
}
