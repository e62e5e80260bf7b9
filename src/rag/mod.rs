//! RAG (Retrieval-Augmented Generation) for question answering with sources.
//!
//! Combines the retriever, the video link library and a generation model to
//! answer questions about the course, citing video numbers and timestamps.

pub mod context;
mod engine;

pub use context::ContextBuilder;
pub use engine::{RagEngine, RagResponse};

use crate::links::VideoLibrary;
use crate::retrieval::ScoredChunk;

/// A retrieved chunk with formatted context for prompts and display.
#[derive(Debug, Clone)]
pub struct ContextChunk {
    /// Lesson number of the source video.
    pub video_number: u32,
    /// Video title.
    pub title: String,
    /// Formatted timestamp (e.g., "02:34").
    pub timestamp: String,
    /// Start time in seconds.
    pub start_seconds: f64,
    /// End time in seconds.
    pub end_seconds: f64,
    /// Text content.
    pub text: String,
    /// Similarity score.
    pub score: f32,
    /// Deep link into the video at the chunk's timestamp (if the video is
    /// in the library).
    pub url: Option<String>,
}

impl ContextChunk {
    /// Build a context chunk, resolving the deep link from the library.
    pub fn from_scored(result: ScoredChunk, library: &VideoLibrary) -> Self {
        let url = library.timestamp_link(result.chunk.video_number, result.chunk.start_seconds);
        Self {
            video_number: result.chunk.video_number,
            timestamp: result.chunk.format_timestamp(),
            title: result.chunk.title,
            start_seconds: result.chunk.start_seconds,
            end_seconds: result.chunk.end_seconds,
            text: result.chunk.text,
            score: result.score,
            url,
        }
    }
}
