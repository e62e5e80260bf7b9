//! Svar - Course Video Q&A
//!
//! A local-first CLI for asking questions about a video course library.
//!
//! The name "Svar" comes from the Norwegian/Scandinavian word for "answer."
//!
//! # Overview
//!
//! Svar allows you to:
//! - Ask questions about course videos and get AI-powered answers
//! - Jump straight to the right video timestamp via YouTube deep links
//! - Search the transcript chunks semantically
//! - Batch-convert course videos to audio for offline processing
//!
//! Everything runs against a local Ollama server: questions are embedded,
//! matched against precomputed transcript-chunk embeddings by cosine
//! similarity, and the best chunks are handed to a generation model.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `corpus` - Precomputed transcript chunks and their embeddings
//! - `embedding` - Query embedding via Ollama
//! - `retrieval` - Cosine-similarity top-k retrieval
//! - `generation` - Answer generation via Ollama
//! - `rag` - Context shaping and the question-answering engine
//! - `links` - Video number to YouTube URL mapping with timestamp links
//! - `audio` - Batch video-to-MP3 conversion
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use svar::config::Settings;
//! use svar::corpus::Corpus;
//! use svar::embedding::OllamaEmbedder;
//! use svar::retrieval::Retriever;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let corpus = Corpus::load(&settings.corpus_path())?;
//!
//!     let embedder = Arc::new(OllamaEmbedder::new(&settings.ollama, &settings.embedding)?);
//!     let retriever = Retriever::new(embedder);
//!
//!     let results = retriever.retrieve(&corpus, "How do I use SQL JOIN?", 5).await?;
//!     for r in results {
//!         println!("{:.2} {}", r.score, r.chunk.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod links;
pub mod rag;
pub mod retrieval;

pub use error::{Result, SvarError};
