//! CLI module for Svar.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Svar - ask questions about your video course library
///
/// A local-first CLI that retrieves the most relevant transcript chunks for
/// a question and answers it with a local Ollama model, linking back to the
/// videos at the right timestamps. The name "Svar" is the
/// Norwegian/Scandinavian word for "answer."
#[derive(Parser, Debug)]
#[command(name = "svar")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a question and get an answer with video links
    Ask {
        /// The question to ask
        question: String,

        /// LLM model to use for answer generation
        #[arg(short, long)]
        model: Option<String>,

        /// Number of chunks to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Show the retrieved chunk texts alongside the answer
        #[arg(long)]
        show_chunks: bool,
    },

    /// Search for relevant transcript chunks without generating an answer
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// List the videos in the corpus
    List,

    /// Convert course videos to MP3 audio files
    Convert {
        /// Directory containing the video files
        #[arg(short, long)]
        input_dir: Option<String>,

        /// Directory for the extracted audio files
        #[arg(short, long)]
        output_dir: Option<String>,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
