//! Ask command implementation.

use super::{build_embedder, build_library, load_corpus};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::generation::OllamaGenerator;
use crate::rag::{ContextBuilder, ContextChunk, RagEngine};
use anyhow::Result;
use std::sync::Arc;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    model: Option<String>,
    top_k: Option<usize>,
    show_chunks: bool,
    settings: Settings,
) -> Result<()> {
    // Pre-flight checks
    if let Err(e) = preflight::check(Operation::Retrieve, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'svar doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let corpus = load_corpus(&settings)?;
    let embedder = build_embedder(&settings)?;
    let library = build_library(&settings);

    let model = model.unwrap_or_else(|| settings.generation.model.clone());
    let top_k = top_k.unwrap_or(settings.retrieval.top_k);

    let context_builder = ContextBuilder::new(corpus, embedder, library)
        .with_max_chunks(top_k)
        .with_min_score(settings.retrieval.min_score);

    let generator = Arc::new(OllamaGenerator::new(&settings.ollama, &model)?);

    let engine =
        RagEngine::new(context_builder, generator).with_prompts(settings.prompts.clone());

    let spinner = Output::spinner("Searching video library...");

    match engine.ask(question).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.answer);

            if !response.sources.is_empty() {
                print_video_links(&response.sources, show_chunks);
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}

/// Print the source chunks grouped by video, with timestamp deep links.
fn print_video_links(sources: &[ContextChunk], show_chunks: bool) {
    Output::header("Watch on YouTube");

    let mut seen = Vec::new();
    for source in sources {
        if !seen.contains(&source.video_number) {
            seen.push(source.video_number);
        }
    }

    for number in seen {
        let chunks: Vec<&ContextChunk> = sources
            .iter()
            .filter(|s| s.video_number == number)
            .collect();

        println!();
        Output::info(&format!("Video {}: {}", number, chunks[0].title));

        for chunk in chunks {
            let preview: String = chunk.text.chars().take(80).collect();
            match &chunk.url {
                Some(url) => println!("   Watch at {} - {}...\n     {}", chunk.timestamp, preview, url),
                None => println!("   {} - {}...", chunk.timestamp, preview),
            }
            if show_chunks {
                println!("     {}", chunk.text);
            }
        }
    }
}
