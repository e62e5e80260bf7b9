//! Search command implementation.

use super::{build_embedder, build_library, load_corpus};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::rag::ContextBuilder;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, limit: usize, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Retrieve, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'svar doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let corpus = load_corpus(&settings)?;
    let embedder = build_embedder(&settings)?;
    let library = build_library(&settings);

    let context_builder = ContextBuilder::new(corpus, embedder, library)
        .with_max_chunks(limit)
        .with_min_score(settings.retrieval.min_score);

    let spinner = Output::spinner("Searching...");

    let results = context_builder.build(query).await;
    spinner.finish_and_clear();

    match results {
        Ok(chunks) => {
            if chunks.is_empty() {
                Output::warning("No results found matching your query.");
            } else {
                Output::success(&format!("Found {} results", chunks.len()));

                for chunk in &chunks {
                    Output::search_result(
                        chunk.video_number,
                        &chunk.title,
                        &chunk.timestamp,
                        chunk.score,
                        &chunk.text,
                        chunk.url.as_deref(),
                    );
                }
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(anyhow::anyhow!("{}", e));
        }
    }

    Ok(())
}
