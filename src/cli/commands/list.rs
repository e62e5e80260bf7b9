//! List command implementation.

use super::{build_library, load_corpus};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the list command.
pub fn run_list(settings: Settings) -> Result<()> {
    let corpus = load_corpus(&settings)?;
    let library = build_library(&settings);

    let videos = corpus.videos();

    if videos.is_empty() {
        Output::info("The corpus is empty. Point corpus.path at your chunk embeddings file.");
        return Ok(());
    }

    Output::header(&format!("Course Videos ({})", videos.len()));
    println!();

    for video in &videos {
        Output::video_info(
            video.video_number,
            &video.title,
            video.chunk_count,
            video.duration_seconds,
        );
        if let Some(url) = library.base_url(video.video_number) {
            println!("      {}", url);
        }
    }

    println!();
    Output::kv("Total videos", &videos.len().to_string());
    Output::kv("Total chunks", &corpus.len().to_string());

    Ok(())
}
