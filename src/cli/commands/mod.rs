//! CLI command implementations.

mod ask;
mod config;
mod convert;
mod doctor;
mod list;
mod search;

pub use ask::run_ask;
pub use config::run_config;
pub use convert::run_convert;
pub use doctor::run_doctor;
pub use list::run_list;
pub use search::run_search;

use crate::config::Settings;
use crate::corpus::Corpus;
use crate::embedding::{Embedder, OllamaEmbedder};
use crate::error::Result;
use crate::links::VideoLibrary;
use std::sync::Arc;

/// Load the corpus configured in settings.
pub(crate) fn load_corpus(settings: &Settings) -> Result<Arc<Corpus>> {
    Ok(Arc::new(Corpus::load(&settings.corpus_path())?))
}

/// Build the embedder configured in settings.
pub(crate) fn build_embedder(settings: &Settings) -> Result<Arc<dyn Embedder>> {
    Ok(Arc::new(OllamaEmbedder::new(
        &settings.ollama,
        &settings.embedding,
    )?))
}

/// Build the video link library, applying config overrides.
pub(crate) fn build_library(settings: &Settings) -> VideoLibrary {
    VideoLibrary::from_overrides(&settings.videos)
}
