//! Pre-flight checks before expensive operations.
//!
//! Validates that required files and tools are available before starting
//! operations that would otherwise fail midway.

use crate::config::Settings;
use crate::error::{Result, SvarError};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Asking and searching require the corpus file.
    Retrieve,
    /// Conversion requires ffmpeg.
    Convert,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Retrieve => {
            check_corpus_file(settings)?;
        }
        Operation::Convert => {
            check_tool("ffmpeg")?;
        }
    }
    Ok(())
}

/// Check that the corpus file exists.
fn check_corpus_file(settings: &Settings) -> Result<()> {
    let path = settings.corpus_path();
    if path.exists() {
        Ok(())
    } else {
        Err(SvarError::Corpus(format!(
            "Chunk embeddings not found at {}. Set corpus.path in the config \
             to your precomputed chunks file.",
            path.display()
        )))
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    // ffmpeg uses -version (single dash)
    let version_arg = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(SvarError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SvarError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(SvarError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieve_requires_corpus_file() {
        let mut settings = Settings::default();
        settings.corpus.path = "/nonexistent/chunks.json".to_string();
        assert!(check(Operation::Retrieve, &settings).is_err());
    }

    #[test]
    fn test_retrieve_passes_with_corpus_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut settings = Settings::default();
        settings.corpus.path = file.path().to_string_lossy().to_string();
        assert!(check(Operation::Retrieve, &settings).is_ok());
    }
}
