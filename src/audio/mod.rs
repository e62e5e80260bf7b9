//! Batch video-to-audio conversion.
//!
//! Converts course videos to MP3 with ffmpeg so they can be transcribed and
//! embedded offline. Output files are named `<lesson_number>_<name>.mp3`.

use crate::error::{Result, SvarError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Result of converting a directory of videos.
#[derive(Debug, Default)]
pub struct ConversionSummary {
    /// Paths of the MP3 files written.
    pub converted: Vec<PathBuf>,
    /// Files skipped because they are not videos.
    pub skipped: Vec<PathBuf>,
}

/// Convert every `.mp4` file in `input_dir` to MP3 in `output_dir`.
///
/// Non-video files are skipped with a log line. A single failing conversion
/// aborts the batch and surfaces the ffmpeg error.
#[instrument(skip_all, fields(input = %input_dir.display()))]
pub async fn convert_directory(input_dir: &Path, output_dir: &Path) -> Result<ConversionSummary> {
    if !input_dir.is_dir() {
        return Err(SvarError::InvalidInput(format!(
            "Input directory not found: {}",
            input_dir.display()
        )));
    }

    std::fs::create_dir_all(output_dir)?;

    let mut summary = ConversionSummary::default();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(input_dir)?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    entries.sort();

    for path in entries {
        let is_mp4 = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("mp4"))
            .unwrap_or(false);

        if !is_mp4 {
            debug!("Skipping non-video file: {}", path.display());
            summary.skipped.push(path);
            continue;
        }

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("video");

        let number = lesson_number(stem).unwrap_or_else(|| "unknown".to_string());
        let output_name = format!("{}_{}.mp3", number, sanitize_name(stem));
        let output_path = output_dir.join(&output_name);

        info!("Converting {} -> {}", path.display(), output_name);
        extract_audio(&path, &output_path).await?;
        summary.converted.push(output_path);
    }

    if summary.converted.is_empty() {
        warn!("No video files found in {}", input_dir.display());
    }

    Ok(summary)
}

/// Extract the lesson number from a video file stem (last trailing digits).
fn lesson_number(stem: &str) -> Option<String> {
    let re = Regex::new(r"(\d+)$").unwrap();
    re.captures(stem).map(|c| c[1].to_string())
}

/// Strip characters that are unsafe in file names.
fn sanitize_name(name: &str) -> String {
    let re = Regex::new(r#"[\\/*?:"<>|]"#).unwrap();
    re.replace_all(name, "").trim().to_string()
}

/// Extract the audio stream of a video into an MP3 file using ffmpeg.
async fn extract_audio(source: &Path, dest: &Path) -> Result<()> {
    let result = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i").arg(source)
        .arg("-q:a").arg("0")
        .arg("-map").arg("a")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(SvarError::ToolFailed(format!(
                "ffmpeg failed on {}: {}",
                source.display(),
                err.trim()
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(SvarError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(SvarError::ToolFailed(format!("ffmpeg error: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lesson_number() {
        assert_eq!(lesson_number("SQL Joins 11"), Some("11".to_string()));
        assert_eq!(lesson_number("What is SQL 1"), Some("1".to_string()));
        assert_eq!(lesson_number("intro"), None);
        // Only trailing digits count.
        assert_eq!(lesson_number("2 Data Types"), None);
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name(r#"What is SQL? Part 1"#), "What is SQL Part 1");
        assert_eq!(sanitize_name("a/b\\c:d"), "abcd");
        assert_eq!(sanitize_name("  plain  "), "plain");
    }

    #[tokio::test]
    async fn test_convert_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert_directory(&dir.path().join("missing"), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, SvarError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_convert_skips_non_videos() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        std::fs::write(input.path().join("notes.txt"), "not a video").unwrap();

        let summary = convert_directory(input.path(), output.path()).await.unwrap();
        assert!(summary.converted.is_empty());
        assert_eq!(summary.skipped.len(), 1);
    }
}
