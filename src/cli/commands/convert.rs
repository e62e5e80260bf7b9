//! Convert command implementation.

use crate::audio::convert_directory;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;
use std::path::PathBuf;

/// Run the convert command.
pub async fn run_convert(
    input_dir: Option<String>,
    output_dir: Option<String>,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Convert, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'svar doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let input = PathBuf::from(input_dir.unwrap_or_else(|| settings.conversion.input_dir.clone()));
    let output =
        PathBuf::from(output_dir.unwrap_or_else(|| settings.conversion.output_dir.clone()));

    Output::info(&format!(
        "Converting videos in {} to {}",
        input.display(),
        output.display()
    ));

    let summary = match convert_directory(&input, &output).await {
        Ok(s) => s,
        Err(e) => {
            Output::error(&format!("Conversion failed: {}", e));
            return Err(e.into());
        }
    };

    if !summary.skipped.is_empty() {
        for path in &summary.skipped {
            Output::warning(&format!("Skipped non-video file: {}", path.display()));
        }
    }

    if summary.converted.is_empty() {
        Output::warning("No video files found to convert.");
    } else {
        Output::success(&format!("Converted {} video(s)", summary.converted.len()));
        for path in &summary.converted {
            println!("   {}", path.display());
        }
    }

    Ok(())
}
