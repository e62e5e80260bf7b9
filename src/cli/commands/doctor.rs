//! Doctor command - verify system requirements and configuration.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use serde::Deserialize;
use std::process::Command;
use std::time::Duration;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Svar Doctor");
    println!();
    println!("Checking system requirements and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("External Tools").bold());
    let tool_check = check_tool("ffmpeg", install_hint_ffmpeg());
    tool_check.print();
    checks.push(tool_check);

    println!();

    println!("{}", style("Ollama Server").bold());
    let ollama_checks = check_ollama(settings).await;
    for check in &ollama_checks {
        check.print();
    }
    checks.extend(ollama_checks);

    println!();

    println!("{}", style("Corpus").bold());
    let corpus_check = check_corpus(settings);
    corpus_check.print();
    checks.push(corpus_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Svar.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Svar is ready to use.");
    }

    Ok(())
}

/// Check if an external tool is available.
fn check_tool(name: &str, hint: &str) -> CheckResult {
    match Command::new(name).arg("-version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .to_string();

            let version_display = if version.len() > 50 {
                format!("{}...", &version[..50])
            } else {
                version
            };

            CheckResult::ok(name, &version_display)
        }
        Ok(_) => CheckResult::error(name, "installed but not working", hint),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            CheckResult::error(name, "not found", hint)
        }
        Err(e) => CheckResult::error(name, &format!("error: {}", e), hint),
    }
}

/// Check the Ollama server and the configured models.
async fn check_ollama(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let base_url = settings.ollama.base_url.trim_end_matches('/');
    let url = format!("{}/api/tags", base_url);

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            results.push(CheckResult::error(
                "Ollama server",
                &format!("HTTP client error: {}", e),
                "This is a bug; please report it",
            ));
            return results;
        }
    };

    let response = match client.get(&url).send().await {
        Ok(r) if r.status().is_success() => r,
        Ok(r) => {
            results.push(CheckResult::error(
                "Ollama server",
                &format!("{} returned {}", base_url, r.status()),
                "Check that Ollama is healthy: ollama list",
            ));
            return results;
        }
        Err(_) => {
            results.push(CheckResult::error(
                "Ollama server",
                &format!("not reachable at {}", base_url),
                "Start it with: ollama serve",
            ));
            return results;
        }
    };

    results.push(CheckResult::ok("Ollama server", base_url));

    let tags: TagsResponse = match response.json().await {
        Ok(t) => t,
        Err(e) => {
            results.push(CheckResult::warning(
                "Installed models",
                &format!("could not parse model list: {}", e),
                "Check the Ollama version",
            ));
            return results;
        }
    };

    for (label, wanted) in [
        ("Embedding model", settings.embedding.model.as_str()),
        ("Generation model", settings.generation.model.as_str()),
    ] {
        // Tags carry a ":latest" suffix for untagged pulls.
        let installed = tags
            .models
            .iter()
            .any(|m| m.name == wanted || m.name.strip_suffix(":latest") == Some(wanted));

        if installed {
            results.push(CheckResult::ok(label, wanted));
        } else {
            results.push(CheckResult::error(
                label,
                &format!("{} not installed", wanted),
                &format!("Install with: ollama pull {}", wanted),
            ));
        }
    }

    results
}

/// Check the corpus file.
fn check_corpus(settings: &Settings) -> CheckResult {
    let path = settings.corpus_path();
    if path.exists() {
        let size = std::fs::metadata(&path)
            .map(|m| format_size(m.len()))
            .unwrap_or_else(|_| "unknown size".to_string());
        CheckResult::ok("Chunk embeddings", &format!("{} ({})", path.display(), size))
    } else {
        CheckResult::error(
            "Chunk embeddings",
            &format!("{} not found", path.display()),
            "Generate the chunk embeddings and set corpus.path in the config",
        )
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: svar config edit",
        )
    }
}

/// Format file size in human-readable format.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Platform-specific install hint for ffmpeg.
fn install_hint_ffmpeg() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install ffmpeg"
    } else if cfg!(target_os = "linux") {
        "Install with: sudo apt install ffmpeg (or your package manager)"
    } else {
        "Install from: https://ffmpeg.org/download.html"
    }
}
