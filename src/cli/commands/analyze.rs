//! One-shot pipeline commands.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use console::style;

use crate::analysis::AnalysisOrchestrator;
use crate::config::Settings;
use crate::extract::TextExtractor;
use crate::llm::LlmClient;

/// Extract text from a file and print it to stdout.
pub fn cmd_extract(file: &Path) -> anyhow::Result<()> {
    let text = run_extraction(file)?;
    println!("{text}");
    Ok(())
}

/// Run the full pipeline on a file and print the structured result.
pub async fn cmd_analyze(settings: &Settings, file: &Path) -> anyhow::Result<()> {
    let text = run_extraction(file)?;
    eprintln!(
        "{} Extracted {} characters, asking {}...",
        style("→").cyan(),
        text.chars().count(),
        settings.llm.model
    );

    let orchestrator = AnalysisOrchestrator::new(Arc::new(LlmClient::new(settings.llm.clone())));
    let result = orchestrator.analyze_document(&text).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn run_extraction(file: &Path) -> anyhow::Result<String> {
    let bytes =
        std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let file_name = file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload");
    Ok(TextExtractor::new().extract(file_name, &bytes)?)
}
