//! CLI transport: the interactive TUI and one-shot commands

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use crate::assistant::Assistant;
use crate::backend::{normalize_path, AskResponse, Backend, DocumentInfo, HttpBackend, UploadFile};
use crate::config::ClientConfig;
use crate::session::upload::{status_for, UPLOAD_FAILED_STATUS};
use crate::session::{ASK_ERROR_MESSAGE, DOCUMENTS_UNAVAILABLE};
use crate::tui::widgets::sources_line;
use crate::tui::{App, EventHandler, TuiApp};

fn http_backend(config: &ClientConfig) -> Result<HttpBackend> {
    HttpBackend::from_config(config).context("Failed to create HTTP client")
}

/// Run the interactive TUI until the user quits
pub async fn run_tui(config: ClientConfig) -> Result<()> {
    if !crossterm::tty::IsTty::is_tty(&std::io::stdout()) {
        anyhow::bail!("The chat UI requires a real terminal (TTY).");
    }

    let backend = http_backend(&config)?;
    tracing::info!("Using backend at {}", backend.ask_url());

    let tick_rate = config.tick_rate;
    let assistant = Assistant::new(config, Arc::new(backend));
    assistant.refresh_documents();

    let mut tui = TuiApp::start(App::new(assistant), EventHandler::new(tick_rate))?;
    let result = tui.run().await;
    tui.restore_terminal()?;
    result
}

/// Ask one question and print the answer
pub async fn run_ask(config: &ClientConfig, question: &str) -> Result<()> {
    let backend = http_backend(config)?;
    let response = ask(&backend, question).await?;

    println!("{}", response.answer);
    if let Some(reasoning) = &response.reasoning {
        println!("\n{} {}", "Reasoning:".bold(), reasoning.dimmed());
    }
    if let Some(line) = sources_line(&response.sources) {
        println!("\n{}", line.italic());
    }
    for source in &response.sources {
        if let Some(citation) = source.citation() {
            println!("- {}", citation.bold());
            if let Some(snippet) = source.snippet() {
                println!("  {}", snippet.dimmed());
            }
        }
    }
    Ok(())
}

async fn ask(backend: &dyn Backend, question: &str) -> Result<AskResponse> {
    if question.trim().is_empty() {
        anyhow::bail!("Question is empty");
    }
    backend.ask(question).await.map_err(|e| {
        tracing::error!("Ask failed: {}", e);
        anyhow::Error::new(e).context(ASK_ERROR_MESSAGE)
    })
}

/// Upload one file and print the resulting status
pub async fn run_upload(config: &ClientConfig, path: &Path) -> Result<()> {
    let backend = http_backend(config)?;
    let status = upload(&backend, path).await?;
    println!("{} {}", "✓".green(), status);
    Ok(())
}

async fn upload(backend: &dyn Backend, path: &Path) -> Result<String> {
    let path = normalize_path(path.to_path_buf());
    let result = match UploadFile::read(&path).await {
        Ok(file) => backend.upload(file).await,
        Err(e) => Err(e),
    };
    let status = status_for(&result);
    match result {
        Ok(_) => Ok(status),
        Err(e) => {
            tracing::error!("Upload of {} failed: {}", path.display(), e);
            Err(anyhow::Error::new(e).context(UPLOAD_FAILED_STATUS))
        }
    }
}

#[derive(Tabled)]
struct DocumentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Document")]
    name: String,
}

/// Render the documents listing as a table
fn documents_table(documents: &[DocumentInfo]) -> String {
    let rows = documents.iter().map(|doc| DocumentRow {
        id: match &doc.id {
            Some(serde_json::Value::String(id)) => id.clone(),
            Some(id) => id.to_string(),
            None => "-".to_string(),
        },
        name: doc.display_name().to_string(),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

/// List the documents the backend has indexed
pub async fn run_docs(config: &ClientConfig) -> Result<()> {
    let backend = http_backend(config)?;
    let documents = backend.list_documents().await.map_err(|e| {
        tracing::warn!("Listing documents failed: {}", e);
        anyhow::Error::new(e).context(DOCUMENTS_UNAVAILABLE)
    })?;

    if documents.is_empty() {
        println!("{}", "No documents indexed".yellow());
    } else {
        println!("{}", documents_table(&documents));
    }
    Ok(())
}

/// Remove a document from the backend
pub async fn run_remove(config: &ClientConfig, filename: &str) -> Result<()> {
    let backend = http_backend(config)?;
    let message = backend
        .remove_document(filename)
        .await
        .with_context(|| format!("Failed to remove {}", filename))?;
    println!(
        "{} {}",
        "✓".green(),
        message.unwrap_or_else(|| format!("Removed {}", filename))
    );
    Ok(())
}
