//! Notebook of saved answers
//!
//! Answers the user wants to keep are collected here and can be exported
//! as a JSON array.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::Source;

/// A saved question and its answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookEntry {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct Notebook {
    entries: Vec<NotebookEntry>,
}

impl Notebook {
    pub fn add(&mut self, question: String, answer: String, sources: Vec<Source>) {
        self.entries.push(NotebookEntry {
            question,
            answer,
            sources,
            saved_at: Utc::now(),
        });
    }

    pub fn entries(&self) -> &[NotebookEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write all entries to `path` as pretty-printed JSON
    pub fn export(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&self.entries)
            .context("Failed to serialize notebook")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write notebook to {}", path.display()))?;
        tracing::info!(
            "Exported {} notebook entries to {}",
            self.len(),
            path.display()
        );
        Ok(())
    }
}
