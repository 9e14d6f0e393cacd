//! Session state owned by the root container
//!
//! Everything here lives for one run of the client and is never persisted
//! (the notebook is only written when explicitly exported).

pub mod notebook;
mod token;
pub mod upload;

pub use notebook::{Notebook, NotebookEntry};
pub use token::{RequestToken, TokenCounter};
pub use upload::{UploadOutcome, UploadState, UploadTicket};

use serde::{Deserialize, Serialize};

use crate::backend::{AskResponse, BackendError, DocumentInfo, Source};

/// Answer shown when the ask request fails
pub const ASK_ERROR_MESSAGE: &str = "Error querying the backend.";

/// Warning shown when the documents listing cannot be fetched
pub const DOCUMENTS_UNAVAILABLE: &str = "Backend not running or no docs indexed";

/// One answered question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
}

/// What happened to an ask result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskOutcome {
    Answered,
    Errored,
    /// Superseded by a later question and discarded
    Stale,
}

#[derive(Debug, Default)]
pub struct Session {
    answer: String,
    loading: bool,
    sources: Vec<Source>,
    reasoning: Option<String>,
    history: Vec<HistoryEntry>,
    /// Question behind the answer currently displayed
    answered_question: Option<String>,
    active_document: Option<String>,
    documents: Vec<DocumentInfo>,
    documents_warning: Option<String>,
    notebook: Notebook,
    notice: Option<String>,
    ask_tokens: TokenCounter,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn reasoning(&self) -> Option<&str> {
        self.reasoning.as_deref()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn active_document(&self) -> Option<&str> {
        self.active_document.as_deref()
    }

    pub fn documents(&self) -> &[DocumentInfo] {
        &self.documents
    }

    pub fn documents_warning(&self) -> Option<&str> {
        self.documents_warning.as_deref()
    }

    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    /// Transient message for the status bar
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Mark a new question as in flight and return its token
    pub fn begin_ask(&mut self) -> RequestToken {
        self.loading = true;
        self.ask_tokens.issue()
    }

    /// Apply the result of the ask identified by `token`
    ///
    /// Only the latest question's result is applied. Loading is cleared as
    /// the last step for both success and failure.
    pub fn finish_ask(
        &mut self,
        token: RequestToken,
        question: &str,
        result: Result<AskResponse, BackendError>,
    ) -> AskOutcome {
        if !self.ask_tokens.settle(token) {
            tracing::debug!("Dropping stale answer for request {}", token.value());
            return AskOutcome::Stale;
        }

        let outcome = match result {
            Ok(response) => {
                self.answer = response.answer;
                self.sources = response.sources;
                self.reasoning = response.reasoning.filter(|r| !r.trim().is_empty());
                self.answered_question = Some(question.to_string());
                self.history.push(HistoryEntry {
                    question: question.to_string(),
                    answer: self.answer.clone(),
                });
                AskOutcome::Answered
            }
            Err(e) => {
                tracing::error!("Ask request failed: {}", e);
                self.answer = ASK_ERROR_MESSAGE.to_string();
                self.answered_question = None;
                AskOutcome::Errored
            }
        };

        self.loading = false;
        outcome
    }

    pub fn set_active_document(&mut self, file_name: impl Into<String>) {
        self.active_document = Some(file_name.into());
    }

    /// Apply a documents listing; a failure leaves an empty list and a warning
    pub fn set_documents(&mut self, result: Result<Vec<DocumentInfo>, BackendError>) {
        match result {
            Ok(documents) => {
                self.documents = documents;
                self.documents_warning = None;
            }
            Err(e) => {
                tracing::warn!("Failed to list documents: {}", e);
                self.documents.clear();
                self.documents_warning = Some(DOCUMENTS_UNAVAILABLE.to_string());
            }
        }
    }

    /// Save the currently displayed answer to the notebook
    ///
    /// Returns false when there is no answered question to save.
    pub fn save_to_notebook(&mut self) -> bool {
        let Some(question) = self.answered_question.clone() else {
            return false;
        };
        self.notebook
            .add(question, self.answer.clone(), self.sources.clone());
        true
    }
}
