//! Root container
//!
//! [`Assistant`] owns the session state and the upload widget's model, issues
//! backend requests on spawned tasks, and applies their results when the UI
//! loop drains them. Only the owner of the `Assistant` mutates state, so no
//! locking is involved.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::backend::{
    file_name_of, normalize_path, AskResponse, Backend, BackendError, DocumentInfo, UploadFile,
    UploadResponse,
};
use crate::config::ClientConfig;
use crate::session::{AskOutcome, RequestToken, Session, UploadOutcome, UploadState};

/// Results reported back by request tasks
#[derive(Debug)]
pub enum BackendEvent {
    Answered {
        token: RequestToken,
        question: String,
        result: Result<AskResponse, BackendError>,
    },
    Uploaded {
        token: RequestToken,
        file_name: String,
        result: Result<UploadResponse, BackendError>,
    },
    DocumentsListed(Result<Vec<DocumentInfo>, BackendError>),
    DocumentRemoved {
        filename: String,
        result: Result<Option<String>, BackendError>,
    },
}

/// What applying an event changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Answer(AskOutcome),
    Upload(UploadOutcome),
    Documents,
    DocumentRemoved { removed: bool },
}

pub struct Assistant {
    config: ClientConfig,
    backend: Arc<dyn Backend>,
    session: Session,
    upload: UploadState,
    events_tx: mpsc::UnboundedSender<BackendEvent>,
    events_rx: mpsc::UnboundedReceiver<BackendEvent>,
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("ask_url", &self.config.ask_url.as_str())
            .field("session", &self.session)
            .field("upload", &self.upload)
            .finish()
    }
}

impl Assistant {
    pub fn new(config: ClientConfig, backend: Arc<dyn Backend>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            config,
            backend,
            session: Session::new(),
            upload: UploadState::default(),
            events_tx,
            events_rx,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn upload(&self) -> &UploadState {
        &self.upload
    }

    pub fn upload_mut(&mut self) -> &mut UploadState {
        &mut self.upload
    }

    fn send(tx: &mpsc::UnboundedSender<BackendEvent>, event: BackendEvent) {
        if tx.send(event).is_err() {
            tracing::debug!("UI loop gone, dropping backend result");
        }
    }

    /// Ask a question
    ///
    /// Sets loading immediately and dispatches the request; the result is
    /// applied by [`Assistant::apply`] when it arrives. Never fails.
    pub fn ask(&mut self, question: impl Into<String>) -> RequestToken {
        let question = question.into();
        let token = self.session.begin_ask();
        tracing::info!("Asking question (request {})", token.value());

        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = backend.ask(&question).await;
            Self::send(
                &tx,
                BackendEvent::Answered {
                    token,
                    question,
                    result,
                },
            );
        });
        token
    }

    /// Upload the first of the dropped files
    ///
    /// An empty drop performs no request and leaves the status unchanged.
    pub fn drop_files(&mut self, paths: Vec<PathBuf>) -> Option<RequestToken> {
        let paths: Vec<PathBuf> = paths.into_iter().map(normalize_path).collect();
        let ticket = self.upload.begin(&paths)?;
        let token = ticket.token;
        tracing::info!(
            "Uploading {} (request {})",
            ticket.path.display(),
            token.value()
        );

        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let file_name = file_name_of(&ticket.path);
            let result = match UploadFile::read(&ticket.path).await {
                Ok(file) => backend.upload(file).await,
                Err(e) => Err(e),
            };
            Self::send(
                &tx,
                BackendEvent::Uploaded {
                    token,
                    file_name,
                    result,
                },
            );
        });
        Some(token)
    }

    /// Fetch the documents listing
    pub fn refresh_documents(&self) {
        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = backend.list_documents().await;
            Self::send(&tx, BackendEvent::DocumentsListed(result));
        });
    }

    /// Remove a document from the backend
    pub fn remove_document(&self, filename: impl Into<String>) {
        let filename = filename.into();
        tracing::info!("Removing document {}", filename);
        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = backend.remove_document(&filename).await;
            Self::send(&tx, BackendEvent::DocumentRemoved { filename, result });
        });
    }

    /// Apply one backend result to the state
    pub fn apply(&mut self, event: BackendEvent) -> Applied {
        match event {
            BackendEvent::Answered {
                token,
                question,
                result,
            } => Applied::Answer(self.session.finish_ask(token, &question, result)),
            BackendEvent::Uploaded {
                token,
                file_name,
                result,
            } => {
                let outcome = self.upload.finish(token, &file_name, result);
                if let UploadOutcome::Stored(name) = &outcome {
                    self.session.set_active_document(name.clone());
                    self.refresh_documents();
                }
                Applied::Upload(outcome)
            }
            BackendEvent::DocumentsListed(result) => {
                self.session.set_documents(result);
                Applied::Documents
            }
            BackendEvent::DocumentRemoved { filename, result } => match result {
                Ok(message) => {
                    self.session.set_notice(
                        message.unwrap_or_else(|| format!("Removed {}", filename)),
                    );
                    self.refresh_documents();
                    Applied::DocumentRemoved { removed: true }
                }
                Err(e) => {
                    tracing::error!("Failed to remove {}: {}", filename, e);
                    self.session
                        .set_notice(format!("Failed to remove {}: {}", filename, e));
                    Applied::DocumentRemoved { removed: false }
                }
            },
        }
    }

    /// Apply every result that has already arrived, returning how many
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next result and apply it
    pub async fn settle(&mut self) -> Option<Applied> {
        let event = self.events_rx.recv().await?;
        Some(self.apply(event))
    }

    /// Save the displayed answer to the notebook
    pub fn save_to_notebook(&mut self) -> bool {
        let saved = self.session.save_to_notebook();
        if saved {
            self.session.set_notice("Saved!");
        }
        saved
    }

    /// Export the notebook to the configured path
    ///
    /// The outcome is reported through the session notice.
    pub fn export_notebook(&mut self) -> bool {
        let path = &self.config.notebook_path;
        match self.session.notebook().export(path) {
            Ok(()) => {
                let notice = format!("Exported to {}", path.display());
                self.session.set_notice(notice);
                true
            }
            Err(e) => {
                tracing::error!("Notebook export failed: {:#}", e);
                self.session.set_notice("Notebook export failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::ScriptedBackend;
    use crate::backend::Source;
    use crate::config::Config;
    use crate::session::upload::{UPLOADING_STATUS, UPLOAD_FAILED_STATUS};
    use crate::session::ASK_ERROR_MESSAGE;
    use tempfile::TempDir;

    fn client_config() -> ClientConfig {
        Config::default().resolve_with_env(None, None).unwrap()
    }

    fn assistant_with(backend: Arc<ScriptedBackend>) -> Assistant {
        Assistant::new(client_config(), backend)
    }

    fn answer(text: &str, sources: &[&str]) -> AskResponse {
        AskResponse {
            answer: text.to_string(),
            sources: sources.iter().map(|s| Source::from(*s)).collect(),
            reasoning: None,
        }
    }

    #[tokio::test]
    async fn test_ask_sets_loading_until_settled() {
        let backend = Arc::new(ScriptedBackend::new().answer(answer("42", &["doc1"])));
        let mut assistant = assistant_with(backend.clone());

        assistant.ask("What is it?");
        assert!(assistant.session().is_loading());

        let applied = assistant.settle().await;
        assert_eq!(applied, Some(Applied::Answer(AskOutcome::Answered)));
        assert!(!assistant.session().is_loading());
        assert_eq!(assistant.session().answer(), "42");
        assert_eq!(assistant.session().sources(), &[Source::from("doc1")]);
        assert_eq!(backend.asked.lock().unwrap().as_slice(), ["What is it?"]);
    }

    #[tokio::test]
    async fn test_ask_failure_surfaces_fixed_message() {
        let backend = Arc::new(
            ScriptedBackend::new().fail_ask(BackendError::Network("refused".to_string())),
        );
        let mut assistant = assistant_with(backend);

        assistant.ask("anything");
        let applied = assistant.settle().await;

        assert_eq!(applied, Some(Applied::Answer(AskOutcome::Errored)));
        assert_eq!(assistant.session().answer(), ASK_ERROR_MESSAGE);
        assert!(!assistant.session().is_loading());
        assert!(assistant.session().history().is_empty());
    }

    #[tokio::test]
    async fn test_question_sent_untrimmed() {
        let backend = Arc::new(ScriptedBackend::new().answer(answer("ok", &[])));
        let mut assistant = assistant_with(backend.clone());

        assistant.ask("  padded question \n");
        assistant.settle().await;

        assert_eq!(
            backend.asked.lock().unwrap().as_slice(),
            ["  padded question \n"]
        );
        assert_eq!(
            assistant.session().history()[0].question,
            "  padded question \n"
        );
    }

    #[tokio::test]
    async fn test_overlapping_asks_latest_wins() {
        let backend = Arc::new(
            ScriptedBackend::new()
                .answer(answer("first", &[]))
                .answer(answer("second", &[])),
        );
        let mut assistant = assistant_with(backend);

        let first = assistant.ask("one");
        let second = assistant.ask("two");
        assert!(second > first);

        let outcomes = [
            assistant.settle().await.unwrap(),
            assistant.settle().await.unwrap(),
        ];

        assert!(outcomes.contains(&Applied::Answer(AskOutcome::Answered)));
        assert!(outcomes.contains(&Applied::Answer(AskOutcome::Stale)));
        assert!(!assistant.session().is_loading());
        assert_eq!(assistant.session().history().len(), 1);
        assert_eq!(assistant.session().history()[0].question, "two");
    }

    #[tokio::test]
    async fn test_empty_drop_no_request() {
        let backend = Arc::new(ScriptedBackend::new());
        let mut assistant = assistant_with(backend.clone());

        assert!(assistant.drop_files(Vec::new()).is_none());
        assert_eq!(assistant.upload().status(), "");
        assert_eq!(assistant.drain_events(), 0);
        assert!(backend.uploaded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_success_updates_status_and_documents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("report.pdf");
        std::fs::write(&path, b"pdf bytes").unwrap();

        let backend = Arc::new(
            ScriptedBackend::new()
                .upload_reply(Ok(UploadResponse {
                    message: Some("Stored.".to_string()),
                    chunks_added: Some(3),
                }))
                .with_documents(vec![DocumentInfo::named("report.pdf")]),
        );
        let mut assistant = assistant_with(backend.clone());

        assistant.drop_files(vec![path]);
        assert_eq!(assistant.upload().status(), UPLOADING_STATUS);

        let applied = assistant.settle().await;
        assert_eq!(
            applied,
            Some(Applied::Upload(UploadOutcome::Stored("report.pdf".to_string())))
        );
        assert_eq!(assistant.upload().status(), "Stored.");
        assert_eq!(assistant.session().active_document(), Some("report.pdf"));

        assert_eq!(assistant.settle().await, Some(Applied::Documents));
        assert_eq!(assistant.session().documents().len(), 1);

        let uploaded = backend.uploaded.lock().unwrap();
        assert_eq!(uploaded[0].file_name, "report.pdf");
        assert_eq!(uploaded[0].bytes, b"pdf bytes");
    }

    #[tokio::test]
    async fn test_upload_unreadable_file_fails() {
        let backend = Arc::new(ScriptedBackend::new());
        let mut assistant = assistant_with(backend.clone());

        assistant.drop_files(vec![PathBuf::from("/no/such/file.pdf")]);
        let applied = assistant.settle().await;

        assert_eq!(applied, Some(Applied::Upload(UploadOutcome::Failed)));
        assert_eq!(assistant.upload().status(), UPLOAD_FAILED_STATUS);
        assert!(backend.uploaded.lock().unwrap().is_empty());
        assert_eq!(assistant.session().active_document(), None);
    }

    #[tokio::test]
    async fn test_remove_document_refreshes_listing() {
        let backend = Arc::new(ScriptedBackend::new().with_documents(vec![
            DocumentInfo::named("a.pdf"),
            DocumentInfo::named("b.pdf"),
        ]));
        let mut assistant = assistant_with(backend.clone());

        assistant.refresh_documents();
        assistant.settle().await;
        assert_eq!(assistant.session().documents().len(), 2);

        assistant.remove_document("a.pdf");
        assert_eq!(
            assistant.settle().await,
            Some(Applied::DocumentRemoved { removed: true })
        );
        assert!(assistant.session().notice().unwrap().contains("a.pdf"));

        assistant.settle().await;
        let names: Vec<_> = assistant
            .session()
            .documents()
            .iter()
            .map(|doc| doc.display_name().to_string())
            .collect();
        assert_eq!(names, vec!["b.pdf"]);
    }

    #[tokio::test]
    async fn test_notebook_export() {
        let tmp = TempDir::new().unwrap();
        let mut config = client_config();
        config.notebook_path = tmp.path().join("notes.json");

        let backend = Arc::new(ScriptedBackend::new().answer(answer("42", &[])));
        let mut assistant = Assistant::new(config, backend);

        assert!(!assistant.save_to_notebook());
        assistant.ask("q");
        assistant.settle().await;
        assert!(assistant.save_to_notebook());

        assert!(assistant.export_notebook());
        assert!(tmp.path().join("notes.json").exists());
        let notice = assistant.session().notice().unwrap();
        assert!(notice.starts_with("Exported"));
    }

    #[tokio::test]
    async fn test_notebook_export_failure_sets_notice() {
        let tmp = TempDir::new().unwrap();
        let mut config = client_config();
        // A directory cannot be overwritten with the export file
        config.notebook_path = tmp.path().to_path_buf();

        let mut assistant = Assistant::new(config, Arc::new(ScriptedBackend::new()));
        assert!(!assistant.export_notebook());
        assert_eq!(assistant.session().notice(), Some("Notebook export failed"));
    }
}
