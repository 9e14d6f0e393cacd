//! Research backend client
//!
//! The answering and document services are external collaborators reached
//! over HTTP. This module defines their wire types, the [`Backend`] trait the
//! rest of the crate talks to, and the reqwest implementation.

mod error;
mod http;

pub use error::BackendError;
pub use http::HttpBackend;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Read any JSON value as text: `null` is empty, strings are taken as they
/// are, anything else is rendered as JSON
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = lenient_text(deserializer)?;
    Ok(Some(text).filter(|text| !text.trim().is_empty()))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_u64())
}

/// Sources that are not an array count as none; unusable entries are skipped
fn lenient_sources<'de, D>(deserializer: D) -> Result<Vec<Source>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items.into_iter().filter_map(Source::from_value).collect()),
        Value::Null => Ok(Vec::new()),
        other => {
            tracing::warn!("Ignoring malformed sources: {}", other);
            Ok(Vec::new())
        }
    }
}

/// Body of an ask request
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest<'a> {
    pub question: &'a str,
}

/// A citation returned with an answer
///
/// Older backends send bare labels, newer ones send objects carrying a
/// snippet and a confidence score. Both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Label(String),
    Cited {
        doc: String,
        #[serde(default)]
        snippet: String,
        #[serde(default)]
        confidence: Option<f64>,
    },
}

impl Source {
    /// The label shown in the sources line
    pub fn label(&self) -> &str {
        match self {
            Source::Label(label) => label,
            Source::Cited { doc, .. } => doc,
        }
    }

    /// Supporting excerpt, when the backend sent a non-empty one
    pub fn snippet(&self) -> Option<&str> {
        match self {
            Source::Cited { snippet, .. } if !snippet.trim().is_empty() => Some(snippet),
            _ => None,
        }
    }

    /// `doc (conf: 85.0%)` for cited sources; bare labels have no citation
    pub fn citation(&self) -> Option<String> {
        match self {
            Source::Label(_) => None,
            Source::Cited {
                doc,
                confidence: Some(confidence),
                ..
            } => Some(format!("{} (conf: {:.1}%)", doc, confidence * 100.0)),
            Source::Cited { doc, .. } => Some(doc.clone()),
        }
    }

    /// Build a source from one element of the `sources` array
    ///
    /// Strings become labels and objects need a `doc`. Other scalars are
    /// kept as their JSON text.
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(label) => Some(Source::Label(label)),
            Value::Object(mut fields) => {
                let doc = match fields.remove("doc")? {
                    Value::String(doc) => doc,
                    Value::Null => return None,
                    other => other.to_string(),
                };
                let snippet = match fields.remove("snippet") {
                    Some(Value::String(snippet)) => snippet,
                    _ => String::new(),
                };
                let confidence = fields.get("confidence").and_then(Value::as_f64);
                Some(Source::Cited {
                    doc,
                    snippet,
                    confidence,
                })
            }
            Value::Null | Value::Array(_) => None,
            other => Some(Source::Label(other.to_string())),
        }
    }
}

impl From<&str> for Source {
    fn from(label: &str) -> Self {
        Source::Label(label.to_string())
    }
}

/// Response of the ask endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AskResponse {
    #[serde(default, deserialize_with = "lenient_text")]
    pub answer: String,
    #[serde(default, deserialize_with = "lenient_sources")]
    pub sources: Vec<Source>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub reasoning: Option<String>,
}

/// Response of the upload endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UploadResponse {
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub chunks_added: Option<u64>,
}

/// A document known to the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl DocumentInfo {
    pub fn named(filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            ..Self::default()
        }
    }

    /// Name to display and to address the document by
    pub fn display_name(&self) -> &str {
        self.filename
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("unknown")
    }
}

/// The documents listing comes either bare or wrapped in `{"docs": [...]}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum DocumentListing {
    Bare(Vec<DocumentInfo>),
    Wrapped { docs: Vec<DocumentInfo> },
    Other(serde_json::Value),
}

impl DocumentListing {
    pub(crate) fn into_documents(self) -> Vec<DocumentInfo> {
        match self {
            DocumentListing::Bare(docs) | DocumentListing::Wrapped { docs } => docs,
            DocumentListing::Other(value) => {
                tracing::warn!("Unrecognized documents listing: {}", value);
                Vec::new()
            }
        }
    }
}

/// Response of the remove-document endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RemoveResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// A file read from disk, ready to be sent as multipart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Read a file from disk, keeping only its final path component as name
    pub async fn read(path: &Path) -> Result<Self, BackendError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| BackendError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            file_name: file_name_of(path),
            bytes,
        })
    }
}

/// Final path component, or the whole path when there is none
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Operations offered by the research backend
#[async_trait]
pub trait Backend: Send + Sync {
    /// Ask a question and receive an answer with optional sources
    async fn ask(&self, question: &str) -> Result<AskResponse, BackendError>;

    /// Upload a document for server-side processing
    async fn upload(&self, file: UploadFile) -> Result<UploadResponse, BackendError>;

    /// List documents currently indexed
    async fn list_documents(&self) -> Result<Vec<DocumentInfo>, BackendError>;

    /// Remove a document by file name, returning the server message if any
    async fn remove_document(&self, filename: &str) -> Result<Option<String>, BackendError>;
}

/// Resolve a dropped path to something readable
pub fn normalize_path(path: PathBuf) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = directories::BaseDirs::new() {
            return home.home_dir().join(stripped);
        }
    }
    path
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted in-memory backend for unit tests

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    pub(crate) struct ScriptedBackend {
        answers: Mutex<VecDeque<Result<AskResponse, BackendError>>>,
        uploads: Mutex<VecDeque<Result<UploadResponse, BackendError>>>,
        documents: Mutex<Vec<DocumentInfo>>,
        pub(crate) asked: Mutex<Vec<String>>,
        pub(crate) uploaded: Mutex<Vec<UploadFile>>,
        pub(crate) removed: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn answer(self, response: AskResponse) -> Self {
            self.answers.lock().unwrap().push_back(Ok(response));
            self
        }

        pub(crate) fn fail_ask(self, error: BackendError) -> Self {
            self.answers.lock().unwrap().push_back(Err(error));
            self
        }

        pub(crate) fn upload_reply(self, response: Result<UploadResponse, BackendError>) -> Self {
            self.uploads.lock().unwrap().push_back(response);
            self
        }

        pub(crate) fn with_documents(self, documents: Vec<DocumentInfo>) -> Self {
            *self.documents.lock().unwrap() = documents;
            self
        }
    }

    #[async_trait]
    impl Backend for ScriptedBackend {
        async fn ask(&self, question: &str) -> Result<AskResponse, BackendError> {
            self.asked.lock().unwrap().push(question.to_string());
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(BackendError::Network("no scripted answer".to_string())))
        }

        async fn upload(&self, file: UploadFile) -> Result<UploadResponse, BackendError> {
            self.uploaded.lock().unwrap().push(file);
            self.uploads
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(UploadResponse::default()))
        }

        async fn list_documents(&self) -> Result<Vec<DocumentInfo>, BackendError> {
            Ok(self.documents.lock().unwrap().clone())
        }

        async fn remove_document(&self, filename: &str) -> Result<Option<String>, BackendError> {
            self.removed.lock().unwrap().push(filename.to_string());
            self.documents
                .lock()
                .unwrap()
                .retain(|doc| doc.display_name() != filename);
            Ok(Some(format!("File '{}' removed and index rebuilt.", filename)))
        }
    }
}
