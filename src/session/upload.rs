//! Upload widget model
//!
//! Holds the single status line shown under the drop zone and the path the
//! user is typing. Drops race freely; only the latest drop's result is shown.

use std::path::PathBuf;

use super::token::{RequestToken, TokenCounter};
use crate::backend::{BackendError, UploadResponse};

pub const UPLOADING_STATUS: &str = "Uploading...";
pub const UPLOAD_COMPLETE_STATUS: &str = "Upload complete.";
pub const UPLOAD_FAILED_STATUS: &str = "Upload failed.";

/// What happened to an upload result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Stored by the backend; carries the uploaded file name
    Stored(String),
    Failed,
    /// Superseded by a later drop
    Stale,
}

/// A drop accepted for uploading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    pub token: RequestToken,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
pub struct UploadState {
    status: String,
    path_draft: String,
    tokens: TokenCounter,
}

impl UploadState {
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn path_draft(&self) -> &str {
        &self.path_draft
    }

    pub fn push_path_char(&mut self, c: char) {
        self.path_draft.push(c);
    }

    pub fn pop_path_char(&mut self) {
        self.path_draft.pop();
    }

    pub fn take_path_draft(&mut self) -> String {
        std::mem::take(&mut self.path_draft)
    }

    pub fn is_uploading(&self) -> bool {
        self.tokens.is_outstanding()
    }

    /// Accept a drop; an empty drop changes nothing and yields no ticket
    ///
    /// Only the first dropped file is uploaded.
    pub fn begin(&mut self, paths: &[PathBuf]) -> Option<UploadTicket> {
        let path = paths.first()?.clone();
        if paths.len() > 1 {
            tracing::info!(
                "{} files dropped, uploading only {}",
                paths.len(),
                path.display()
            );
        }
        self.status = UPLOADING_STATUS.to_string();
        Some(UploadTicket {
            token: self.tokens.issue(),
            path,
        })
    }

    /// Apply the result of the upload identified by `token`
    pub fn finish(
        &mut self,
        token: RequestToken,
        file_name: &str,
        result: Result<UploadResponse, BackendError>,
    ) -> UploadOutcome {
        if !self.tokens.settle(token) {
            tracing::debug!("Dropping stale upload result for {}", file_name);
            return UploadOutcome::Stale;
        }

        self.status = status_for(&result);
        match result {
            Ok(_) => UploadOutcome::Stored(file_name.to_string()),
            Err(e) => {
                tracing::error!("Upload of {} failed: {}", file_name, e);
                UploadOutcome::Failed
            }
        }
    }
}

/// Status text for a finished upload, shared with the one-shot command
pub fn status_for(result: &Result<UploadResponse, BackendError>) -> String {
    match result {
        Ok(response) => response
            .message
            .clone()
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| UPLOAD_COMPLETE_STATUS.to_string()),
        Err(_) => UPLOAD_FAILED_STATUS.to_string(),
    }
}
