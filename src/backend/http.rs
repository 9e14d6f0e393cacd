//! reqwest implementation of [`Backend`]

use async_trait::async_trait;
use reqwest::multipart;
use serde::de::DeserializeOwned;
use url::Url;

use super::{
    AskRequest, AskResponse, Backend, BackendError, DocumentInfo, DocumentListing,
    RemoveResponse, UploadFile, UploadResponse,
};
use crate::config::ClientConfig;

/// HTTP client for the research backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    ask_url: Url,
    upload_url: Url,
    docs_url: Url,
}

impl HttpBackend {
    /// Build a client from resolved configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            ask_url: config.ask_url.clone(),
            upload_url: config.upload_url.clone(),
            docs_url: config.docs_url.clone(),
        })
    }

    pub fn ask_url(&self) -> &Url {
        &self.ask_url
    }

    /// URL addressing a single document under the docs endpoint
    fn document_url(&self, filename: &str) -> Result<Url, BackendError> {
        let mut url = self.docs_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.docs_url.to_string()))?
            .pop_if_empty()
            .push(filename);
        Ok(url)
    }

    /// Decode a JSON body, treating any non-success status as an error
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(BackendError::from_network_error)?;
        if !status.is_success() {
            return Err(Self::status_error(status, &bytes));
        }
        Self::parse(&bytes)
    }

    /// Decode a JSON body whatever the status
    ///
    /// An error status that still carries JSON goes through field defaulting
    /// like any other answer. Only a body that is not JSON is a status error.
    async fn decode_any_status<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(BackendError::from_network_error)?;
        if status.is_success() {
            return Self::parse(&bytes);
        }

        match serde_json::from_slice(&bytes) {
            Ok(decoded) => {
                tracing::warn!("Backend answered {} with a JSON body", status);
                Ok(decoded)
            }
            Err(_) => Err(Self::status_error(status, &bytes)),
        }
    }

    fn parse<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, BackendError> {
        serde_json::from_slice(bytes).map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn status_error(status: reqwest::StatusCode, body: &[u8]) -> BackendError {
        BackendError::from_http_status(status, String::from_utf8_lossy(body).into_owned())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn ask(&self, question: &str) -> Result<AskResponse, BackendError> {
        tracing::debug!("POST {} ({} chars)", self.ask_url, question.len());
        let response = self
            .client
            .post(self.ask_url.clone())
            .json(&AskRequest { question })
            .send()
            .await
            .map_err(BackendError::from_network_error)?;

        Self::decode_any_status(response).await
    }

    async fn upload(&self, file: UploadFile) -> Result<UploadResponse, BackendError> {
        tracing::debug!(
            "POST {} ({}, {} bytes)",
            self.upload_url,
            file.file_name,
            file.bytes.len()
        );
        let part = multipart::Part::bytes(file.bytes).file_name(file.file_name);
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(BackendError::from_network_error)?;

        Self::decode_any_status(response).await
    }

    async fn list_documents(&self) -> Result<Vec<DocumentInfo>, BackendError> {
        let response = self
            .client
            .get(self.docs_url.clone())
            .send()
            .await
            .map_err(BackendError::from_network_error)?;

        let listing: DocumentListing = Self::decode(response).await?;
        Ok(listing.into_documents())
    }

    async fn remove_document(&self, filename: &str) -> Result<Option<String>, BackendError> {
        let url = self.document_url(filename)?;
        tracing::debug!("DELETE {}", url);
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(BackendError::from_network_error)?;

        let removed: RemoveResponse = Self::decode(response).await?;
        Ok(removed.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn backend_for(docs_url: &str) -> HttpBackend {
        let mut config = Config::default();
        config.backend.docs_url = docs_url.to_string();
        let client_config = config.resolve_with_env(None, None).unwrap();
        HttpBackend::from_config(&client_config).unwrap()
    }

    #[test]
    fn test_document_url_encodes_name() {
        let backend = backend_for("http://localhost:8000/docs");
        let url = backend.document_url("my report.pdf").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/docs/my%20report.pdf");
    }

    #[test]
    fn test_document_url_trailing_slash() {
        let backend = backend_for("http://localhost:8000/docs/");
        let url = backend.document_url("a.pdf").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/docs/a.pdf");
    }

    #[test]
    fn test_default_ask_url() {
        let backend = backend_for("http://localhost:8000/docs");
        assert_eq!(backend.ask_url().as_str(), "http://localhost:8000/ask");
    }
}
