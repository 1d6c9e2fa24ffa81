//! services/api/src/adapters/classifier.rs
//!
//! Adapter for the external document-classification service. The service
//! receives the stored file and its declared MIME type and returns the
//! document type, extracted fields, a summary, and a confidence score.
//!
//! Any transport or decode failure surfaces as `ProcessingFailed`; the
//! upload flow records it against the document instead of failing the
//! request.

use async_trait::async_trait;
use documind_core::domain::Classification;
use documind_core::ports::{DocumentClassifier, PortError, PortResult};
use tracing::debug;

pub struct RemoteClassifierAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteClassifierAdapter {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl DocumentClassifier for RemoteClassifierAdapter {
    async fn classify(
        &self,
        file_path: &str,
        mime_type: Option<&str>,
    ) -> PortResult<Classification> {
        let bytes = tokio::fs::read(file_path)
            .await
            .map_err(|e| PortError::ProcessingFailed(format!("failed to read stored file: {e}")))?;

        let mut part = reqwest::multipart::Part::bytes(bytes).file_name(file_path.to_string());
        if let Some(mime) = mime_type {
            part = part
                .mime_str(mime)
                .map_err(|e| PortError::ProcessingFailed(format!("invalid mime type: {e}")))?;
        }
        let form = reqwest::multipart::Form::new().part("file", part);

        debug!(file_path, "sending document to classifier");
        let response = self
            .client
            .post(format!("{}/classify", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| PortError::ProcessingFailed(format!("classifier unreachable: {e}")))?;

        if !response.status().is_success() {
            return Err(PortError::ProcessingFailed(format!(
                "classifier returned status {}",
                response.status()
            )));
        }

        response
            .json::<Classification>()
            .await
            .map_err(|e| PortError::ProcessingFailed(format!("malformed classifier response: {e}")))
    }
}
