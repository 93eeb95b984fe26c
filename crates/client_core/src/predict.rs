//! HTTP round-trip to the `/predict` endpoint and the user-facing failure messages.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::{
    domain::PlantResult,
    error::PredictFailure,
    protocol::{PredictResponse, UPLOAD_FIELD},
};
use thiserror::Error;
use tracing::{debug, error, warn};
use url::Url;

use crate::upload::SelectedImage;

#[derive(Debug, Error)]
pub enum IdentifyError {
    #[error("prediction endpoint answered HTTP {status}")]
    HttpStatus { status: u16 },
    #[error("prediction service reported an error: {0}")]
    Server(PredictFailure),
    #[error("failed to reach prediction endpoint at {origin}: {source}")]
    Unreachable {
        origin: String,
        source: anyhow::Error,
    },
    #[error("unexpected prediction response body: {0}")]
    UnexpectedBody(String),
    #[error("failed to build upload form: {0}")]
    InvalidUpload(String),
}

impl IdentifyError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            IdentifyError::HttpStatus { status } => format!(
                "Identification failed: the server responded with HTTP status {status}. Please try again."
            ),
            IdentifyError::Server(failure) => failure.error.clone(),
            IdentifyError::Unreachable { origin, .. } => format!(
                "Failed to connect to the server. Make sure the backend is running on {origin}"
            ),
            IdentifyError::UnexpectedBody(_) => {
                "Received an unexpected response from the server. Please try again.".to_string()
            }
            IdentifyError::InvalidUpload(_) => {
                "Unable to prepare the image for upload. Please try again.".to_string()
            }
        }
    }
}

#[async_trait]
pub trait PlantClassifier: Send + Sync {
    async fn classify(&self, image: &SelectedImage) -> Result<PlantResult, IdentifyError>;
}

/// Posts images to a `/predict` endpoint as `multipart/form-data`.
#[derive(Debug, Clone)]
pub struct PredictClient {
    http: Client,
    endpoint: Url,
}

impl PredictClient {
    pub fn new(endpoint: &str) -> anyhow::Result<Self> {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: &str) -> anyhow::Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("invalid prediction endpoint '{endpoint}'"))?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Scheme, host and port of the endpoint, e.g. `http://localhost:8000`.
    pub fn origin(&self) -> String {
        self.endpoint.origin().ascii_serialization()
    }

    fn unreachable(&self, source: reqwest::Error) -> IdentifyError {
        error!(endpoint = %self.endpoint, error = %source, "prediction request failed");
        IdentifyError::Unreachable {
            origin: self.origin(),
            source: source.into(),
        }
    }
}

#[async_trait]
impl PlantClassifier for PredictClient {
    async fn classify(&self, image: &SelectedImage) -> Result<PlantResult, IdentifyError> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(|e| IdentifyError::InvalidUpload(e.to_string()))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        debug!(
            endpoint = %self.endpoint,
            file_name = %image.file_name,
            size_bytes = image.size_bytes(),
            "posting image for identification"
        );
        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                endpoint = %self.endpoint,
                status = status.as_u16(),
                "prediction endpoint returned an error status"
            );
            return Err(IdentifyError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.unreachable(e))?;
        let decoded: PredictResponse = serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "prediction response did not match the expected shape");
            IdentifyError::UnexpectedBody(e.to_string())
        })?;

        decoded.into_result().map_err(|failure| {
            warn!(
                error = %failure.error,
                details = ?failure.details,
                "prediction service reported an error"
            );
            IdentifyError::Server(failure)
        })
    }
}

#[cfg(test)]
#[path = "tests/predict_tests.rs"]
mod tests;
