//! Client for the Plant.id v2 identification API.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use shared::error::PredictFailure;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

const MODIFIERS: [&str; 2] = ["crops_fast", "similar_images"];
const PLANT_LANGUAGE: &str = "en";
const PLANT_DETAILS: [&str; 3] = ["common_names", "wiki_description", "url"];

/// Top suggestion for an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    pub plant_name: String,
    pub common_names: Vec<String>,
    pub wiki_url: String,
    pub description: String,
}

#[derive(Debug, Error)]
pub enum PlantIdError {
    #[error("Plant.id API failed")]
    Rejected { status: u16, details: String },
    #[error("Plant.id returned no suggestions")]
    NoSuggestions,
    #[error("Plant.id request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl PlantIdError {
    pub fn into_failure(self) -> PredictFailure {
        match self {
            PlantIdError::Rejected { details, .. } => {
                PredictFailure::new("Plant.id API failed").with_details(details)
            }
            other => PredictFailure::new(other.to_string()),
        }
    }
}

#[async_trait]
pub trait PlantIdentifier: Send + Sync {
    async fn identify(&self, image: &[u8]) -> Result<Identification, PlantIdError>;
}

#[derive(Debug, Serialize)]
struct IdentifyRequest<'a> {
    images: Vec<String>,
    modifiers: &'a [&'a str],
    plant_language: &'a str,
    plant_details: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct IdentifyResponse {
    #[serde(default)]
    suggestions: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
struct Suggestion {
    plant_name: String,
    #[serde(default)]
    plant_details: Option<PlantDetails>,
}

#[derive(Debug, Default, Deserialize)]
struct PlantDetails {
    #[serde(default)]
    common_names: Option<Vec<String>>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    wiki_description: Option<WikiDescription>,
}

#[derive(Debug, Deserialize)]
struct WikiDescription {
    #[serde(default)]
    value: Option<String>,
}

impl From<Suggestion> for Identification {
    fn from(suggestion: Suggestion) -> Self {
        let details = suggestion.plant_details.unwrap_or_default();
        Self {
            plant_name: suggestion.plant_name,
            common_names: details.common_names.unwrap_or_default(),
            wiki_url: details.url.unwrap_or_default(),
            description: details
                .wiki_description
                .and_then(|d| d.value)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlantIdClient {
    http: Client,
    url: Url,
    api_key: String,
}

impl PlantIdClient {
    pub fn new(http: Client, url: &str, api_key: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            http,
            url: Url::parse(url)?,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl PlantIdentifier for PlantIdClient {
    async fn identify(&self, image: &[u8]) -> Result<Identification, PlantIdError> {
        let payload = IdentifyRequest {
            images: vec![STANDARD.encode(image)],
            modifiers: &MODIFIERS,
            plant_language: PLANT_LANGUAGE,
            plant_details: &PLANT_DETAILS,
        };

        debug!(url = %self.url, size_bytes = image.len(), "requesting plant identification");
        let response = self
            .http
            .post(self.url.clone())
            .header("Api-Key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let details = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %details, "Plant.id rejected identification");
            return Err(PlantIdError::Rejected {
                status: status.as_u16(),
                details,
            });
        }

        let body: IdentifyResponse = response.json().await?;
        body.suggestions
            .into_iter()
            .next()
            .map(Identification::from)
            .ok_or(PlantIdError::NoSuggestions)
    }
}

#[cfg(test)]
#[path = "tests/plant_id_tests.rs"]
mod tests;
