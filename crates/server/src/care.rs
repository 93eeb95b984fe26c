//! Care tips mined from the plant's Wikipedia article.

use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

pub const CARE_KEYWORDS: [&str; 12] = [
    "water",
    "watering",
    "soil",
    "light",
    "sun",
    "temperature",
    "humidity",
    "shade",
    "moist",
    "drain",
    "grow",
    "fertilizer",
];
pub const NO_CARE_INFO: &str = "No specific care info found.";

#[async_trait]
pub trait CareGuide: Send + Sync {
    /// Never fails: problems are reported as a single tip.
    async fn care_tips(&self, plant_name: &str) -> Vec<String>;
}

pub fn article_title(plant_name: &str) -> String {
    plant_name.trim().replace(' ', "_")
}

/// Sentences of `text` mentioning any care keyword, at most `limit` of them.
pub fn extract_care_tips(text: &str, limit: usize) -> Vec<String> {
    let body = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with("=="))
        .collect::<Vec<_>>()
        .join(" ");
    let body = strip_citations(&body);

    let tips: Vec<String> = body
        .split('.')
        .map(str::trim)
        .filter(|sentence| {
            let lower = sentence.to_lowercase();
            CARE_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
        })
        .take(limit)
        .map(str::to_string)
        .collect();

    if tips.is_empty() {
        vec![NO_CARE_INFO.to_string()]
    } else {
        tips
    }
}

/// Removes bracketed reference markers such as `[12]`.
fn strip_citations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let digits = after.chars().take_while(char::is_ascii_digit).count();
        if digits > 0 && after[digits..].starts_with(']') {
            rest = &after[digits + 1..];
        } else {
            out.push('[');
            rest = after;
        }
    }
    out.push_str(rest);
    out
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: HashMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    #[serde(default)]
    extract: Option<String>,
}

/// Reads plain-text article extracts through the MediaWiki query API.
#[derive(Debug, Clone)]
pub struct WikipediaCareGuide {
    http: Client,
    api_url: Url,
    limit: usize,
}

impl WikipediaCareGuide {
    pub fn new(http: Client, base_url: &str, limit: usize) -> anyhow::Result<Self> {
        let api_url = Url::parse(base_url)
            .and_then(|base| base.join("/w/api.php"))
            .with_context(|| format!("invalid wikipedia url '{base_url}'"))?;
        Ok(Self {
            http,
            api_url,
            limit,
        })
    }

    async fn article_text(&self, plant_name: &str) -> anyhow::Result<String> {
        let title = article_title(plant_name);
        let response: ExtractResponse = self
            .http
            .get(self.api_url.clone())
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("format", "json"),
                ("titles", title.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let text = response
            .query
            .map(|query| {
                query
                    .pages
                    .into_values()
                    .filter_map(|page| page.extract)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();
        debug!(%title, chars = text.len(), "fetched article extract");
        Ok(text)
    }
}

#[async_trait]
impl CareGuide for WikipediaCareGuide {
    async fn care_tips(&self, plant_name: &str) -> Vec<String> {
        match self.article_text(plant_name).await {
            Ok(text) => extract_care_tips(&text, self.limit),
            Err(error) => {
                warn!(%plant_name, %error, "failed to fetch care info");
                vec![format!("Error fetching care info: {error}")]
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/care_tests.rs"]
mod tests;
