use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

use crate::validation::{UploadPolicy, DEFAULT_ALLOWED_TYPES, DEFAULT_MAX_UPLOAD_BYTES};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/predict";
pub const SETTINGS_FILE: &str = "plantly.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub endpoint: String,
    pub max_upload_bytes: u64,
    pub allowed_types: Vec<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_types: DEFAULT_ALLOWED_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    endpoint: Option<String>,
    max_upload_bytes: Option<u64>,
    allowed_types: Option<Vec<String>>,
}

impl ClientSettings {
    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_bytes: self.max_upload_bytes,
            allowed_types: self.allowed_types.clone(),
        }
    }

    fn apply_file(&mut self, file_cfg: FileSettings) {
        if let Some(v) = file_cfg.endpoint {
            self.endpoint = v;
        }
        if let Some(v) = file_cfg.max_upload_bytes {
            self.max_upload_bytes = v;
        }
        if let Some(v) = file_cfg.allowed_types {
            if !v.is_empty() {
                self.allowed_types = v;
            }
        }
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("PLANTLY_ENDPOINT") {
            self.endpoint = v;
        }
        if let Some(v) = lookup("APP__ENDPOINT") {
            self.endpoint = v;
        }
        if let Some(v) = lookup("APP__MAX_UPLOAD_BYTES") {
            if let Ok(parsed) = v.trim().parse::<u64>() {
                self.max_upload_bytes = parsed;
            }
        }
    }
}

/// Defaults, then `plantly.toml` in the working directory, then environment.
pub fn load_settings() -> anyhow::Result<ClientSettings> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
        settings.apply_file(file_cfg);
    }

    settings.apply_env(lookup);
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
