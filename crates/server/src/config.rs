use std::{fs, path::Path};

use anyhow::{anyhow, Context};
use serde::Deserialize;

pub const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub plant_id_api_key: Option<String>,
    pub plant_id_url: String,
    pub wikipedia_url: String,
    pub max_upload_bytes: usize,
    pub care_tip_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8000".into(),
            plant_id_api_key: None,
            plant_id_url: "https://api.plant.id/v2/identify".into(),
            wikipedia_url: "https://en.wikipedia.org".into(),
            // 10 MB image plus multipart framing.
            max_upload_bytes: 11 * 1024 * 1024,
            care_tip_limit: 6,
        }
    }
}

impl Settings {
    pub fn require_api_key(&self) -> anyhow::Result<String> {
        self.plant_id_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow!("Plant.id API key missing; set PLANT_ID_API_KEY or plant_id_api_key in {SETTINGS_FILE}")
            })
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    plant_id_api_key: Option<String>,
    plant_id_url: Option<String>,
    wikipedia_url: Option<String>,
    max_upload_bytes: Option<usize>,
    care_tip_limit: Option<usize>,
}

pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
        if let Some(v) = file_cfg.bind_addr {
            settings.server_bind = v;
        }
        if let Some(v) = file_cfg.plant_id_api_key {
            settings.plant_id_api_key = Some(v);
        }
        if let Some(v) = file_cfg.plant_id_url {
            settings.plant_id_url = v;
        }
        if let Some(v) = file_cfg.wikipedia_url {
            settings.wikipedia_url = v;
        }
        if let Some(v) = file_cfg.max_upload_bytes {
            settings.max_upload_bytes = v;
        }
        if let Some(v) = file_cfg.care_tip_limit {
            settings.care_tip_limit = v;
        }
    }

    if let Some(v) = lookup("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = lookup("PLANT_ID_API_KEY") {
        settings.plant_id_api_key = Some(v);
    }
    if let Some(v) = lookup("APP__PLANT_ID_API_KEY") {
        settings.plant_id_api_key = Some(v);
    }

    if let Some(v) = lookup("APP__PLANT_ID_URL") {
        settings.plant_id_url = v;
    }
    if let Some(v) = lookup("APP__WIKIPEDIA_URL") {
        settings.wikipedia_url = v;
    }

    if let Some(v) = lookup("APP__MAX_UPLOAD_BYTES") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.max_upload_bytes = parsed;
        }
    }
    if let Some(v) = lookup("APP__CARE_TIP_LIMIT") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.care_tip_limit = parsed;
        }
    }

    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
