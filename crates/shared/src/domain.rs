use serde::{Deserialize, Serialize};

/// A recognized plant, as returned by `/predict`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantResult {
    pub plant_name: String,
    #[serde(default)]
    pub common_names: Vec<String>,
    #[serde(default)]
    pub wiki_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub care_tips: Vec<String>,
}

impl PlantResult {
    pub fn has_common_names(&self) -> bool {
        !self.common_names.is_empty()
    }

    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }

    pub fn has_wiki_url(&self) -> bool {
        !self.wiki_url.trim().is_empty()
    }

    pub fn has_care_tips(&self) -> bool {
        !self.care_tips.is_empty()
    }
}
