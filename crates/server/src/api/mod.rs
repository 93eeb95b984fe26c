use std::sync::Arc;

use shared::{domain::PlantResult, error::PredictFailure};
use tracing::{info, warn};

use crate::{care::CareGuide, plant_id::PlantIdentifier};

pub const EMPTY_UPLOAD_MESSAGE: &str = "Uploaded file is empty";

#[derive(Clone)]
pub struct ApiContext {
    pub identifier: Arc<dyn PlantIdentifier>,
    pub care_guide: Arc<dyn CareGuide>,
}

/// Identifies the image and attaches care tips for the top suggestion.
pub async fn predict_plant(ctx: &ApiContext, image: &[u8]) -> Result<PlantResult, PredictFailure> {
    if image.is_empty() {
        return Err(PredictFailure::new(EMPTY_UPLOAD_MESSAGE));
    }

    let identification = ctx.identifier.identify(image).await.map_err(|error| {
        warn!(%error, "plant identification failed");
        error.into_failure()
    })?;

    let care_tips = ctx.care_guide.care_tips(&identification.plant_name).await;
    info!(
        plant_name = %identification.plant_name,
        care_tips = care_tips.len(),
        "plant identified"
    );

    Ok(PlantResult {
        plant_name: identification.plant_name,
        common_names: identification.common_names,
        wiki_url: identification.wiki_url,
        description: identification.description,
        care_tips,
    })
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
