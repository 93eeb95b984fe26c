use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;

use crate::{
    api::ApiContext,
    care::CareGuide,
    plant_id::{Identification, PlantIdError, PlantIdentifier},
};

pub(crate) enum FakeIdentification {
    Found(Identification),
    Rejected(&'static str),
    NoSuggestions,
}

pub(crate) struct FakeIdentifier {
    pub(crate) outcome: FakeIdentification,
    pub(crate) calls: AtomicUsize,
}

#[async_trait]
impl PlantIdentifier for FakeIdentifier {
    async fn identify(&self, _image: &[u8]) -> Result<Identification, PlantIdError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            FakeIdentification::Found(identification) => Ok(identification.clone()),
            FakeIdentification::Rejected(details) => Err(PlantIdError::Rejected {
                status: 429,
                details: details.to_string(),
            }),
            FakeIdentification::NoSuggestions => Err(PlantIdError::NoSuggestions),
        }
    }
}

pub(crate) struct FakeCareGuide;

#[async_trait]
impl CareGuide for FakeCareGuide {
    async fn care_tips(&self, plant_name: &str) -> Vec<String> {
        vec![format!("Water {plant_name} weekly")]
    }
}

pub(crate) fn sunflower() -> Identification {
    Identification {
        plant_name: "Helianthus annuus".into(),
        common_names: vec!["Sunflower".into()],
        wiki_url: "https://en.wikipedia.org/wiki/Helianthus_annuus".into(),
        description: "Large yellow flowers that follow the sun".into(),
    }
}

pub(crate) fn context(outcome: FakeIdentification) -> (ApiContext, Arc<FakeIdentifier>) {
    let identifier = Arc::new(FakeIdentifier {
        outcome,
        calls: AtomicUsize::new(0),
    });
    let ctx = ApiContext {
        identifier: identifier.clone(),
        care_guide: Arc::new(FakeCareGuide),
    };
    (ctx, identifier)
}
