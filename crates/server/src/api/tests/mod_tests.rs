use super::*;
use std::sync::atomic::Ordering;

use crate::test_support::{context, sunflower, FakeIdentification};

#[tokio::test]
async fn combines_identification_with_care_tips() {
    let (ctx, _) = context(FakeIdentification::Found(sunflower()));

    let result = predict_plant(&ctx, b"image").await.expect("result");
    assert_eq!(
        result,
        PlantResult {
            plant_name: "Helianthus annuus".into(),
            common_names: vec!["Sunflower".into()],
            wiki_url: "https://en.wikipedia.org/wiki/Helianthus_annuus".into(),
            description: "Large yellow flowers that follow the sun".into(),
            care_tips: vec!["Water Helianthus annuus weekly".into()],
        }
    );
}

#[tokio::test]
async fn rejected_identification_keeps_upstream_details() {
    let (ctx, _) = context(FakeIdentification::Rejected("rate limited"));

    let failure = predict_plant(&ctx, b"image").await.expect_err("failure");
    assert_eq!(failure.error, "Plant.id API failed");
    assert_eq!(failure.details.as_deref(), Some("rate limited"));
}

#[tokio::test]
async fn missing_suggestions_are_reported() {
    let (ctx, _) = context(FakeIdentification::NoSuggestions);

    let failure = predict_plant(&ctx, b"image").await.expect_err("failure");
    assert_eq!(failure.error, "Plant.id returned no suggestions");
    assert!(failure.details.is_none());
}

#[tokio::test]
async fn empty_upload_skips_identification() {
    let (ctx, identifier) = context(FakeIdentification::Found(sunflower()));

    let failure = predict_plant(&ctx, b"").await.expect_err("failure");
    assert_eq!(failure.error, EMPTY_UPLOAD_MESSAGE);
    assert_eq!(identifier.calls.load(Ordering::SeqCst), 0);
}
