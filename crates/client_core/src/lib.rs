//! Client side of the plant identifier: image intake, camera capture, and the
//! `/predict` round-trip.

pub mod camera;
pub mod config;
pub mod controller;
pub mod predict;
pub mod status;
pub mod upload;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use controller::{IdentifyController, IdentifyOutcome, PendingIdentification, Selection};
pub use predict::{IdentifyError, PlantClassifier, PredictClient};
pub use status::IdentifyStatus;
pub use upload::{ImageSource, Preview, SelectedImage};
pub use validation::{validate_image, UploadPolicy, ValidationError};
