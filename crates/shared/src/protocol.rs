use serde::{Deserialize, Serialize};

use crate::{domain::PlantResult, error::PredictFailure};

pub const PREDICT_ROUTE: &str = "/predict";
pub const HEALTH_ROUTE: &str = "/healthz";
/// Multipart field carrying the image.
pub const UPLOAD_FIELD: &str = "file";

/// Body of a 2xx `/predict` reply.
///
/// A body with an `error` field is a failure even if it also carries plant
/// fields, so `Failure` is tried first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Failure(PredictFailure),
    Success(PlantResult),
}

impl PredictResponse {
    pub fn into_result(self) -> Result<PlantResult, PredictFailure> {
        match self {
            PredictResponse::Success(result) => Ok(result),
            PredictResponse::Failure(failure) => Err(failure),
        }
    }
}

impl From<PlantResult> for PredictResponse {
    fn from(value: PlantResult) -> Self {
        PredictResponse::Success(value)
    }
}

impl From<PredictFailure> for PredictResponse {
    fn from(value: PredictFailure) -> Self {
        PredictResponse::Failure(value)
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
