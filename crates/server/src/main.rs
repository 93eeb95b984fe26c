use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::{
    error::PredictFailure,
    protocol::{PredictResponse, HEALTH_ROUTE, PREDICT_ROUTE, UPLOAD_FIELD},
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};
use tracing::{info, warn};

mod api;
mod app_state;
mod care;
mod config;
mod plant_id;
#[cfg(test)]
mod test_support;

use api::{predict_plant, ApiContext};
use app_state::AppState;
use care::WikipediaCareGuide;
use config::load_settings;
use plant_id::PlantIdClient;

type ApiFailure = (StatusCode, Json<PredictFailure>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings()?;
    let api_key = settings.require_api_key()?;
    let http = reqwest::Client::new();
    let api = ApiContext {
        identifier: Arc::new(PlantIdClient::new(
            http.clone(),
            &settings.plant_id_url,
            api_key,
        )?),
        care_guide: Arc::new(WikipediaCareGuide::new(
            http,
            &settings.wikipedia_url,
            settings.care_tip_limit,
        )?),
    };

    let app = build_router(Arc::new(AppState { api }), settings.max_upload_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "prediction service listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route(HEALTH_ROUTE, get(healthz))
        .route(PREDICT_ROUTE, post(predict))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// Application failures are answered in-band with 200 and an `error` body;
/// only a malformed upload gets an error status.
async fn predict(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<PredictResponse>, ApiFailure> {
    let image = read_upload(&mut multipart).await?;
    let response = match predict_plant(&state.api, &image).await {
        Ok(result) => PredictResponse::from(result),
        Err(failure) => PredictResponse::from(failure),
    };
    Ok(Json(response))
}

async fn read_upload(multipart: &mut Multipart) -> Result<Bytes, ApiFailure> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_failure)? {
        if field.name() == Some(UPLOAD_FIELD) {
            return field.bytes().await.map_err(multipart_failure);
        }
    }

    Err((
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(PredictFailure::new(format!(
            "missing '{UPLOAD_FIELD}' upload field"
        ))),
    ))
}

fn multipart_failure(error: MultipartError) -> ApiFailure {
    warn!(%error, "rejected multipart upload");
    (error.status(), Json(PredictFailure::new(error.body_text())))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
