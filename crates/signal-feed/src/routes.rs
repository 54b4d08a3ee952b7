use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use signal_lanes::metrics::FeedMetrics;
use signal_lanes::{FeedEntry, FeedHandle, MessageId};

#[derive(Clone)]
pub struct AppState {
    pub feed: FeedHandle,
    pub metrics: Arc<FeedMetrics>,
}

// --- Request / response types ---

#[derive(Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub origin: String,
    pub text: String,
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub id: MessageId,
}

#[derive(Serialize)]
pub struct FeedResponse {
    pub messages: Vec<FeedEntry>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/signals", post(submit_signal))
        .route("/signals/:id/endorse", post(endorse_signal))
        .route("/feed", get(get_feed))
        .route("/feed/active", get(get_active_feed))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
}

// --- Handlers ---

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// 200 with the new id, or 204 when the text is blank.
pub async fn submit_signal(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> Result<Response, StatusCode> {
    match state.feed.submit(req.origin, req.text).await {
        Ok(Some(id)) => {
            tracing::info!(id = %id, "live signal admitted");
            Ok((StatusCode::OK, Json(SubmitResponse { id })).into_response())
        }
        Ok(None) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(e) => {
            tracing::error!(error = %e, "submit failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Always 204; unknown ids are ignored.
pub async fn endorse_signal(State(state): State<AppState>, Path(id): Path<u64>) -> StatusCode {
    state.feed.endorse(MessageId(id)).await;
    StatusCode::NO_CONTENT
}

pub async fn get_feed(State(state): State<AppState>) -> Result<Json<FeedResponse>, StatusCode> {
    let messages = state.feed.snapshot().await.map_err(|e| {
        tracing::error!(error = %e, "snapshot failed");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    Ok(Json(FeedResponse { messages }))
}

pub async fn get_active_feed(
    State(state): State<AppState>,
) -> Result<Json<FeedResponse>, StatusCode> {
    let messages = state.feed.active().await.map_err(|e| {
        tracing::error!(error = %e, "active snapshot failed");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    Ok(Json(FeedResponse { messages }))
}

pub async fn metrics(State(state): State<AppState>) -> String {
    state.metrics.encode()
}
