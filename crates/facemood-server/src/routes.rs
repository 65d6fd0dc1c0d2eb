// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP routes.
//
//   POST /predict   {"image": "<base64>"} -> {"emotion": "<label>"}
//   GET  /health    service liveness and version

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use facemood_core::error::{FacemoodError, Result};
use facemood_core::types::Prediction;
use facemood_vision::EmotionPipeline;
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::error::{ApiError, status_for};
use crate::pool::InferencePool;

/// Shared request-handling state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: EmotionPipeline,
    pub pool: InferencePool,
}

impl AppState {
    pub fn new(pipeline: EmotionPipeline, pool: InferencePool) -> Self {
        Self { pipeline, pool }
    }
}

/// Build the service router.
///
/// Bodies larger than `max_body_bytes` are refused with 413 before the
/// handler runs.
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Pull the `image` string out of a `/predict` body.
///
/// A body that is not JSON is an `InvalidRequest`; a JSON body without an
/// `image` key (including non-object bodies) is `MissingInput`; an `image`
/// that is not a string cannot be decoded.
pub fn extract_image(body: &[u8]) -> Result<String> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| FacemoodError::InvalidRequest(err.to_string()))?;

    match value.get("image") {
        None => Err(FacemoodError::MissingInput),
        Some(Value::String(payload)) => Ok(payload.clone()),
        Some(other) => Err(FacemoodError::Decode(format!(
            "image must be a base64 string, got {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[instrument(skip_all, fields(request_id = %Uuid::new_v4(), body_len = body.len()))]
async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> std::result::Result<Json<Value>, ApiError> {
    match run_predict(&state, &body).await {
        Ok(prediction) => {
            info!(result = %prediction, "Prediction served");
            Ok(Json(json!({ "emotion": prediction.as_str() })))
        }
        Err(err) => {
            let status = status_for(&err);
            if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
                error!(status = status.as_u16(), error = %err, "Prediction failed");
            } else {
                warn!(status = status.as_u16(), error = %err, "Prediction rejected");
            }
            Err(ApiError(err))
        }
    }
}

async fn run_predict(state: &AppState, body: &[u8]) -> Result<Prediction> {
    let payload = extract_image(body)?;
    let pipeline = state.pipeline.clone();
    state.pool.run(move || pipeline.run(&payload)).await
}

async fn health_check() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "facemood",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
