use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::info;

use sibyl_core::api_types::ModelStatusResponse;

use super::error_response;
use crate::state::AppState;

pub async fn model_status(State(state): State<AppState>) -> impl IntoResponse {
    let response: ModelStatusResponse = state.engine.model_summary().await.into();
    (StatusCode::OK, Json(response))
}

pub async fn retrain(State(state): State<AppState>) -> impl IntoResponse {
    info!("Retrain requested");

    match state.engine.retrain().await {
        Ok(summary) => {
            let response: ModelStatusResponse = Some(summary).into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Retrain failed", &e),
    }
}

pub async fn invalidate(State(state): State<AppState>) -> impl IntoResponse {
    info!("Model invalidation requested");
    state.engine.invalidate().await;

    let response: ModelStatusResponse = None.into();
    (StatusCode::OK, Json(response))
}
