use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, instrument};

use sibyl_core::api_types::{InferRequest, InferResponse};

use super::error_response;
use crate::state::AppState;

#[instrument(skip(state, req), fields(answers = req.answers.len(), excluded = req.excluded_entities.len()))]
pub async fn infer(
    State(state): State<AppState>,
    Json(req): Json<InferRequest>,
) -> impl IntoResponse {
    match state
        .engine
        .infer(&req.answers, &req.excluded_entities)
        .await
    {
        Ok(inference) => {
            let response: InferResponse = inference.into();
            info!(
                candidate = response.candidate.as_deref().unwrap_or("none"),
                "Inference served"
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Inference failed", &e),
    }
}
