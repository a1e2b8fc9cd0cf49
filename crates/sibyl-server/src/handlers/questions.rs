use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, instrument};

use sibyl_core::api_types::{NextQuestionRequest, NextQuestionResponse, QuestionListResponse};

use super::error_response;
use crate::state::AppState;

#[instrument(skip(state, req), fields(answers = req.answers.len(), excluded = req.excluded_attributes.len()))]
pub async fn next_question(
    State(state): State<AppState>,
    Json(req): Json<NextQuestionRequest>,
) -> impl IntoResponse {
    match state
        .engine
        .next_question(&req.answers, &req.excluded_attributes)
        .await
    {
        Ok(next) => {
            let response: NextQuestionResponse = next.into();
            info!(
                attribute = response.attribute.as_deref().unwrap_or("none"),
                "Next question served"
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("Question selection failed", &e),
    }
}

pub async fn list_questions(State(state): State<AppState>) -> impl IntoResponse {
    match state.engine.active_questions().await {
        Ok(questions) => {
            (StatusCode::OK, Json(QuestionListResponse { questions })).into_response()
        }
        Err(e) => error_response("Failed to list questions", &e),
    }
}
