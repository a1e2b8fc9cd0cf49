use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        // Health
        .route("/api/health", get(handlers::health::health_check))
        // Inference
        .route("/api/infer", post(handlers::inference::infer))
        // Questions
        .route("/api/questions", get(handlers::questions::list_questions))
        .route("/api/questions/next", post(handlers::questions::next_question))
        // Model lifecycle
        .route("/api/model", get(handlers::model::model_status))
        .route("/api/model/retrain", post(handlers::model::retrain))
        .route("/api/model/invalidate", post(handlers::model::invalidate))
}
