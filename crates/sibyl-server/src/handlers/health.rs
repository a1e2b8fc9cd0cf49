use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::info;

use sibyl_core::api_types::HealthResponse;

use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    info!("Health check requested");

    // never trains; reports whatever is cached right now
    let summary = state.engine.model_summary().await;

    let response = match summary {
        Some(s) => HealthResponse {
            status: "ok".to_string(),
            version: VERSION.to_string(),
            model_loaded: true,
            topic_count: s.topics.len(),
            entity_count: s.entity_count,
        },
        None => HealthResponse {
            status: "warming".to_string(),
            version: VERSION.to_string(),
            model_loaded: false,
            topic_count: 0,
            entity_count: 0,
        },
    };

    (StatusCode::OK, Json(response))
}
