use std::time::Instant;

use tracing::{info, warn};

use crate::state::AppState;

/// Trains the model set in the background so the first game does not pay
/// for it. Failures are logged; the next request retries through the cache.
pub async fn prewarm(state: AppState) {
    info!("Pre-warming model cache");
    let started = Instant::now();

    match state.engine.warm_up().await {
        Ok(summary) => info!(
            model_id = %summary.model_id,
            entities = summary.entity_count,
            topics = summary.topics.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Model cache ready"
        ),
        Err(e) => warn!(error = %e, "Pre-warm failed, model will train on first request"),
    }
}
