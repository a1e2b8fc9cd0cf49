use std::sync::Arc;

use sibyl_core::AppConfig;
use sibyl_inference::GuessEngine;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub engine: Arc<GuessEngine>,
}
