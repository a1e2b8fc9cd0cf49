use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use sibyl_core::{AppConfig, CatalogSource, QuestionTextLookup};
use sibyl_inference::{GuessEngine, ModelCache};
use sibyl_store::{DirManifestSource, HttpCatalogSource, JsonFileCatalogSource, JsonQuestionTextLookup};

mod handlers;
mod routes;
mod state;
mod warmup;

use state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sibyl=info".parse()?))
        .init();

    let config = AppConfig::from_env();
    let host = config.server_host.clone();
    let port = config.server_port;

    let engine = Arc::new(build_engine(&config).await?);
    let state = AppState {
        config,
        engine,
    };

    if state.config.prewarm {
        tokio::spawn(warmup::prewarm(state.clone()));
    }

    let app = routes::create_router()
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("{host}:{port}");
    tracing::info!("SIBYL server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_engine(config: &AppConfig) -> sibyl_core::Result<GuessEngine> {
    let catalog: Arc<dyn CatalogSource> = match &config.catalog_url {
        Some(url) => {
            tracing::info!(url = %url, "Catalog source: HTTP");
            Arc::new(HttpCatalogSource::new(url.clone(), &config.name_column)?)
        }
        None => {
            tracing::info!(path = %config.catalog_path.display(), "Catalog source: file");
            Arc::new(JsonFileCatalogSource::new(
                &config.catalog_path,
                &config.name_column,
            ))
        }
    };

    let manifests = Arc::new(DirManifestSource::new(
        &config.manifest_dir,
        config.topics.clone(),
    ));

    let questions: Option<Arc<dyn QuestionTextLookup>> = match &config.questions_path {
        Some(path) => Some(Arc::new(JsonQuestionTextLookup::load(path).await?)),
        None => None,
    };

    let cache = Arc::new(ModelCache::new(catalog, manifests));
    Ok(GuessEngine::new(cache, questions, config.engine))
}
