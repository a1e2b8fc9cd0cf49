//! Shared fixtures for the integration tests.

use std::path::PathBuf;
use std::sync::Arc;

use sibyl_core::catalog::{Catalog, CatalogRow};
use sibyl_core::EngineConfig;
use sibyl_inference::{GuessEngine, ModelCache};
use sibyl_store::{InMemoryCatalogSource, InMemoryManifestSource};

/// Builds a catalog from `(name, values)` rows aligned with `columns`.
pub fn catalog(columns: &[&str], rows: &[(&str, &[u8])]) -> Catalog {
    Catalog::new(
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter()
            .map(|(name, values)| CatalogRow {
                name: name.to_string(),
                values: values.to_vec(),
            })
            .collect(),
    )
}

/// Two entities, one topic, one attribute: `flies(X) = 1`, `flies(Y) = 0`.
pub fn flies_scenario() -> (Arc<InMemoryCatalogSource>, InMemoryManifestSource) {
    let source = InMemoryCatalogSource::new(catalog(&["flies"], &[("X", &[1]), ("Y", &[0])]));
    let manifests = InMemoryManifestSource::new().with_topic("powers", ["flies"]);
    (Arc::new(source), manifests)
}

/// A small hero catalog split across three topics.
pub fn heroes() -> (Arc<InMemoryCatalogSource>, InMemoryManifestSource) {
    let source = InMemoryCatalogSource::new(catalog(
        &["flies", "strong", "hammer", "shield", "alien", "mutant"],
        &[
            ("Thor", &[1, 1, 1, 0, 1, 0]),
            ("Captain America", &[0, 1, 0, 1, 0, 0]),
            ("Vision", &[1, 1, 0, 0, 1, 0]),
            ("Storm", &[1, 0, 0, 0, 0, 1]),
            ("Wolverine", &[0, 1, 0, 0, 0, 1]),
            ("Hawkeye", &[0, 0, 0, 0, 0, 0]),
        ],
    ));
    let manifests = InMemoryManifestSource::new()
        .with_topic("powers", ["flies", "strong"])
        .with_topic("weapons", ["hammer", "shield"])
        .with_topic("species", ["alien", "mutant"]);
    (Arc::new(source), manifests)
}

pub fn engine(catalog: Arc<InMemoryCatalogSource>, manifests: InMemoryManifestSource) -> GuessEngine {
    let cache = Arc::new(ModelCache::new(catalog, Arc::new(manifests)));
    GuessEngine::new(cache, None, EngineConfig::default())
}

/// A fresh directory under the system temp dir.
pub fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sibyl-tests-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("failed to create scratch dir");
    dir
}
