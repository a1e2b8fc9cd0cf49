use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell, RwLock};
use tracing::{info, instrument, warn};

use sibyl_core::error::{Result, SibylError};
use sibyl_core::source::{CatalogSource, ManifestSource};

use crate::model::ModelSet;

/// Process-wide store of trained networks.
///
/// The first `get` trains; callers arriving while training is in flight wait
/// for the same result. Nothing is invalidated implicitly: a changed catalog
/// is only picked up after [`ModelCache::invalidate`] or
/// [`ModelCache::retrain`].
pub struct ModelCache {
    catalog: Arc<dyn CatalogSource>,
    manifests: Arc<dyn ManifestSource>,
    slot: RwLock<Arc<OnceCell<Arc<ModelSet>>>>,
    retraining: Mutex<()>,
}

impl ModelCache {
    pub fn new(catalog: Arc<dyn CatalogSource>, manifests: Arc<dyn ManifestSource>) -> Self {
        Self {
            catalog,
            manifests,
            slot: RwLock::new(Arc::new(OnceCell::new())),
            retraining: Mutex::new(()),
        }
    }

    /// The current model set, training it first if needed.
    pub async fn get(&self) -> Result<Arc<ModelSet>> {
        let cell = self.slot.read().await.clone();
        let set = cell.get_or_try_init(|| self.build()).await?;
        Ok(set.clone())
    }

    /// The current model set without triggering training.
    pub async fn snapshot(&self) -> Option<Arc<ModelSet>> {
        self.slot.read().await.get().cloned()
    }

    /// Drops the cached set; the next `get` retrains from the sources.
    pub async fn invalidate(&self) {
        *self.slot.write().await = Arc::new(OnceCell::new());
        info!("Model cache invalidated");
    }

    /// Trains a fresh set and publishes it. The previous set keeps serving
    /// until the new one is ready, and stays if training fails.
    pub async fn retrain(&self) -> Result<Arc<ModelSet>> {
        let _guard = self.retraining.lock().await;
        let set = self.build().await?;
        *self.slot.write().await = Arc::new(OnceCell::new_with(Some(set.clone())));
        info!(model_id = %set.id(), "Model cache retrained");
        Ok(set)
    }

    #[instrument(skip(self))]
    async fn build(&self) -> Result<Arc<ModelSet>> {
        let catalog = self.catalog.load().await?;

        let mut topics = self.manifests.topics().await?;
        topics.sort();
        topics.dedup();

        let mut manifests = BTreeMap::new();
        for topic in topics {
            match self.manifests.manifest(&topic).await {
                Ok(manifest) => {
                    manifests.insert(topic, manifest.attributes);
                }
                Err(e) => {
                    warn!(topic = %topic, error = %e, "Manifest unavailable, skipping topic");
                }
            }
        }

        let rows = catalog.rows().len();
        let set = tokio::task::spawn_blocking(move || ModelSet::train(&catalog, &manifests))
            .await
            .map_err(|e| SibylError::Internal(format!("training task failed: {e}")))??;

        info!(
            model_id = %set.id(),
            rows,
            entities = set.entities().len(),
            networks = set.networks().count(),
            "Model set trained"
        );

        Ok(Arc::new(set))
    }
}
