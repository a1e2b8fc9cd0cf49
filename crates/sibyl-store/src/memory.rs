use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use sibyl_core::catalog::{Catalog, Manifest};
use sibyl_core::error::{Result, SibylError};
use sibyl_core::source::{CatalogSource, ManifestSource, QuestionText, QuestionTextLookup};

/// Catalog held in memory. Counts how often it is loaded and can be
/// replaced at runtime.
#[derive(Default)]
pub struct InMemoryCatalogSource {
    catalog: RwLock<Catalog>,
    loads: AtomicUsize,
}

impl InMemoryCatalogSource {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: RwLock::new(catalog),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub async fn replace(&self, catalog: Catalog) {
        *self.catalog.write().await = catalog;
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalogSource {
    async fn load(&self) -> Result<Catalog> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        // let concurrent callers pile up behind the first load
        tokio::task::yield_now().await;
        Ok(self.catalog.read().await.clone())
    }
}

/// Manifests keyed by topic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryManifestSource {
    manifests: BTreeMap<String, Manifest>,
}

impl InMemoryManifestSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_topic<I, S>(mut self, topic: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.manifests.insert(topic.into(), Manifest::new(attributes));
        self
    }
}

#[async_trait]
impl ManifestSource for InMemoryManifestSource {
    async fn topics(&self) -> Result<Vec<String>> {
        Ok(self.manifests.keys().cloned().collect())
    }

    async fn manifest(&self, topic: &str) -> Result<Manifest> {
        self.manifests
            .get(topic)
            .cloned()
            .ok_or_else(|| SibylError::NotFound(format!("manifest for topic {topic}")))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryQuestionTextLookup {
    questions: Vec<QuestionText>,
}

impl InMemoryQuestionTextLookup {
    pub fn new(questions: Vec<QuestionText>) -> Self {
        Self { questions }
    }
}

#[async_trait]
impl QuestionTextLookup for InMemoryQuestionTextLookup {
    async fn text_for(&self, attribute: &str) -> Result<Option<String>> {
        Ok(self
            .questions
            .iter()
            .find(|q| q.active && q.attribute == attribute)
            .map(|q| q.text.clone()))
    }

    async fn active_questions(&self) -> Result<Vec<QuestionText>> {
        Ok(self.questions.iter().filter(|q| q.active).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sibyl_core::catalog::CatalogRow;

    #[tokio::test]
    async fn test_catalog_counts_loads_and_can_be_replaced() {
        let source = InMemoryCatalogSource::new(Catalog::default());
        assert!(source.load().await.unwrap().is_empty());

        source
            .replace(Catalog::new(
                vec!["vuela".into()],
                vec![CatalogRow { name: "Thor".into(), values: vec![1] }],
            ))
            .await;

        assert_eq!(source.load().await.unwrap().rows().len(), 1);
        assert_eq!(source.loads(), 2);
    }

    #[tokio::test]
    async fn test_unknown_topic_is_not_found() {
        let source = InMemoryManifestSource::new().with_topic("poderes", ["vuela"]);

        assert_eq!(source.topics().await.unwrap(), vec!["poderes"]);
        assert!(matches!(
            source.manifest("armas").await.unwrap_err(),
            SibylError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_inactive_questions_have_no_text() {
        let lookup = InMemoryQuestionTextLookup::new(vec![QuestionText {
            attribute: "vuela".into(),
            text: "¿Puede volar?".into(),
            active: false,
        }]);

        assert_eq!(lookup.text_for("vuela").await.unwrap(), None);
        assert!(lookup.active_questions().await.unwrap().is_empty());
    }
}
