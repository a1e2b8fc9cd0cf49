use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Manifest};
use crate::error::Result;

/// Tabular data the networks are trained from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load(&self) -> Result<Catalog>;
}

/// Addressable per-topic attribute manifests.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Topic names this source can serve.
    async fn topics(&self) -> Result<Vec<String>>;

    async fn manifest(&self, topic: &str) -> Result<Manifest>;
}

/// A human-readable question attached to an attribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionText {
    #[serde(rename = "atributo", alias = "attribute")]
    pub attribute: String,
    #[serde(rename = "texto", alias = "text")]
    pub text: String,
    #[serde(rename = "activa", alias = "active", default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Optional lookup of question wording. Missing text never blocks question
/// selection; callers just omit it.
#[async_trait]
pub trait QuestionTextLookup: Send + Sync {
    async fn text_for(&self, attribute: &str) -> Result<Option<String>>;
    async fn active_questions(&self) -> Result<Vec<QuestionText>>;
}
