use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use sibyl_core::catalog::{Catalog, Manifest};
use sibyl_core::error::Result;
use sibyl_core::source::{CatalogSource, ManifestSource, QuestionText, QuestionTextLookup};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Catalog stored as a JSON array of row objects.
pub struct JsonFileCatalogSource {
    path: PathBuf,
    name_column: String,
}

impl JsonFileCatalogSource {
    pub fn new(path: impl Into<PathBuf>, name_column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name_column: name_column.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalogSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Catalog> {
        let bytes = tokio::fs::read(&self.path).await?;
        let records: Vec<Map<String, Value>> = serde_json::from_slice(&bytes)?;
        let catalog = Catalog::from_records(&records, &self.name_column);

        info!(
            records = records.len(),
            rows = catalog.rows().len(),
            columns = catalog.columns().len(),
            "Catalog loaded from file"
        );
        Ok(catalog)
    }
}

// ---------------------------------------------------------------------------
// Manifests
// ---------------------------------------------------------------------------

/// One `config_<topic>.json` document per topic inside `dir`.
pub struct DirManifestSource {
    dir: PathBuf,
    topics: Vec<String>,
}

impl DirManifestSource {
    pub fn new(dir: impl Into<PathBuf>, topics: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            topics,
        }
    }

    pub fn manifest_path(&self, topic: &str) -> PathBuf {
        self.dir.join(format!("config_{topic}.json"))
    }
}

#[async_trait]
impl ManifestSource for DirManifestSource {
    async fn topics(&self) -> Result<Vec<String>> {
        Ok(self.topics.clone())
    }

    async fn manifest(&self, topic: &str) -> Result<Manifest> {
        let path = self.manifest_path(topic);
        let bytes = tokio::fs::read(&path).await?;
        let manifest: Manifest = serde_json::from_slice(&bytes)?;
        debug!(topic, path = %path.display(), attributes = manifest.attributes.len(), "Manifest read");
        Ok(manifest)
    }
}

// ---------------------------------------------------------------------------
// Question texts
// ---------------------------------------------------------------------------

/// Question wording read once from a JSON array of [`QuestionText`].
pub struct JsonQuestionTextLookup {
    questions: Vec<QuestionText>,
    active: HashMap<String, String>,
}

impl JsonQuestionTextLookup {
    /// Reads `path`. A missing file gives an empty lookup; any other read or
    /// parse failure is returned.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let questions: Vec<QuestionText> = match tokio::fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "Question file not found, questions will have no text");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), questions = questions.len(), "Question texts loaded");
        Ok(Self::from_questions(questions))
    }

    pub fn from_questions(questions: Vec<QuestionText>) -> Self {
        let mut active = HashMap::new();
        for q in questions.iter().filter(|q| q.active) {
            active
                .entry(q.attribute.clone())
                .or_insert_with(|| q.text.clone());
        }
        Self { questions, active }
    }
}

#[async_trait]
impl QuestionTextLookup for JsonQuestionTextLookup {
    async fn text_for(&self, attribute: &str) -> Result<Option<String>> {
        Ok(self.active.get(attribute).cloned())
    }

    async fn active_questions(&self) -> Result<Vec<QuestionText>> {
        Ok(self.questions.iter().filter(|q| q.active).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sibyl_core::error::SibylError;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sibyl-store-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_catalog_file_is_normalized() {
        let dir = scratch_dir();
        let path = dir.join("catalog.json");
        std::fs::write(
            &path,
            r#"[
                {"_id": "a1", "nombre": "Thor", "vuela": 1, "martillo": true, "bio": "god"},
                {"_id": "a2", "nombre": "Hulk", "vuela": 0, "martillo": null},
                {"nombre": "", "vuela": 1}
            ]"#,
        )
        .unwrap();

        let catalog = JsonFileCatalogSource::new(&path, "nombre").load().await.unwrap();

        assert_eq!(catalog.columns(), &["martillo", "vuela"]);
        assert_eq!(catalog.rows().len(), 2);
        assert_eq!(catalog.rows()[0].values, vec![1, 1]);
        assert_eq!(catalog.rows()[1].values, vec![0, 0]);
    }

    #[tokio::test]
    async fn test_missing_manifest_is_io_error() {
        let dir = scratch_dir();
        std::fs::write(dir.join("config_poderes.json"), r#"{"atributos": ["vuela"]}"#).unwrap();

        let source = DirManifestSource::new(&dir, vec!["poderes".into(), "armas".into()]);

        let manifest = source.manifest("poderes").await.unwrap();
        assert_eq!(manifest.attributes, vec!["vuela"]);
        assert!(matches!(source.manifest("armas").await.unwrap_err(), SibylError::Io(_)));
    }

    #[tokio::test]
    async fn test_question_lookup_serves_only_active_texts() {
        let dir = scratch_dir();
        let path = dir.join("preguntas.json");
        std::fs::write(
            &path,
            r#"[
                {"atributo": "vuela", "texto": "¿Puede volar?"},
                {"atributo": "martillo", "texto": "¿Usa martillo?", "activa": false}
            ]"#,
        )
        .unwrap();

        let lookup = JsonQuestionTextLookup::load(&path).await.unwrap();

        assert_eq!(lookup.text_for("vuela").await.unwrap().as_deref(), Some("¿Puede volar?"));
        assert_eq!(lookup.text_for("martillo").await.unwrap(), None);
        assert_eq!(lookup.active_questions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_question_file_gives_empty_lookup() {
        let lookup = JsonQuestionTextLookup::load(scratch_dir().join("absent.json"))
            .await
            .unwrap();
        assert!(lookup.active_questions().await.unwrap().is_empty());
    }
}
