pub mod api_types;
pub mod catalog;
pub mod config;
pub mod error;
pub mod evidence;
pub mod inference;
pub mod source;

pub use catalog::{Catalog, CatalogRow, Manifest};
pub use config::{AppConfig, EngineConfig};
pub use error::{Result, SibylError};
pub use evidence::Evidence;
pub use inference::{
    Inference, ModelSummary, NextQuestion, NoQuestionReason, QuestionChoice, RankedEntity,
    TopicSummary,
};
pub use source::{CatalogSource, ManifestSource, QuestionText, QuestionTextLookup};
