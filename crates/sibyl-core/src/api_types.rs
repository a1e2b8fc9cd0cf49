use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::evidence::Evidence;
use crate::inference::{Inference, ModelSummary, NextQuestion, RankedEntity, TopicSummary};
use crate::source::QuestionText;

// --- Health ---

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model_loaded: bool,
    pub topic_count: usize,
    pub entity_count: usize,
}

// --- Inference ---

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InferRequest {
    #[serde(default, alias = "respuestas")]
    pub answers: Evidence,
    /// Entities the player already rejected.
    #[serde(default, alias = "excluir")]
    pub excluded_entities: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InferResponse {
    pub ranked: Vec<RankedEntity>,
    pub threshold_met: bool,
    pub candidate: Option<String>,
}

impl From<Inference> for InferResponse {
    fn from(i: Inference) -> Self {
        Self {
            ranked: i.ranked,
            threshold_met: i.threshold_met,
            candidate: i.candidate,
        }
    }
}

// --- Questions ---

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NextQuestionRequest {
    #[serde(default, alias = "respuestas")]
    pub answers: Evidence,
    #[serde(default, alias = "excluidas")]
    pub excluded_attributes: Vec<String>,
}

/// A null `attribute` means no further useful question remains; `message`
/// then says why.
#[derive(Debug, Serialize, Deserialize)]
pub struct NextQuestionResponse {
    pub attribute: Option<String>,
    pub text: Option<String>,
    pub expected_gain: Option<f64>,
    pub p_attr_true: Option<f64>,
    pub entropy_if_false: Option<f64>,
    pub entropy_if_true: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

impl From<NextQuestion> for NextQuestionResponse {
    fn from(next: NextQuestion) -> Self {
        match next {
            NextQuestion::Ask { choice, text } => Self {
                attribute: Some(choice.attribute),
                text,
                expected_gain: Some(choice.expected_gain),
                p_attr_true: Some(choice.p_attr_true),
                entropy_if_false: Some(choice.entropy_if_false),
                entropy_if_true: Some(choice.entropy_if_true),
                message: None,
            },
            NextQuestion::None { reason } => Self {
                attribute: None,
                text: None,
                expected_gain: None,
                p_attr_true: None,
                entropy_if_false: None,
                entropy_if_true: None,
                message: Some(reason.message().to_string()),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionListResponse {
    pub questions: Vec<QuestionText>,
}

// --- Model ---

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelStatusResponse {
    pub loaded: bool,
    pub model_id: Option<Uuid>,
    pub trained_at: Option<DateTime<Utc>>,
    pub entity_count: usize,
    pub topics: Vec<TopicSummary>,
}

impl From<Option<ModelSummary>> for ModelStatusResponse {
    fn from(summary: Option<ModelSummary>) -> Self {
        match summary {
            Some(s) => Self {
                loaded: true,
                model_id: Some(s.model_id),
                trained_at: Some(s.trained_at),
                entity_count: s.entity_count,
                topics: s.topics,
            },
            None => Self {
                loaded: false,
                model_id: None,
                trained_at: None,
                entity_count: 0,
                topics: Vec::new(),
            },
        }
    }
}
