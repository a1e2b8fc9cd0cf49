use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedEntity {
    pub name: String,
    pub probability: f64,
}

/// Result of resolving a fused belief against the acceptance threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Inference {
    /// Best entities first, truncated to the configured length.
    pub ranked: Vec<RankedEntity>,
    pub threshold_met: bool,
    /// Set only when `threshold_met` is true.
    pub candidate: Option<String>,
}

/// The most informative attribute to ask about next.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionChoice {
    pub attribute: String,
    pub expected_gain: f64,
    pub p_attr_true: f64,
    pub entropy_if_false: f64,
    pub entropy_if_true: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoQuestionReason {
    /// Every attribute was answered or excluded.
    Exhausted,
    /// Candidates remained but none could be scored.
    Unevaluable,
}

impl NoQuestionReason {
    pub fn message(&self) -> &'static str {
        match self {
            NoQuestionReason::Exhausted => "no further useful question",
            NoQuestionReason::Unevaluable => "no question could be evaluated",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NextQuestion {
    Ask {
        choice: QuestionChoice,
        text: Option<String>,
    },
    None {
        reason: NoQuestionReason,
    },
}

impl NextQuestion {
    pub fn attribute(&self) -> Option<&str> {
        match self {
            NextQuestion::Ask { choice, .. } => Some(&choice.attribute),
            NextQuestion::None { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicSummary {
    pub name: String,
    pub attribute_count: usize,
}

/// Description of one trained model set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelSummary {
    pub model_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub entity_count: usize,
    pub topics: Vec<TopicSummary>,
}
