use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use sibyl_core::config::EngineConfig;
use sibyl_core::error::Result;
use sibyl_core::evidence::Evidence;
use sibyl_core::inference::{Inference, ModelSummary, NextQuestion};
use sibyl_core::source::{QuestionText, QuestionTextLookup};

use crate::cache::ModelCache;
use crate::resolve::resolve;
use crate::selector::select_next;

// ---------------------------------------------------------------------------
// GuessEngine
// ---------------------------------------------------------------------------

/// Entry point for callers: belief inference and next-question selection
/// over the cached networks.
pub struct GuessEngine {
    cache: Arc<ModelCache>,
    questions: Option<Arc<dyn QuestionTextLookup>>,
    config: EngineConfig,
}

impl GuessEngine {
    pub fn new(
        cache: Arc<ModelCache>,
        questions: Option<Arc<dyn QuestionTextLookup>>,
        config: EngineConfig,
    ) -> Self {
        Self {
            cache,
            questions,
            config,
        }
    }

    pub fn cache(&self) -> &Arc<ModelCache> {
        &self.cache
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Inference
    // ------------------------------------------------------------------

    /// Ranks the candidates given `evidence`. Entities named in `excluded`
    /// are never ranked or proposed; the rest is renormalized before
    /// thresholding.
    #[instrument(skip(self, evidence), fields(answers = evidence.len()))]
    pub async fn infer(&self, evidence: &Evidence, excluded: &[String]) -> Result<Inference> {
        let model = self.cache.get().await?;
        let belief = model.belief(evidence)?;

        let excluded: HashSet<&str> = excluded.iter().map(String::as_str).collect();
        let rejected: Vec<usize> = model
            .entities()
            .iter()
            .enumerate()
            .filter(|(_, name)| excluded.contains(name.as_str()))
            .map(|(i, _)| i)
            .collect();
        if !rejected.is_empty() {
            debug!(rejected = rejected.len(), "Leaving rejected entities out of the ranking");
        }

        let inference = resolve(model.entities(), &belief, &rejected, &self.config);

        info!(
            top = ?inference.ranked.first().map(|r| (&r.name, r.probability)),
            threshold_met = inference.threshold_met,
            "Inference complete"
        );

        Ok(inference)
    }

    // ------------------------------------------------------------------
    // Question selection
    // ------------------------------------------------------------------

    #[instrument(skip(self, evidence, excluded), fields(answers = evidence.len(), excluded = excluded.len()))]
    pub async fn next_question(
        &self,
        evidence: &Evidence,
        excluded: &[String],
    ) -> Result<NextQuestion> {
        let model = self.cache.get().await?;

        let choice = match select_next(&model, evidence, excluded) {
            Ok(choice) => choice,
            Err(reason) => {
                info!(reason = reason.message(), "No question selected");
                return Ok(NextQuestion::None { reason });
            }
        };

        let text = self.text_for(&choice.attribute).await;

        info!(
            attribute = %choice.attribute,
            gain = choice.expected_gain,
            p_true = choice.p_attr_true,
            "Next question selected"
        );

        Ok(NextQuestion::Ask { choice, text })
    }

    /// Question wording for `attribute`; lookup failures only drop the text.
    async fn text_for(&self, attribute: &str) -> Option<String> {
        let lookup = self.questions.as_ref()?;
        match lookup.text_for(attribute).await {
            Ok(text) => text,
            Err(e) => {
                warn!(attribute, error = %e, "Question text lookup failed");
                None
            }
        }
    }

    pub async fn active_questions(&self) -> Result<Vec<QuestionText>> {
        match &self.questions {
            Some(lookup) => lookup.active_questions().await,
            None => Ok(Vec::new()),
        }
    }

    // ------------------------------------------------------------------
    // Model lifecycle
    // ------------------------------------------------------------------

    pub async fn model_summary(&self) -> Option<ModelSummary> {
        self.cache.snapshot().await.map(|m| m.summary())
    }

    pub async fn warm_up(&self) -> Result<ModelSummary> {
        Ok(self.cache.get().await?.summary())
    }

    pub async fn retrain(&self) -> Result<ModelSummary> {
        Ok(self.cache.retrain().await?.summary())
    }

    pub async fn invalidate(&self) {
        self.cache.invalidate().await;
    }
}
