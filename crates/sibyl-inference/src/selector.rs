use std::collections::HashSet;

use tracing::{debug, warn};

use sibyl_core::error::{Result, SibylError};
use sibyl_core::evidence::Evidence;
use sibyl_core::inference::{NoQuestionReason, QuestionChoice};

use crate::model::ModelSet;
use crate::posterior::Belief;

/// Picks the unanswered attribute with the largest expected information gain.
///
/// Candidates are scanned in lexicographic order and only a strictly larger
/// gain replaces the current best, so ties go to the first attribute.
pub fn select_next(
    model: &ModelSet,
    evidence: &Evidence,
    excluded: &[String],
) -> std::result::Result<QuestionChoice, NoQuestionReason> {
    let excluded: HashSet<&str> = excluded.iter().map(String::as_str).collect();
    let candidates: Vec<&str> = model
        .attributes()
        .into_iter()
        .filter(|a| !excluded.contains(a) && !evidence.is_answered(a))
        .collect();

    if candidates.is_empty() {
        return Err(NoQuestionReason::Exhausted);
    }

    let current = match model.belief(evidence) {
        Ok(belief) => belief,
        Err(e) => {
            warn!(error = %e, "Current belief unavailable, no question can be scored");
            return Err(NoQuestionReason::Unevaluable);
        }
    };
    let h_current = current.entropy();

    let mut best: Option<QuestionChoice> = None;
    for attribute in candidates {
        let choice = match score(model, evidence, &current, h_current, attribute) {
            Ok(choice) => choice,
            Err(e) => {
                warn!(attribute, error = %e, "Skipping attribute");
                continue;
            }
        };
        debug!(attribute, gain = choice.expected_gain, "Scored attribute");

        if best
            .as_ref()
            .map_or(true, |b| choice.expected_gain > b.expected_gain)
        {
            best = Some(choice);
        }
    }

    best.ok_or(NoQuestionReason::Unevaluable)
}

/// Expected entropy reduction from asking `attribute` given `current`.
fn score(
    model: &ModelSet,
    evidence: &Evidence,
    current: &Belief,
    h_current: f64,
    attribute: &str,
) -> Result<QuestionChoice> {
    let p1 = p_attr_true(model, current, attribute)?;
    let p0 = 1.0 - p1;

    let h_true = model.belief(&evidence.with(attribute, true))?.entropy();
    let h_false = model.belief(&evidence.with(attribute, false))?.entropy();
    let gain = h_current - (p1 * h_true + p0 * h_false);

    if !gain.is_finite() {
        return Err(SibylError::Internal(format!(
            "non-finite information gain for {attribute}"
        )));
    }

    Ok(QuestionChoice {
        attribute: attribute.to_string(),
        expected_gain: gain,
        p_attr_true: p1,
        entropy_if_false: h_false,
        entropy_if_true: h_true,
    })
}

/// `P(attr = 1)` under `belief`, read from the network owning the attribute
/// and clamped to `[0, 1]`.
pub fn p_attr_true(model: &ModelSet, belief: &Belief, attribute: &str) -> Result<f64> {
    let likelihood = model
        .owner_of(attribute)
        .and_then(|network| network.likelihood(attribute))
        .ok_or_else(|| SibylError::NotFound(format!("no network owns attribute {attribute}")))?;

    let p: f64 = belief
        .probabilities()
        .iter()
        .zip(likelihood.p_true())
        .map(|(b, p)| b * p)
        .sum();

    Ok(p.clamp(0.0, 1.0))
}
