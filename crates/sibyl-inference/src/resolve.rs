use sibyl_core::config::EngineConfig;
use sibyl_core::inference::{Inference, RankedEntity};

use crate::posterior::Belief;

/// Ranks entities by descending probability and applies the acceptance
/// threshold. Ties keep canonical order.
///
/// Positions in `rejected` are left out entirely and the remaining mass is
/// renormalized when it is positive. Rejecting everything yields an empty
/// ranking with no candidate.
pub fn resolve(
    entities: &[String],
    belief: &Belief,
    rejected: &[usize],
    config: &EngineConfig,
) -> Inference {
    let n = belief.len().min(entities.len());
    let mut keep = vec![true; n];
    for &i in rejected {
        if let Some(k) = keep.get_mut(i) {
            *k = false;
        }
    }

    let probs = belief.probabilities();
    let mut order: Vec<usize> = (0..n).filter(|&i| keep[i]).collect();
    let mass: f64 = order.iter().map(|&i| probs[i]).sum();
    let scale = if mass > 0.0 { 1.0 / mass } else { 1.0 };

    // stable: equal probabilities stay in canonical order
    order.sort_by(|&a, &b| probs[b].total_cmp(&probs[a]));

    let threshold_met = order
        .first()
        .is_some_and(|&i| probs[i] * scale >= config.acceptance_threshold);
    let candidate = if threshold_met {
        order.first().map(|&i| entities[i].clone())
    } else {
        None
    };

    let ranked = order
        .into_iter()
        .take(config.top_k)
        .map(|i| RankedEntity {
            name: entities[i].clone(),
            probability: probs[i] * scale,
        })
        .collect();

    Inference {
        ranked,
        threshold_met,
        candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("E{i}")).collect()
    }

    fn belief(probs: &[f64]) -> Belief {
        Belief::from_weights(probs.to_vec())
    }

    #[test]
    fn test_threshold_met_at_exactly_half() {
        let out = resolve(&names(3), &belief(&[0.25, 0.5, 0.25]), &[], &EngineConfig::default());

        assert!(out.threshold_met);
        assert_eq!(out.candidate.as_deref(), Some("E1"));
        assert_eq!(out.ranked[0].name, "E1");
    }

    #[test]
    fn test_below_threshold_has_no_candidate() {
        let out = resolve(&names(3), &belief(&[0.4, 0.35, 0.25]), &[], &EngineConfig::default());

        assert!(!out.threshold_met);
        assert!(out.candidate.is_none());
        assert_eq!(out.ranked[0].name, "E0");
    }

    #[test]
    fn test_ties_keep_canonical_order() {
        let out = resolve(&names(4), &Belief::uniform(4), &[], &EngineConfig::default());
        let ranked: Vec<&str> = out.ranked.iter().map(|r| r.name.as_str()).collect();

        assert_eq!(ranked, vec!["E0", "E1", "E2", "E3"]);
    }

    #[test]
    fn test_ranked_list_is_truncated() {
        let out = resolve(&names(8), &Belief::uniform(8), &[], &EngineConfig::default());
        assert_eq!(out.ranked.len(), 5);

        let wide = EngineConfig {
            top_k: 10,
            ..EngineConfig::default()
        };
        assert_eq!(resolve(&names(8), &Belief::uniform(8), &[], &wide).ranked.len(), 8);
    }

    #[test]
    fn test_rejected_entities_are_not_ranked() {
        let out = resolve(&names(3), &belief(&[0.5, 0.3, 0.2]), &[0], &EngineConfig::default());
        let ranked: Vec<&str> = out.ranked.iter().map(|r| r.name.as_str()).collect();

        assert_eq!(ranked, vec!["E1", "E2"]);
        assert!((out.ranked[0].probability - 0.6).abs() < 1e-9);
        assert_eq!(out.candidate.as_deref(), Some("E1"));
    }

    #[test]
    fn test_rejecting_everyone_leaves_no_candidate() {
        let out = resolve(&names(2), &belief(&[0.9, 0.1]), &[1, 0, 7], &EngineConfig::default());

        assert!(out.ranked.is_empty());
        assert!(!out.threshold_met);
        assert!(out.candidate.is_none());
    }
}
