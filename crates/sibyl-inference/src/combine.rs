use sibyl_core::error::{Result, SibylError};

use crate::network::clipped_ln;
use crate::posterior::{Belief, Posterior};

/// Weight given to a network's vote: its consumed evidence count, floored at 1
/// so networks without evidence still take part.
pub fn weight(used: usize) -> f64 {
    used.max(1) as f64
}

/// Fuses per-network posteriors into one belief.
///
/// Each network contributes `max(1, used) * ln(belief)` per entity and the
/// sum is renormalized. The weighting is a heuristic: it trusts a topic in
/// proportion to how much evidence it absorbed, not to how reliable it is.
pub fn combine(posteriors: &[Posterior]) -> Result<Belief> {
    let Some(first) = posteriors.first() else {
        return Err(SibylError::Aggregation(
            "no network produced a posterior".into(),
        ));
    };

    let n = first.belief.len();
    if let Some(bad) = posteriors.iter().find(|p| p.belief.len() != n) {
        return Err(SibylError::Aggregation(format!(
            "posterior length mismatch: expected {n}, got {}",
            bad.belief.len()
        )));
    }

    let mut scores = vec![0.0; n];
    for posterior in posteriors {
        let w = weight(posterior.used);
        for (s, p) in scores.iter_mut().zip(posterior.belief.probabilities()) {
            *s += w * clipped_ln(*p);
        }
    }

    Ok(Belief::from_log_scores(&scores))
}
