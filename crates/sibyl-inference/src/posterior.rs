use sibyl_core::evidence::Evidence;

use crate::network::{ThematicNetwork, EPSILON};

/// Probability distribution over the canonical entity order.
#[derive(Debug, Clone, PartialEq)]
pub struct Belief(Vec<f64>);

impl Belief {
    /// Normalizes log-scores with a max-shifted softmax. Falls back to a
    /// uniform distribution when the scores cannot be normalized.
    pub fn from_log_scores(scores: &[f64]) -> Self {
        if scores.is_empty() {
            return Self(Vec::new());
        }

        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return Self::uniform(scores.len());
        }

        let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let sum: f64 = exps.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Self::uniform(scores.len());
        }

        Self(exps.into_iter().map(|e| e / sum).collect())
    }

    /// Normalizes non-negative weights; uniform if they sum to zero.
    pub fn from_weights(weights: Vec<f64>) -> Self {
        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Self::uniform(weights.len());
        }
        Self(weights.into_iter().map(|w| w / sum).collect())
    }

    pub fn uniform(n: usize) -> Self {
        Self(vec![1.0 / n as f64; n])
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Shannon entropy in bits, with probabilities clipped at [`EPSILON`].
    pub fn entropy(&self) -> f64 {
        -self
            .0
            .iter()
            .map(|p| {
                let p = p.max(EPSILON);
                p * p.log2()
            })
            .sum::<f64>()
    }
}

/// One network's belief plus the number of evidence entries it consumed.
#[derive(Debug, Clone)]
pub struct Posterior {
    pub belief: Belief,
    pub used: usize,
}

/// Adds the log-likelihood of every usable observation to the network's
/// log-prior and normalizes. Observations on attributes the network does
/// not own are ignored.
pub fn posterior(network: &ThematicNetwork, evidence: &Evidence) -> Posterior {
    let mut scores = network.log_prior().to_vec();
    let mut used = 0;

    for (attribute, value) in evidence.observations() {
        let Some(likelihood) = network.likelihood(attribute) else {
            continue;
        };
        for (s, l) in scores.iter_mut().zip(likelihood.for_value(value)) {
            *s += l;
        }
        used += 1;
    }

    Posterior {
        belief: Belief::from_log_scores(&scores),
        used,
    }
}
