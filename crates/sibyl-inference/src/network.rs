use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use sibyl_core::catalog::Catalog;
use sibyl_core::error::{Result, SibylError};

/// Laplace smoothing constant.
pub const ALPHA: f64 = 1.0;

/// Floor applied to every probability before taking its logarithm.
pub const EPSILON: f64 = 1e-9;

/// Natural log of `p`, clipped below at [`EPSILON`].
pub fn clipped_ln(p: f64) -> f64 {
    p.max(EPSILON).ln()
}

/// Per-entity log-likelihoods of one binary attribute.
#[derive(Debug, Clone)]
pub struct AttributeLikelihood {
    pub log_false: Vec<f64>,
    pub log_true: Vec<f64>,
}

impl AttributeLikelihood {
    pub fn for_value(&self, value: u8) -> &[f64] {
        if value == 0 {
            &self.log_false
        } else {
            &self.log_true
        }
    }

    /// `P(attr = 1 | entity)` for every entity.
    pub fn p_true(&self) -> impl Iterator<Item = f64> + '_ {
        self.log_true.iter().map(|l| l.exp())
    }
}

/// A Naive-Bayes classifier over one topic's attributes.
///
/// Every vector is indexed by the canonical entity order the network was
/// trained with.
#[derive(Debug, Clone)]
pub struct ThematicNetwork {
    name: String,
    attributes: Vec<String>,
    entities: Arc<[String]>,
    log_prior: Vec<f64>,
    likelihoods: HashMap<String, AttributeLikelihood>,
}

impl ThematicNetwork {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn entities(&self) -> &Arc<[String]> {
        &self.entities
    }

    pub fn log_prior(&self) -> &[f64] {
        &self.log_prior
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.likelihoods.contains_key(attribute)
    }

    pub fn likelihood(&self, attribute: &str) -> Option<&AttributeLikelihood> {
        self.likelihoods.get(attribute)
    }
}

/// Trains thematic networks from one catalog snapshot.
///
/// The canonical entity order is fixed when the trainer is built and shared
/// by every network it produces.
pub struct NetworkTrainer<'a> {
    catalog: &'a Catalog,
    entities: Arc<[String]>,
    index: HashMap<&'a str, usize>,
    row_counts: Vec<f64>,
}

impl<'a> NetworkTrainer<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        let entities: Arc<[String]> = catalog.entity_names().into();

        let mut index = HashMap::with_capacity(entities.len());
        for row in catalog.rows() {
            let next = index.len();
            index.entry(row.name.as_str()).or_insert(next);
        }

        let mut row_counts = vec![0.0; entities.len()];
        for row in catalog.rows() {
            row_counts[index[row.name.as_str()]] += 1.0;
        }

        Self {
            catalog,
            entities,
            index,
            row_counts,
        }
    }

    pub fn entities(&self) -> &Arc<[String]> {
        &self.entities
    }

    /// Builds the network for `topic`. Attributes absent from the catalog are
    /// dropped, repeated ones collapsed; an empty result is a configuration
    /// error.
    pub fn train(&self, topic: &str, attributes: &[String]) -> Result<ThematicNetwork> {
        let mut seen = HashSet::new();
        let attributes: Vec<String> = attributes
            .iter()
            .filter(|a| self.catalog.has_column(a) && seen.insert(a.as_str()))
            .cloned()
            .collect();

        if attributes.is_empty() {
            return Err(SibylError::configuration(
                topic,
                "no manifest attribute is present in the catalog",
            ));
        }

        let n = self.entities.len() as f64;
        let total: f64 = self.row_counts.iter().sum();
        let log_prior = self
            .row_counts
            .iter()
            .map(|c| clipped_ln((c + ALPHA) / (total + ALPHA * n)))
            .collect();

        let likelihoods: HashMap<String, AttributeLikelihood> = attributes
            .iter()
            .map(|a| (a.clone(), self.likelihood(a)))
            .collect();

        debug!(topic, attributes = attributes.len(), "Trained thematic network");

        Ok(ThematicNetwork {
            name: topic.to_string(),
            attributes,
            entities: self.entities.clone(),
            log_prior,
            likelihoods,
        })
    }

    fn likelihood(&self, attribute: &str) -> AttributeLikelihood {
        let mut true_counts = vec![0.0; self.entities.len()];
        if let Some(col) = self.catalog.column_position(attribute) {
            for row in self.catalog.rows() {
                if row.values[col] == 1 {
                    true_counts[self.index[row.name.as_str()]] += 1.0;
                }
            }
        }

        let (log_true, log_false) = true_counts
            .iter()
            .zip(&self.row_counts)
            .map(|(t, n)| {
                let p1 = (t + ALPHA) / (n + 2.0 * ALPHA);
                (clipped_ln(p1), clipped_ln(1.0 - p1))
            })
            .unzip();

        AttributeLikelihood {
            log_false,
            log_true,
        }
    }
}

/// Trains one network per topic, in topic-name order, skipping topics that
/// fail. Returns the networks keyed by topic together with the failures.
pub fn train_all(
    trainer: &NetworkTrainer<'_>,
    manifests: &BTreeMap<String, Vec<String>>,
) -> (BTreeMap<String, ThematicNetwork>, Vec<SibylError>) {
    let mut networks = BTreeMap::new();
    let mut failures = Vec::new();

    for (topic, attributes) in manifests {
        match trainer.train(topic, attributes) {
            Ok(network) => {
                networks.insert(topic.clone(), network);
            }
            Err(e) => failures.push(e),
        }
    }

    (networks, failures)
}
