use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use sibyl_core::catalog::Catalog;
use sibyl_core::error::{Result, SibylError};
use sibyl_core::evidence::Evidence;
use sibyl_core::inference::{ModelSummary, TopicSummary};

use crate::combine::combine;
use crate::network::{train_all, NetworkTrainer, ThematicNetwork};
use crate::posterior::{posterior, Belief, Posterior};

/// All networks produced by one training pass, sharing one entity order.
#[derive(Debug)]
pub struct ModelSet {
    id: Uuid,
    trained_at: DateTime<Utc>,
    entities: Arc<[String]>,
    networks: BTreeMap<String, ThematicNetwork>,
    owners: HashMap<String, String>,
}

impl ModelSet {
    /// Trains every topic in `manifests` against `catalog`.
    ///
    /// Topics are visited in name order and each attribute belongs to the
    /// first topic that lists it; later topics lose it. Topics left without
    /// attributes are skipped. Fails only when no topic trains.
    pub fn train(catalog: &Catalog, manifests: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let trainer = NetworkTrainer::new(catalog);

        let mut claimed: BTreeMap<&str, &str> = BTreeMap::new();
        let mut assigned: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (topic, attributes) in manifests {
            let mut own = Vec::with_capacity(attributes.len());
            for attribute in attributes {
                match claimed.get(attribute.as_str()) {
                    Some(owner) if *owner != topic.as_str() => {
                        warn!(
                            attribute = %attribute,
                            owner = %owner,
                            topic = %topic,
                            "Attribute listed by several topics, keeping first owner"
                        );
                    }
                    _ => {
                        claimed.insert(attribute.as_str(), topic.as_str());
                        own.push(attribute.clone());
                    }
                }
            }
            assigned.insert(topic.clone(), own);
        }

        let (networks, failures) = train_all(&trainer, &assigned);
        for failure in &failures {
            warn!(error = %failure, "Skipping thematic network");
        }
        if networks.is_empty() {
            return Err(SibylError::NoNetworksAvailable);
        }

        let owners = networks
            .values()
            .flat_map(|n| n.attributes().iter().map(|a| (a.clone(), n.name().to_string())))
            .collect();

        let set = Self {
            id: Uuid::new_v4(),
            trained_at: Utc::now(),
            entities: trainer.entities().clone(),
            networks,
            owners,
        };

        for network in set.networks.values() {
            info!(
                topic = network.name(),
                attributes = network.attributes().len(),
                "Thematic network trained"
            );
        }

        Ok(set)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    /// Canonical entity order shared by every network.
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    pub fn networks(&self) -> impl Iterator<Item = &ThematicNetwork> {
        self.networks.values()
    }

    pub fn network(&self, topic: &str) -> Option<&ThematicNetwork> {
        self.networks.get(topic)
    }

    /// The network an attribute belongs to.
    pub fn owner_of(&self, attribute: &str) -> Option<&ThematicNetwork> {
        self.owners
            .get(attribute)
            .and_then(|topic| self.networks.get(topic))
    }

    /// Union of all network attributes, sorted.
    pub fn attributes(&self) -> BTreeSet<&str> {
        self.owners.keys().map(String::as_str).collect()
    }

    /// Per-network posteriors for `evidence`, in topic order.
    pub fn posteriors(&self, evidence: &Evidence) -> Vec<Posterior> {
        self.networks
            .values()
            .map(|network| posterior(network, evidence))
            .collect()
    }

    /// Fused belief over all networks.
    pub fn belief(&self, evidence: &Evidence) -> Result<Belief> {
        combine(&self.posteriors(evidence))
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            model_id: self.id,
            trained_at: self.trained_at,
            entity_count: self.entities.len(),
            topics: self
                .networks
                .values()
                .map(|n| TopicSummary {
                    name: n.name().to_string(),
                    attribute_count: n.attributes().len(),
                })
                .collect(),
        }
    }
}
