use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Answers collected so far, keyed by attribute id.
///
/// Values are kept as raw JSON so that a malformed answer only invalidates
/// its own entry: `0`/`1` (or `false`/`true`) are observations, `null` means
/// unknown, anything else is ignored by inference.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Evidence(BTreeMap<String, Value>);

impl Evidence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a binary observation, replacing any previous answer.
    pub fn observe(&mut self, attribute: impl Into<String>, value: bool) {
        self.0.insert(attribute.into(), Value::from(u8::from(value)));
    }

    /// Copy of this evidence with one extra observation.
    pub fn with(&self, attribute: &str, value: bool) -> Self {
        let mut next = self.clone();
        next.observe(attribute, value);
        next
    }

    pub fn insert_raw(&mut self, attribute: impl Into<String>, value: Value) {
        self.0.insert(attribute.into(), value);
    }

    /// The observed value of `attribute`, if it was answered with a binary value.
    pub fn binary(&self, attribute: &str) -> Option<u8> {
        self.0.get(attribute).and_then(as_binary)
    }

    /// Binary observations in attribute order; unknown and malformed entries are skipped.
    pub fn observations(&self) -> impl Iterator<Item = (&str, u8)> {
        self.0
            .iter()
            .filter_map(|(k, v)| as_binary(v).map(|b| (k.as_str(), b)))
    }

    /// Whether `attribute` carries any non-null answer, binary or not.
    pub fn is_answered(&self, attribute: &str) -> bool {
        self.0.get(attribute).is_some_and(|v| !v.is_null())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<u8>)> for Evidence {
    fn from_iter<T: IntoIterator<Item = (K, Option<u8>)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.map(Value::from).unwrap_or(Value::Null)))
                .collect(),
        )
    }
}

/// Interprets a JSON value as a binary observation.
pub(crate) fn as_binary(value: &Value) -> Option<u8> {
    match value {
        Value::Bool(b) => Some(u8::from(*b)),
        Value::Number(n) => match n.as_f64() {
            Some(x) if x == 0.0 => Some(0),
            Some(x) if x == 1.0 => Some(1),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_observations_skip_null_and_malformed_entries() {
        let evidence: Evidence = serde_json::from_value(json!({
            "puede_volar": 1,
            "es_vengador": null,
            "usa_escudo": 2,
            "tiene_magia": "si",
            "es_x_men": false,
        }))
        .unwrap();

        let observed: Vec<_> = evidence.observations().collect();
        assert_eq!(observed, vec![("es_x_men", 0), ("puede_volar", 1)]);
    }

    #[test]
    fn test_is_answered_counts_any_non_null_value() {
        let evidence: Evidence =
            serde_json::from_value(json!({ "a": null, "b": 7, "c": 0 })).unwrap();

        assert!(!evidence.is_answered("a"));
        assert!(evidence.is_answered("b"));
        assert!(evidence.is_answered("c"));
        assert!(!evidence.is_answered("missing"));
    }

    #[test]
    fn test_with_leaves_the_source_evidence_untouched() {
        let base: Evidence = [("a", Some(1u8))].into_iter().collect();
        let extended = base.with("b", false);

        assert_eq!(base.len(), 1);
        assert_eq!(extended.binary("b"), Some(0));
        assert_eq!(extended.binary("a"), Some(1));
    }
}
