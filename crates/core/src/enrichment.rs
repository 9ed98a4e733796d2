//! Decorative, best-effort data merged into pages and records.

use serde::{Deserialize, Serialize};

/// The fixed set of keys an enrichment endpoint may provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnrichmentKey {
    #[serde(rename = "quote")]
    Quote,
    #[serde(rename = "fortune")]
    Fortune,
    #[serde(rename = "color")]
    Color,
    #[serde(rename = "spiritAnimal")]
    SpiritAnimal,
}

impl EnrichmentKey {
    pub const ALL: [EnrichmentKey; 4] = [
        EnrichmentKey::Quote,
        EnrichmentKey::Fortune,
        EnrichmentKey::Color,
        EnrichmentKey::SpiritAnimal,
    ];

    /// The JSON field carrying this key in an endpoint's response body.
    pub fn field(&self) -> &'static str {
        match self {
            EnrichmentKey::Quote => "quote",
            EnrichmentKey::Fortune => "fortune",
            EnrichmentKey::Color => "color",
            EnrichmentKey::SpiritAnimal => "spiritAnimal",
        }
    }
}

/// Whatever enrichment succeeded on one fetch. Absent keys are omitted
/// when serialized, never `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fortune: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(
        rename = "spiritAnimal",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub spirit_animal: Option<String>,
}

impl EnrichmentPayload {
    pub fn get(&self, key: EnrichmentKey) -> Option<&str> {
        match key {
            EnrichmentKey::Quote => self.quote.as_deref(),
            EnrichmentKey::Fortune => self.fortune.as_deref(),
            EnrichmentKey::Color => self.color.as_deref(),
            EnrichmentKey::SpiritAnimal => self.spirit_animal.as_deref(),
        }
    }

    pub fn set(&mut self, key: EnrichmentKey, value: String) {
        let slot = match key {
            EnrichmentKey::Quote => &mut self.quote,
            EnrichmentKey::Fortune => &mut self.fortune,
            EnrichmentKey::Color => &mut self.color,
            EnrichmentKey::SpiritAnimal => &mut self.spirit_animal,
        };
        *slot = Some(value);
    }

    /// Key-wise union; `other` wins where both carry a key.
    pub fn merge(&mut self, other: EnrichmentPayload) {
        for key in EnrichmentKey::ALL {
            if let Some(value) = other.get(key) {
                self.set(key, value.to_string());
            }
        }
    }

    /// Keys present in this payload.
    pub fn keys(&self) -> Vec<EnrichmentKey> {
        EnrichmentKey::ALL
            .into_iter()
            .filter(|k| self.get(*k).is_some())
            .collect()
    }

    /// A page counts as connected when at least one key arrived.
    pub fn is_connected(&self) -> bool {
        !self.keys().is_empty()
    }
}
