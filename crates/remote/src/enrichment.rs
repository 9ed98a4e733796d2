//! Best-effort fan-out to the decorative enrichment endpoints.

use std::sync::Arc;

use futures::future::join_all;
use summer_core::{EnrichmentKey, EnrichmentPayload};
use url::Url;

use crate::config::join_segments;
use crate::transport::{HttpRequest, Transport};

/// One enrichment endpoint and the JSON field it is expected to carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentEndpoint {
    pub url: Url,
    pub key: EnrichmentKey,
}

impl EnrichmentEndpoint {
    pub fn new(url: Url, key: EnrichmentKey) -> Self {
        EnrichmentEndpoint { url, key }
    }

    /// `/quote`, `/fortune-cookie`, `/color` and `/spirit-animal` under `base`.
    pub fn defaults(base: &Url) -> Vec<EnrichmentEndpoint> {
        EnrichmentKey::ALL
            .into_iter()
            .map(|key| EnrichmentEndpoint::new(join_segments(base, &[default_path(key)]), key))
            .collect()
    }
}

fn default_path(key: EnrichmentKey) -> &'static str {
    match key {
        EnrichmentKey::Quote => "quote",
        EnrichmentKey::Fortune => "fortune-cookie",
        EnrichmentKey::Color => "color",
        EnrichmentKey::SpiritAnimal => "spirit-animal",
    }
}

pub struct EnrichmentAggregator {
    transport: Arc<dyn Transport>,
}

impl EnrichmentAggregator {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        EnrichmentAggregator { transport }
    }

    /// Issues every GET at once and waits for all of them to settle.
    ///
    /// The result holds only the keys whose endpoint answered 2xx with a
    /// non-empty string under the expected field. Individual failures are
    /// logged at debug level and otherwise ignored. If two endpoints
    /// claim the same key, the later one in `endpoints` wins regardless
    /// of completion order.
    pub async fn fetch_all(&self, endpoints: &[EnrichmentEndpoint]) -> EnrichmentPayload {
        let settled = join_all(endpoints.iter().map(|endpoint| self.fetch_one(endpoint))).await;

        let payload = settled
            .into_iter()
            .fold(EnrichmentPayload::default(), |mut payload, one| {
                payload.merge(one);
                payload
            });
        tracing::debug!(keys = payload.keys().len(), "enrichment settled");
        payload
    }

    /// The endpoint's single key, or an empty payload when it failed.
    async fn fetch_one(&self, endpoint: &EnrichmentEndpoint) -> EnrichmentPayload {
        let key = endpoint.key.field();
        let response = match self.transport.send(HttpRequest::get(endpoint.url.clone())).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(key, error = %e, "enrichment endpoint unreachable");
                return EnrichmentPayload::default();
            }
        };
        if !response.is_success() {
            tracing::debug!(key, status = response.status, "enrichment endpoint failed");
            return EnrichmentPayload::default();
        }
        let value = serde_json::from_str::<serde_json::Value>(&response.body)
            .ok()
            .and_then(|body| body.get(key)?.as_str().map(str::to_string))
            .filter(|value| !value.trim().is_empty());
        let mut payload = EnrichmentPayload::default();
        match value {
            Some(value) => payload.set(endpoint.key, value),
            None => tracing::debug!(key, "enrichment response missing field"),
        }
        payload
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
