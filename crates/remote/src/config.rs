//! Where the CRM API lives and how long to wait for it.
//!
//! Values come from explicit construction or from the environment
//! (`SUMMER_API_BASE`, `SUMMER_ENRICHMENT_BASE`, `SUMMER_HTTP_TIMEOUT_SECS`).

use std::time::Duration;

use url::Url;

use crate::enrichment::EnrichmentEndpoint;

pub const API_BASE_ENV: &str = "SUMMER_API_BASE";
pub const ENRICHMENT_BASE_ENV: &str = "SUMMER_ENRICHMENT_BASE";
pub const TIMEOUT_ENV: &str = "SUMMER_HTTP_TIMEOUT_SECS";

pub const DEFAULT_API_BASE: &str = "https://sd-6310-2025-summer-express-app.onrender.com/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: '{value}' is not a valid base URL: {reason}")]
    InvalidUrl {
        var: String,
        value: String,
        reason: String,
    },

    #[error("{var}: '{value}' is not a whole number of seconds")]
    InvalidTimeout { var: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base of the collection endpoints, e.g. `https://host/api`.
    pub api_base: Url,
    /// Base of the enrichment endpoints. Usually the same as `api_base`.
    pub enrichment_base: Url,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_base: Url) -> Self {
        ClientConfig {
            enrichment_base: api_base.clone(),
            api_base,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads configuration from the process environment, falling back to
    /// the public API base and a ten second timeout.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`ClientConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base = match lookup(API_BASE_ENV) {
            Some(value) => parse_base_url(API_BASE_ENV, &value)?,
            None => parse_base_url("default", DEFAULT_API_BASE)?,
        };
        let enrichment_base = match lookup(ENRICHMENT_BASE_ENV) {
            Some(value) => parse_base_url(ENRICHMENT_BASE_ENV, &value)?,
            None => api_base.clone(),
        };
        let timeout = match lookup(TIMEOUT_ENV) {
            Some(value) => {
                let secs = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidTimeout {
                        var: TIMEOUT_ENV.to_string(),
                        value: value.clone(),
                    })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        Ok(ClientConfig {
            api_base,
            enrichment_base,
            timeout,
        })
    }

    /// Replaces the API base. The enrichment base follows when it was
    /// tracking the old API base.
    pub fn with_api_base(mut self, api_base: Url) -> Self {
        if self.enrichment_base == self.api_base {
            self.enrichment_base = api_base.clone();
        }
        self.api_base = api_base;
        self
    }

    /// The four standard enrichment endpoints under `enrichment_base`.
    pub fn enrichment_endpoints(&self) -> Vec<EnrichmentEndpoint> {
        EnrichmentEndpoint::defaults(&self.enrichment_base)
    }
}

/// Parses an http(s) URL usable as a path prefix.
pub fn parse_base_url(var: &str, value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        var: var.to_string(),
        value: value.to_string(),
        reason,
    };
    let url = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("cannot be used as a base".to_string()));
    }
    Ok(url)
}

/// Appends path segments to `base`, keeping any existing prefix
/// (`/api` + `properties` = `/api/properties`).
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
