//! The HTTP seam between CRM clients and the network.
//!
//! [`Transport`] is the only place a request leaves the process. The
//! production implementation, [`UreqTransport`], runs the blocking `ureq`
//! client on tokio's blocking pool; tests swap in
//! [`FakeTransport`](crate::fake::FakeTransport).

use std::time::Duration;

use async_trait::async_trait;
use summer_core::CrmError;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// One outgoing request. `body` is sent as JSON when present.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    pub fn get(url: Url) -> Self {
        HttpRequest {
            method: Method::Get,
            url,
            body: None,
        }
    }

    pub fn delete(url: Url) -> Self {
        HttpRequest {
            method: Method::Delete,
            url,
            body: None,
        }
    }

    pub fn post(url: Url, body: serde_json::Value) -> Self {
        HttpRequest {
            method: Method::Post,
            url,
            body: Some(body),
        }
    }

    pub fn put(url: Url, body: serde_json::Value) -> Self {
        HttpRequest {
            method: Method::Put,
            url,
            body: Some(body),
        }
    }
}

/// A response of any status. Non-2xx statuses are not transport errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and waits for the full response.
///
/// Returns `Err(CrmError::Transport)` only when no response was received
/// (connection refused, DNS failure, timeout).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, CrmError>;
}

/// Production transport backed by a shared `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// `timeout` bounds each whole request, connect through body.
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build();
        UreqTransport {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, CrmError> {
        let agent = self.agent.clone();
        let method = request.method;
        let url = request.url.to_string();

        tracing::debug!(method = method.as_str(), %url, "sending request");

        let result = tokio::task::spawn_blocking(move || {
            let response = match (request.method, request.body) {
                (Method::Get, _) => agent.get(&url).call(),
                (Method::Delete, _) => agent.delete(&url).call(),
                (Method::Post, Some(body)) => agent.post(&url).send_json(body),
                (Method::Post, None) => agent.post(&url).send_empty(),
                (Method::Put, Some(body)) => agent.put(&url).send_json(body),
                (Method::Put, None) => agent.put(&url).send_empty(),
            }
            .map_err(|e| CrmError::transport(e.to_string()))?;

            let status = response.status().as_u16();
            let body = response
                .into_body()
                .read_to_string()
                .map_err(|e| CrmError::transport(format!("failed to read response body: {}", e)))?;

            Ok(HttpResponse { status, body })
        })
        .await
        .map_err(|e| CrmError::transport(format!("task join error: {}", e)))?;

        if let Ok(response) = &result {
            tracing::debug!(
                method = method.as_str(),
                status = response.status,
                "response received"
            );
        }
        result
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
