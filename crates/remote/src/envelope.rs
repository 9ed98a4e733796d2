//! The `{ success, data?, message? }` wrapper every collection endpoint
//! returns, and its normalization into `Result`.

use serde::{Deserialize, Serialize};
use summer_core::{CrmError, Resource};

use crate::transport::HttpResponse;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// The collection operation a response belongs to; selects the fallback
/// message used when the API gives none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Save,
    Delete,
}

impl Operation {
    pub fn fallback<R: Resource>(self) -> String {
        match self {
            Operation::List => format!("Failed to fetch {}", R::COLLECTION),
            Operation::Save => format!("Failed to save {}", R::SINGULAR),
            Operation::Delete => format!("Failed to delete {}", R::SINGULAR),
        }
    }

    /// Message shown when the server could not be reached at all.
    pub fn unreachable<R: Resource>(self) -> String {
        match self {
            Operation::List => "Failed to connect to the server".to_string(),
            Operation::Save | Operation::Delete => self.fallback::<R>(),
        }
    }
}

/// Interprets a response as an envelope.
///
/// Non-2xx statuses and `success: false` become
/// [`CrmError::ServerRejection`] carrying the API's message, or `fallback`
/// when there is none. So does a 2xx body that is not an envelope. On
/// success the (possibly absent) `data` is returned undecoded.
pub fn interpret(
    response: &HttpResponse,
    fallback: &str,
) -> Result<Option<serde_json::Value>, CrmError> {
    let envelope: Option<ApiEnvelope<serde_json::Value>> =
        serde_json::from_str(&response.body).ok();
    let reject = |envelope: Option<ApiEnvelope<serde_json::Value>>| {
        let message = envelope
            .and_then(|e| e.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        CrmError::rejection(Some(response.status), message)
    };

    if !response.is_success() {
        return Err(reject(envelope));
    }
    match envelope {
        Some(envelope) if envelope.success => Ok(envelope.data),
        other => Err(reject(other)),
    }
}
