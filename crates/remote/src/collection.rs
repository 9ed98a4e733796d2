//! Typed client for one REST collection (`/agents`, `/leads`, `/properties`).

use std::marker::PhantomData;
use std::sync::Arc;

use summer_core::{CrmError, Resource};
use url::Url;

use crate::config::join_segments;
use crate::envelope::{interpret, Operation};
use crate::transport::{HttpRequest, Transport};

/// `GET|POST /<collection>` and `PUT|DELETE /<collection>/<id>` for one
/// resource type, with every failure normalized into [`CrmError`].
pub struct CollectionClient<R> {
    transport: Arc<dyn Transport>,
    endpoint: Url,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for CollectionClient<R> {
    fn clone(&self) -> Self {
        CollectionClient {
            transport: Arc::clone(&self.transport),
            endpoint: self.endpoint.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Resource> CollectionClient<R> {
    pub fn new(transport: Arc<dyn Transport>, api_base: &Url) -> Self {
        CollectionClient {
            transport,
            endpoint: join_segments(api_base, &[R::COLLECTION]),
            _record: PhantomData,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Collection URL with `query` appended in order. An empty query adds
    /// no `?`.
    pub fn list_url(&self, query: &[(String, String)]) -> Url {
        let mut url = self.endpoint.clone();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    fn record_url(&self, id: i64) -> Url {
        let id = id.to_string();
        join_segments(&self.endpoint, &[id.as_str()])
    }

    pub async fn list(&self, query: &[(String, String)]) -> Result<Vec<R>, CrmError> {
        let request = HttpRequest::get(self.list_url(query));
        let data = self.execute(request, Operation::List).await?;
        match data {
            None => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value).map_err(|e| {
                tracing::warn!(collection = R::COLLECTION, error = %e, "malformed list payload");
                CrmError::rejection(None, Operation::List.fallback::<R>())
            }),
        }
    }

    /// POSTs a new record. Returns the created record when the server
    /// echoes one back.
    pub async fn create(&self, payload: serde_json::Value) -> Result<Option<R>, CrmError> {
        let request = HttpRequest::post(self.endpoint.clone(), payload);
        let data = self.execute(request, Operation::Save).await?;
        Ok(decode_echo(data))
    }

    /// PUTs the updatable fields of record `id`.
    pub async fn update(&self, id: i64, payload: serde_json::Value) -> Result<Option<R>, CrmError> {
        let request = HttpRequest::put(self.record_url(id), payload);
        let data = self.execute(request, Operation::Save).await?;
        Ok(decode_echo(data))
    }

    pub async fn delete(&self, id: i64) -> Result<(), CrmError> {
        let request = HttpRequest::delete(self.record_url(id));
        self.execute(request, Operation::Delete).await.map(|_| ())
    }

    async fn execute(
        &self,
        request: HttpRequest,
        op: Operation,
    ) -> Result<Option<serde_json::Value>, CrmError> {
        let method = request.method.as_str();
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(collection = R::COLLECTION, method, error = %e, "server unreachable");
                return Err(CrmError::transport(op.unreachable::<R>()));
            }
        };
        let result = interpret(&response, &op.fallback::<R>());
        if let Err(e) = &result {
            tracing::warn!(
                collection = R::COLLECTION,
                method,
                status = response.status,
                reason = e.message(),
                "request rejected"
            );
        }
        result
    }
}

fn decode_echo<R: Resource>(data: Option<serde_json::Value>) -> Option<R> {
    data.and_then(|value| serde_json::from_value(value).ok())
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
