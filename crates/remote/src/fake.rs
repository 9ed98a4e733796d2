//! Scripted in-memory [`Transport`] for tests.
//!
//! Replies are queued per method and URL path. The last queued reply for a
//! route repeats once the queue is drained; unscripted routes answer 404.
//! Every request is recorded before its reply is produced.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use summer_core::CrmError;

use crate::transport::{HttpRequest, HttpResponse, Method, Transport};

#[derive(Debug, Clone, PartialEq)]
pub struct FakeReply {
    outcome: Result<HttpResponse, String>,
    delay: Duration,
}

impl FakeReply {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self::text(status, &body.to_string())
    }

    pub fn text(status: u16, body: &str) -> Self {
        FakeReply {
            outcome: Ok(HttpResponse {
                status,
                body: body.to_string(),
            }),
            delay: Duration::ZERO,
        }
    }

    /// No response at all; surfaces as a transport error.
    pub fn unreachable(message: &str) -> Self {
        FakeReply {
            outcome: Err(message.to_string()),
            delay: Duration::ZERO,
        }
    }

    /// Holds the reply back for `delay` after the request is recorded.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<FakeReply>>>,
    log: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `reply` for `method` requests whose URL path is `path`.
    pub fn script(&self, method: Method, path: &str, reply: FakeReply) {
        let mut routes = lock(&self.routes);
        routes
            .entry((method, normalize(path)))
            .or_default()
            .push_back(reply);
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.log).clone()
    }

    pub fn count(&self, method: Method) -> usize {
        lock(&self.log)
            .iter()
            .filter(|r| r.method == method)
            .count()
    }

    fn next_reply(&self, method: Method, path: &str) -> Option<FakeReply> {
        let mut routes = lock(&self.routes);
        let queue = routes.get_mut(&(method, normalize(path)))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, CrmError> {
        let method = request.method;
        let path = request.url.path().to_string();
        lock(&self.log).push(request);

        let reply = self.next_reply(method, &path).unwrap_or_else(|| {
            FakeReply::json(
                404,
                serde_json::json!({"success": false, "message": format!("no route for {path}")}),
            )
        });
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.outcome.map_err(CrmError::transport)
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
