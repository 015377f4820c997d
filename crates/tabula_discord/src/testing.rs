//! Scripted in-memory transport.

use crate::{RawResponse, Transport};
use async_trait::async_trait;
use reqwest::Method;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use tabula_error::{HttpError, TabulaResult};

/// One request seen by a [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// HTTP method
    pub method: String,
    /// Full path including the query string
    pub path: String,
    /// JSON body, if any
    pub body: Option<serde_json::Value>,
}

impl RecordedCall {
    /// Path with the query string removed.
    pub fn route(&self) -> &str {
        route_of(&self.path)
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Respond(RawResponse),
    Fail(String),
}

type RouteKey = (String, String);

/// Transport answering from per-route queues.
///
/// Routes are keyed by method and path without the query string. Each call
/// pops the next scripted answer for its route; the last answer of a queue is
/// sticky and repeats for every further call. Unscripted routes answer 404.
///
/// # Example
///
/// ```
/// use tabula_discord::MockTransport;
///
/// let mock = MockTransport::new();
/// mock.on("GET", "/users/@me", 200, r#"{"id":"1","username":"me"}"#);
/// mock.on("DELETE", "/channels/9/messages/5", 204, "");
/// assert!(mock.calls().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<RouteKey, VecDeque<Scripted>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    /// Empty transport; every route answers 404.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with `status` and `body` on `method` + `route`.
    pub fn on(&self, method: &str, route: &str, status: u16, body: impl Into<String>) -> &Self {
        self.on_response(method, route, RawResponse::new(status, body))
    }

    /// Queue a fully built response.
    pub fn on_response(&self, method: &str, route: &str, response: RawResponse) -> &Self {
        self.push(method, route, Scripted::Respond(response))
    }

    /// Queue a transport failure (no HTTP response at all).
    pub fn fail(&self, method: &str, route: &str, message: impl Into<String>) -> &Self {
        self.push(method, route, Scripted::Fail(message.into()))
    }

    /// Every call in the order it was made.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Calls made to `method` + `route`, query strings ignored.
    pub fn calls_to(&self, method: &str, route: &str) -> Vec<RecordedCall> {
        lock(&self.calls)
            .iter()
            .filter(|call| call.method.eq_ignore_ascii_case(method) && call.route() == route)
            .cloned()
            .collect()
    }

    /// Number of calls made with `method` whose route starts with `prefix`.
    pub fn count_prefixed(&self, method: &str, prefix: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| call.method.eq_ignore_ascii_case(method) && call.route().starts_with(prefix))
            .count()
    }

    fn push(&self, method: &str, route: &str, scripted: Scripted) -> &Self {
        lock(&self.routes)
            .entry((method.to_ascii_uppercase(), route.to_string()))
            .or_default()
            .push_back(scripted);
        self
    }

    fn next(&self, method: &str, path: &str) -> Option<Scripted> {
        let mut routes = lock(&self.routes);
        let queue = routes.get_mut(&(method.to_ascii_uppercase(), route_of(path).to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> TabulaResult<RawResponse> {
        lock(&self.calls).push(RecordedCall {
            method: method.as_str().to_string(),
            path: path.to_string(),
            body: body.cloned(),
        });

        match self.next(method.as_str(), path) {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(message)) => {
                Err(HttpError::for_request(method.as_str(), path, message).into())
            }
            None => Ok(RawResponse::new(
                404,
                r#"{"message": "Unknown route", "code": 0}"#,
            )),
        }
    }
}

fn route_of(path: &str) -> &str {
    path.split_once('?').map_or(path, |(route, _)| route)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
