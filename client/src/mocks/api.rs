//! Mock HTTP API client.

use crate::error::{RequestError, Result};
use crate::providers::{ApiClient, Method};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// One request the mock observed.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: Method,
    /// Request path.
    pub path: String,
    /// JSON body, when one was sent.
    pub body: Option<Value>,
}

#[derive(Default)]
struct Inner {
    responses: Mutex<HashMap<(Method, String), VecDeque<Result<Value>>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    token_calls: Mutex<Vec<Option<String>>>,
    token: RwLock<Option<String>>,
}

/// Mock API client with scripted responses.
///
/// Responses are queued per `(method, path)` and consumed in order. An
/// unscripted request settles as a transport failure, so a test that
/// expected no request to be issued fails loudly on the recorded call
/// rather than hanging.
#[derive(Clone, Default)]
pub struct MockApiClient {
    inner: Arc<Inner>,
}

impl MockApiClient {
    /// Fresh mock with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next request matching `method` + `path`.
    pub fn respond(&self, method: Method, path: &str, result: Result<Value>) {
        self.lock(&self.inner.responses)
            .entry((method, path.to_string()))
            .or_default()
            .push_back(result);
    }

    /// Builder-style [`MockApiClient::respond`].
    #[must_use]
    pub fn with_response(self, method: Method, path: &str, result: Result<Value>) -> Self {
        self.respond(method, path, result);
        self
    }

    /// Every request issued through this mock, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock(&self.inner.requests).clone()
    }

    /// Every `set_auth_token` invocation, in order.
    #[must_use]
    pub fn token_calls(&self) -> Vec<Option<String>> {
        self.lock(&self.inner.token_calls).clone()
    }

    /// The token the adapter currently injects.
    #[must_use]
    pub fn current_token(&self) -> Option<String> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn lock<'a, T>(&self, mutex: &'a Mutex<T>) -> MutexGuard<'a, T> {
        mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take_response(&self, method: Method, path: &str) -> Result<Value> {
        self.lock(&self.inner.responses)
            .get_mut(&(method, path.to_string()))
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(RequestError::Transport {
                    detail: format!("no scripted response for {method} {path}"),
                })
            })
    }

    fn record(&self, method: Method, path: &str, body: Option<Value>) {
        self.lock(&self.inner.requests).push(RecordedRequest {
            method,
            path: path.to_string(),
            body,
        });
    }
}

impl ApiClient for MockApiClient {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        self.record(method, path, body);
        self.take_response(method, path)
    }

    async fn post_multipart(
        &self,
        path: &str,
        _field: &str,
        _filename: &str,
        _bytes: Vec<u8>,
    ) -> Result<Value> {
        self.record(Method::Post, path, None);
        self.take_response(Method::Post, path)
    }

    fn set_auth_token(&self, token: Option<&str>) {
        let token = token.map(ToString::to_string);
        self.lock(&self.inner.token_calls).push(token.clone());
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = token;
    }
}
