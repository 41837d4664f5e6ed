//! External collaborators of the state layer.
//!
//! This module defines traits for everything the client reaches outside its
//! own state tree for: the HTTP API, durable token storage, the router, and
//! the destructive-operation confirmation dialog.
//!
//! Providers are **interfaces**, not implementations. Reducers depend on
//! these traits through the environment; production wiring injects the real
//! services and tests inject the mocks in [`crate::mocks`].

use crate::error::Result;
use serde_json::Value;
use std::future::Future;

pub mod confirm;
pub mod http;
pub mod navigator;
pub mod storage;

// Re-export provider traits and production implementations
pub use confirm::{ConfirmPrompt, TerminalConfirm};
pub use http::HttpApiClient;
pub use navigator::{LoggingNavigator, Navigator};
pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};

/// HTTP method of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// The HTTP client adapter.
///
/// Wraps outbound requests with the configured base URL and auth-token
/// header injection. The adapter owns BOTH token sinks outside the state
/// tree: its default header and the persisted storage move together through
/// [`ApiClient::set_auth_token`], which the store-level subscription invokes
/// whenever the in-memory token changes.
pub trait ApiClient: Send + Sync {
    /// Issue a request against the configured base URL.
    ///
    /// Resolves to the decoded response body on 2xx and to a
    /// [`crate::error::RequestError`] on non-2xx or transport failure.
    fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> impl Future<Output = Result<Value>> + Send;

    /// Issue a multipart POST (image upload).
    fn post_multipart(
        &self,
        path: &str,
        field: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<Value>> + Send;

    /// Set or clear the auth token.
    ///
    /// With a token: install the default `x-auth-token` header for all
    /// subsequent requests AND persist the token to durable storage. Without
    /// one: remove the header and delete the persisted value. Idempotent.
    /// A request already in flight keeps the header it was issued with.
    fn set_auth_token(&self, token: Option<&str>);

    /// GET convenience.
    fn get(&self, path: &str) -> impl Future<Output = Result<Value>> + Send {
        self.request(Method::Get, path, None)
    }

    /// POST convenience.
    fn post(&self, path: &str, body: Value) -> impl Future<Output = Result<Value>> + Send {
        self.request(Method::Post, path, Some(body))
    }

    /// PUT convenience.
    fn put(&self, path: &str, body: Value) -> impl Future<Output = Result<Value>> + Send {
        self.request(Method::Put, path, Some(body))
    }

    /// DELETE convenience.
    fn delete(&self, path: &str) -> impl Future<Output = Result<Value>> + Send {
        self.request(Method::Delete, path, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_display_as_http_verbs() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}
