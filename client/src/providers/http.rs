//! Production HTTP client adapter over `reqwest`.

use crate::config::ClientConfig;
use crate::constants::{AUTH_HEADER, SERVER_ERROR};
use crate::error::{FieldError, RequestError, Result};
use crate::providers::{ApiClient, Method, TokenStorage};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};

/// HTTP client adapter backed by `reqwest`.
///
/// Holds the token storage so the default header and the persisted value
/// always change together. The header is injected per request from the
/// current token, so a request already in flight keeps the header it was
/// issued with.
#[derive(Debug, Clone)]
pub struct HttpApiClient<T>
where
    T: TokenStorage + Clone,
{
    client: reqwest::Client,
    api_base: String,
    token: Arc<RwLock<Option<String>>>,
    storage: T,
}

impl<T> HttpApiClient<T>
where
    T: TokenStorage + Clone,
{
    /// Build the adapter for the configured server.
    ///
    /// # Errors
    ///
    /// Returns the underlying builder error when the TLS backend cannot be
    /// initialized.
    pub fn new(config: &ClientConfig, storage: T) -> std::result::Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base(),
            token: Arc::new(RwLock::new(None)),
            storage,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }

    fn current_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn builder(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let builder = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Delete => self.client.delete(url),
        };

        match self.current_token() {
            Some(token) => builder.header(AUTH_HEADER, token),
            None => builder,
        }
    }

    async fn dispatch(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request.send().await.map_err(|error| {
            tracing::warn!(%error, "Request failed before a response was received");
            RequestError::Transport {
                detail: error.to_string(),
            }
        })?;

        Self::handle_response(response).await
    }

    /// Map a settled response per the adapter contract: decoded body on
    /// 2xx, status text plus optional field errors otherwise.
    async fn handle_response(response: reqwest::Response) -> Result<Value> {
        let status = response.status();

        if status.is_success() {
            let text = response.text().await.map_err(|error| {
                RequestError::Transport {
                    detail: error.to_string(),
                }
            })?;

            if text.is_empty() {
                return Ok(Value::Null);
            }

            return serde_json::from_str(&text).map_err(|error| RequestError::Decode {
                detail: error.to_string(),
            });
        }

        let code = status.as_u16();
        let message = status
            .canonical_reason()
            .unwrap_or(SERVER_ERROR)
            .to_string();

        // Validation failures carry `{ "errors": [{ "msg": ... }, ...] }`.
        let body: Option<Value> = response.json().await.ok();
        let errors = body
            .as_ref()
            .and_then(|body| body.get("errors"))
            .and_then(|errors| serde_json::from_value::<Vec<FieldError>>(errors.clone()).ok());

        match errors {
            Some(errors) if !errors.is_empty() => {
                tracing::debug!(status = code, fields = errors.len(), "Validation failure");
                Err(RequestError::Validation {
                    status: code,
                    message,
                    errors,
                })
            },
            _ => {
                tracing::debug!(status = code, %message, "Server failure");
                Err(RequestError::Server {
                    status: code,
                    message,
                })
            },
        }
    }
}

impl<T> ApiClient for HttpApiClient<T>
where
    T: TokenStorage + Clone,
{
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = self.url(path);
        tracing::debug!(%method, %url, "Issuing API request");

        let mut request = self.builder(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        self.dispatch(request).await
    }

    async fn post_multipart(
        &self,
        path: &str,
        field: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<Value> {
        let url = self.url(path);
        tracing::debug!(%url, size = bytes.len(), "Uploading multipart body");

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part(field.to_string(), part);
        let request = self.builder(Method::Post, &url).multipart(form);

        self.dispatch(request).await
    }

    fn set_auth_token(&self, token: Option<&str>) {
        let mut current = self.token.write().unwrap_or_else(PoisonError::into_inner);
        match token {
            Some(token) => {
                *current = Some(token.to_string());
                self.storage.save(token);
            },
            None => {
                *current = None;
                self.storage.clear();
            },
        }
    }
}
