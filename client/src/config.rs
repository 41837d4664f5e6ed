//! Client configuration.
//!
//! Configuration values are provided by the application shell, not
//! hardcoded; the defaults point at the local development server.

use std::time::Duration;

/// Environment variable overriding the server origin.
pub const SERVER_URL_VAR: &str = "WORKNET_SERVER_URL";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server origin (scheme + host + port), without the `/api` suffix.
    pub server_url: String,

    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Configuration for the given server origin.
    #[must_use]
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Set the per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Configuration from the environment, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(SERVER_URL_VAR).map_or_else(|_| Self::default(), Self::new)
    }

    /// The API base every request path is joined onto.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("{}/api", self.server_url.trim_end_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:5000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_base_joins_cleanly() {
        assert_eq!(
            ClientConfig::new("http://localhost:5000").api_base(),
            "http://localhost:5000/api"
        );
        assert_eq!(
            ClientConfig::new("https://api.example.com/").api_base(),
            "https://api.example.com/api"
        );
    }
}
