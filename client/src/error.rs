//! Error types for client requests and the error slice.
//!
//! The taxonomy distinguishes the three failure shapes the backend contract
//! produces: transport failures (no response reached the client), plain
//! server errors (non-2xx), and validation errors (4xx with per-field
//! messages). All three are caught inside the effect that issued the
//! request; none propagate to views as a fault.

use crate::constants::SERVER_ERROR;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for API requests.
pub type Result<T> = std::result::Result<T, RequestError>;

/// A single field-level validation error from the backend
/// (`{ "errors": [{ "msg": ... }, ...] }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Human-readable message for the invalid field.
    pub msg: String,

    /// Name of the offending field, when the server reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

/// Request failure taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// No response reached the client (connection refused, DNS failure,
    /// timeout). Surfaced to the user as the generic server-error message.
    #[error("{}", SERVER_ERROR)]
    Transport {
        /// Underlying transport detail, for logs only.
        detail: String,
    },

    /// Non-2xx response without a structured validation body.
    #[error("{message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Server status text.
        message: String,
    },

    /// 4xx response carrying per-field validation errors.
    #[error("{message}")]
    Validation {
        /// HTTP status code.
        status: u16,
        /// Server status text.
        message: String,
        /// Field errors, in the order the server reported them.
        errors: Vec<FieldError>,
    },

    /// 2xx response whose body failed to decode into the expected shape.
    #[error("invalid response body: {detail}")]
    Decode {
        /// Decoder detail, for logs only.
        detail: String,
    },
}

impl RequestError {
    /// HTTP status of the failed response, when one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } | Self::Validation { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }

    /// The user-facing message: the server status text when a response was
    /// received, the generic server-error string otherwise.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Server { message, .. } | Self::Validation { message, .. } => message,
            Self::Transport { .. } | Self::Decode { .. } => SERVER_ERROR,
        }
    }

    /// Field-level validation errors, empty for non-validation failures.
    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation { errors, .. } => errors,
            _ => &[],
        }
    }

    /// The record stored in a slice's error field.
    #[must_use]
    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            msg: self.message().to_string(),
            status: self.status(),
        }
    }
}

/// Last-error record kept per slice. Never accumulated; each failure
/// replaces the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// User-facing message.
    pub msg: String,

    /// HTTP status, absent when the transport yielded no response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

/// Decode a JSON response body into its typed shape.
///
/// # Errors
///
/// Returns [`RequestError::Decode`] when the body does not match.
pub fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| RequestError::Decode {
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_surface_the_generic_message() {
        let err = RequestError::Transport {
            detail: "connection refused".to_string(),
        };
        assert_eq!(err.message(), SERVER_ERROR);
        assert_eq!(err.status(), None);

        let info = err.to_error_info();
        assert_eq!(info.msg, SERVER_ERROR);
        assert_eq!(info.status, None);
    }

    #[test]
    fn server_errors_carry_status_text_and_code() {
        let err = RequestError::Server {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert_eq!(err.message(), "Not Found");
        assert_eq!(err.status(), Some(404));
        assert!(err.field_errors().is_empty());
    }

    #[test]
    fn validation_errors_keep_field_order() {
        let err = RequestError::Validation {
            status: 400,
            message: "Bad Request".to_string(),
            errors: vec![
                FieldError {
                    msg: "Status is required".to_string(),
                    param: Some("status".to_string()),
                },
                FieldError {
                    msg: "Skills is required".to_string(),
                    param: Some("skills".to_string()),
                },
            ],
        };
        let msgs: Vec<_> = err.field_errors().iter().map(|f| f.msg.as_str()).collect();
        assert_eq!(msgs, vec!["Status is required", "Skills is required"]);
    }

    #[test]
    fn decode_maps_mismatches_to_decode_errors() {
        #[derive(serde::Deserialize)]
        struct Expected {
            #[allow(dead_code)]
            token: String,
        }

        let err = decode::<Expected>(serde_json::json!({"other": 1}));
        assert!(matches!(err, Err(RequestError::Decode { .. })));
    }
}
