// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for the identifiers REST client

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for client operations
pub type IdentifierClientResult<T> = std::result::Result<T, IdentifierClientError>;

/// Failures surfaced to the caller of the identifiers client
#[derive(Debug, Error)]
pub enum IdentifierClientError {
    /// No complete token pair is stored
    #[error("Not logged in: missing tokens")]
    NotLoggedIn,

    /// A JSON-encoded argument did not parse
    #[error("value for {field}: {value} is not encoded in JSON")]
    InvalidArgument { field: String, value: String },

    /// A required identity argument was not supplied
    #[error("missing required argument: {0}")]
    MissingArgument(String),

    /// The identity provider rejected the refresh token
    #[error("token refresh failed with HTTP status {status}: {detail}")]
    AuthRefreshFailed { status: StatusCode, detail: String },

    /// The identifiers service answered with a non-2xx status
    #[error("HTTP status {status}: {detail}")]
    Api { status: StatusCode, detail: String },

    #[error("credential store error: {0}")]
    Credentials(#[from] idc_credentials::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Pull a human-readable detail out of an error body.
/// Falls back to the raw text when the body is not a recognized JSON shape.
pub fn error_detail(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };

    for key in ["message", "detail", "error_description", "error"] {
        if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
            return text.to_string();
        }
    }

    if let Some(first) = value.get("errors").and_then(|e| e.as_array()).and_then(|e| e.first()) {
        for key in ["detail", "message", "title"] {
            if let Some(text) = first.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }

    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_prefers_message() {
        assert_eq!(
            error_detail(r#"{"code": "NotFound", "message": "No such namespace"}"#),
            "No such namespace"
        );
        assert_eq!(error_detail(r#"{"detail": "forbidden"}"#), "forbidden");
        assert_eq!(
            error_detail(r#"{"error": "invalid_grant", "error_description": "revoked"}"#),
            "revoked"
        );
    }

    #[test]
    fn test_error_detail_reads_errors_array() {
        assert_eq!(
            error_detail(r#"{"errors": [{"code": "x", "detail": "first"}, {"detail": "second"}]}"#),
            "first"
        );
    }

    #[test]
    fn test_error_detail_falls_back_to_text() {
        assert_eq!(error_detail("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_detail(r#"{"unrelated": 1}"#), r#"{"unrelated": 1}"#);
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = IdentifierClientError::InvalidArgument {
            field: "metadata".to_string(),
            value: "{bad}".to_string(),
        };
        assert_eq!(err.to_string(), "value for metadata: {bad} is not encoded in JSON");
    }
}
