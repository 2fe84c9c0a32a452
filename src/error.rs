//! Error types for the flowtrack library.
//!
//! This module provides a unified error type with explicit variants for
//! configuration, transport, authentication, API rejection, decoding,
//! and lookup failures. Keeping the kinds distinct lets callers choose
//! different handling: a transport failure may warrant a retry, a 4xx
//! API rejection generally does not.

use std::fmt;
use thiserror::Error;

/// The unified error type for flowtrack operations.
///
/// Nothing is retried internally; every error is returned to the caller
/// immediately with enough context (status code, response body) to decide
/// on a retry policy externally.
#[derive(Debug, Error)]
pub enum Error {
    /// A required credential or setting was missing at construction.
    /// No network call was attempted.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Network transport errors (connection, timeout, request/response IO).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors from the token endpoint.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// An entity endpoint returned an unexpected status.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// A response body did not match the expected JSON shape.
    #[error("decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// A convenience lookup matched zero records.
    ///
    /// Distinct from an empty but successful search, which returns an
    /// empty `Vec` rather than an error.
    #[error("no {entity} found with {field} = {value:?}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Input validation errors (invalid site URL).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error (request could not be sent or response body
    /// could not be read).
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint returned a non-200 status.
    ///
    /// Carries the HTTP status and the raw response body for diagnosis.
    #[error("token endpoint returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The token endpoint returned 200 but the body did not decode as a
    /// token response.
    #[error("malformed token response: {source}")]
    MalformedResponse {
        #[source]
        source: serde_json::Error,
    },
}

/// An entity endpoint rejected a request with an unexpected status.
///
/// The remote status code and raw body are preserved verbatim so the
/// caller can inspect the service's own error payload.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body text.
    pub body: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if !self.body.is_empty() {
            write!(f, ": {}", self.body)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, body: String) -> Self {
        Self { status, body }
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid site URL format.
    #[error("invalid site URL '{value}': {reason}")]
    SiteUrl { value: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_carries_status_and_body() {
        let err = ApiError::new(422, "{\"errors\":[]}".to_string());
        let display = err.to_string();
        assert!(display.contains("422"));
        assert!(display.contains("errors"));
    }

    #[test]
    fn api_error_display_without_body() {
        let err = ApiError::new(503, String::new());
        assert_eq!(err.to_string(), "HTTP 503");
    }
}
