//! Error type definitions for the liga-hub service
//!
//! Upstream failures are deliberately boring: every [`FetchError`] is handled
//! the same way (fall back to the bundled mock dataset), so the variants exist
//! for logging and tests rather than for per-variant recovery logic.

use thiserror::Error;

/// Errors raised while fetching or normalizing upstream data
///
/// Covers both the football-data providers and the RSS feeds. A single
/// failure triggers mock fallback at the service layer; there is no retry.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failures (connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// Upstream payload could not be decoded or walked
    #[error("Parse error: {source_kind} - {message}")]
    Parse {
        source_kind: String,
        message: String,
    },

    /// A field the canonical mapping requires was absent or malformed
    #[error("Missing field: {field}")]
    MissingField { field: String },

    /// A feed request succeeded but yielded zero usable items
    #[error("Feed produced no usable items: {url}")]
    EmptyFeed { url: String },
}

impl FetchError {
    /// Create a parse error
    pub fn parse<S: Into<String>, M: Into<String>>(source_kind: S, message: M) -> Self {
        Self::Parse {
            source_kind: source_kind.into(),
            message: message.into(),
        }
    }

    /// Create a missing-field error
    pub fn missing_field<F: Into<String>>(field: F) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}

/// Request failures the web layer surfaces to clients
///
/// Everything else degrades silently to mock data; these are the exceptions.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Input validation failures (bad email, unknown transfer type, ...)
    #[error("{message}")]
    BadRequest { message: String },

    /// Resource lookup by id/name found nothing
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Unexpected internal failures
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// Create a bad-request error with a custom message
    pub fn bad_request<M: Into<String>>(message: M) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a not-found error for a specific resource
    pub fn not_found<R: Into<String>>(resource: R) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an internal error
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
