//! Centralized error handling for the liga-hub service
//!
//! Errors are split by layer: [`FetchError`] for everything that can go wrong
//! talking to an upstream provider or feed (always recovered locally by mock
//! fallback, never surfaced to clients), and [`ApiError`] for the few request
//! failures the web layer does surface (validation, missing resources).

pub mod types;

pub use types::*;

/// Convenience type alias for upstream fetch results
pub type FetchResult<T> = Result<T, FetchError>;

/// Convenience type alias for web handler results
pub type ApiResult<T> = Result<T, ApiError>;
