//! Client for the storefront's own HTTP API.
//!
//! # Endpoints
//!
//! | Path | Credentials | Response |
//! |---|---|---|
//! | `/api/auth/profile` | include | `{ "user": User }` |
//! | `/api/products` | omit | `[Product]` |
//! | `/api/products/{id}` | omit | `Product` |
//! | `/api/user/orders` | include | `[Order]` |
//!
//! Every call issues exactly one GET. There is no retry and no caching: each
//! navigation observes the API as it is at that moment.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_storefront::api::ApiClient;
//! use shopfront_storefront::config::ApiConfig;
//!
//! let client = ApiClient::new(&ApiConfig::with_base_url("http://localhost:3000")?)?;
//! let products = client.products().await?;
//! ```

mod client;

pub use client::ApiClient;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when calling the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: connection refused, timeout, or an unreadable body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Raw response body, kept for diagnostics only.
        body: String,
    },

    /// A success response did not decode to the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The endpoint path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// The response status for `Status` errors.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Whether a request carries the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Credentials {
    /// Never send the session cookie.
    #[default]
    Omit,
    /// Forward the session cookie when one is present.
    Include,
}
