//! Navigational errors with Sentry integration.
//!
//! Page loaders return `Result<T, PageError>`. A `PageError` is what the page
//! renderer shows: an HTTP status plus a human-readable message. Server-side
//! failures (status 500 and above) are reported to Sentry by the composition
//! root through [`capture_page_error`].

use reqwest::StatusCode;
use thiserror::Error;

/// Error surfaced by a page loader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// The API answered with a non-success status.
    #[error("{status}: {message}")]
    Http {
        /// Status reported to the renderer.
        status: StatusCode,
        /// Message shown on the error page.
        message: String,
    },

    /// The request never produced a usable response (transport failure,
    /// timeout, or a body that did not decode).
    #[error("500 Internal Server Error: {message}")]
    Network {
        /// Message shown on the error page.
        message: String,
    },
}

impl PageError {
    /// Status-carrying error.
    #[must_use]
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Connectivity error, always status 500.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Status the renderer should use.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Http { status, .. } => *status,
            Self::Network { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message the renderer should show.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Http { message, .. } | Self::Network { message } => message,
        }
    }

    /// Whether this error is reported to Sentry.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

/// Report a navigational error to Sentry when it is a server error.
///
/// Returns the Sentry event id when the error was captured.
pub fn capture_page_error(error: &PageError, path: &str) -> Option<sentry::types::Uuid> {
    if !error.is_server_error() {
        return None;
    }

    let event_id = sentry::with_scope(
        |scope| {
            scope.set_tag("page.path", path);
            scope.set_tag("page.status", error.status().as_u16());
        },
        || sentry::capture_error(error),
    );
    tracing::error!(
        error = %error,
        path,
        sentry_event_id = %event_id,
        "Page load failed"
    );
    Some(event_id)
}

/// Set the Sentry user context from a user ID.
///
/// Called on login so later errors are associated with the user.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust
/// use shopfront_storefront::error::add_breadcrumb;
///
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "42")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_error_display() {
        let err = PageError::http(StatusCode::NOT_FOUND, "Product not found");
        assert_eq!(err.to_string(), "404 Not Found: Product not found");

        let err = PageError::network("Could not connect to the server to fetch products.");
        assert_eq!(
            err.to_string(),
            "500 Internal Server Error: Could not connect to the server to fetch products."
        );
    }

    #[test]
    fn test_page_error_status_codes() {
        assert_eq!(
            PageError::http(StatusCode::UNAUTHORIZED, "x").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            PageError::network("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_page_error_message() {
        let err = PageError::http(StatusCode::BAD_GATEWAY, "Failed to fetch products.");
        assert_eq!(err.message(), "Failed to fetch products.");
        assert_eq!(PageError::network("offline").message(), "offline");
    }

    #[test]
    fn test_server_error_classification() {
        assert!(PageError::network("x").is_server_error());
        assert!(PageError::http(StatusCode::SERVICE_UNAVAILABLE, "x").is_server_error());
        assert!(!PageError::http(StatusCode::NOT_FOUND, "x").is_server_error());
        assert!(!PageError::http(StatusCode::UNAUTHORIZED, "x").is_server_error());
    }

    #[test]
    fn test_capture_skips_client_errors() {
        let err = PageError::http(StatusCode::NOT_FOUND, "Product not found");
        assert!(capture_page_error(&err, "/products/1").is_none());
    }

    #[test]
    fn test_capture_reports_server_errors() {
        let err = PageError::network("offline");
        assert!(capture_page_error(&err, "/").is_some());
    }

    #[test]
    fn test_sentry_helpers_without_client() {
        set_sentry_user(&"u1", Some("a@example.com"));
        add_breadcrumb("cart", "Added item", Some(&[("product_id", "1")]));
        add_breadcrumb("cart", "Cleared", None);
        clear_sentry_user();
    }
}
