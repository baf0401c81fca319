//! Page loaders.
//!
//! A loader runs before a page renders and produces the page's data. Each run
//! issues at most one GET and resolves to one of:
//!
//! - `Ok(data)` - the page renders with `data`
//! - `Err(PageError::Http)` - the API answered with an error status
//! - `Err(PageError::Network)` - no usable response (status 500)
//!
//! Status errors keep the API's status; they are never rewrapped as 500.
//!
//! | Loader | Endpoint | Data |
//! |---|---|---|
//! | [`LayoutLoader`] | `/api/auth/profile` | `()` (populates [`AuthStore`]) |
//! | [`ProductListLoader`] | `/api/products` | `Vec<Product>` |
//! | [`ProductLoader`] | `/api/products/{id}` | `Product` |
//! | [`OrderHistoryLoader`] | `/api/user/orders` | `Vec<Order>` |

mod layout;
mod orders;
mod products;

use std::future::Future;

use reqwest::StatusCode;
use secrecy::SecretString;
use tracing::warn;

pub use layout::LayoutLoader;
pub use orders::OrderHistoryLoader;
pub use products::{ProductListLoader, ProductLoader};

use crate::api::{ApiClient, ApiError};
use crate::error::PageError;
use crate::stores::AuthStore;

/// Everything a loader may touch during one navigation.
#[derive(Debug, Clone, Copy)]
pub struct LoadEvent<'a> {
    /// API client.
    pub api: &'a ApiClient,
    /// Session identity container.
    pub auth: &'a AuthStore,
    /// Session cookie of the navigation, forwarded on credentialed requests.
    pub session: Option<&'a SecretString>,
}

impl<'a> LoadEvent<'a> {
    /// An event without a session cookie.
    #[must_use]
    pub const fn new(api: &'a ApiClient, auth: &'a AuthStore) -> Self {
        Self {
            api,
            auth,
            session: None,
        }
    }

    /// Attach the navigation's session cookie.
    #[must_use]
    pub const fn with_session(mut self, session: Option<&'a SecretString>) -> Self {
        self.session = session;
        self
    }
}

/// Pre-render hook of a page.
pub trait Load {
    /// Data handed to the page on success.
    type Data;

    /// Produce the page data.
    fn load(
        &self,
        event: &LoadEvent<'_>,
    ) -> impl Future<Output = Result<Self::Data, PageError>> + Send;
}

/// Map an API failure onto the error a page shows.
///
/// `on_status` picks the message for a non-success status; every other
/// failure becomes a network error carrying `network_message`.
fn page_error(
    error: ApiError,
    on_status: impl FnOnce(StatusCode) -> &'static str,
    network_message: &'static str,
) -> PageError {
    match error {
        ApiError::Status { status, .. } => PageError::http(status, on_status(status)),
        other => {
            warn!(error = %other, "Page data request failed");
            PageError::network(network_message)
        }
    }
}
