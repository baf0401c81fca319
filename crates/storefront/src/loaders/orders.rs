use reqwest::StatusCode;
use shopfront_core::Order;
use tracing::instrument;

use super::{Load, LoadEvent, page_error};
use crate::error::PageError;

/// Order history page loader.
///
/// The request carries the session cookie; the API decides whether the
/// visitor is logged in. The local auth container is not consulted.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderHistoryLoader;

impl Load for OrderHistoryLoader {
    type Data = Vec<Order>;

    #[instrument(name = "order_history_load", skip_all)]
    async fn load(&self, event: &LoadEvent<'_>) -> Result<Vec<Order>, PageError> {
        event.api.orders(event.session).await.map_err(|e| {
            page_error(
                e,
                |status| {
                    if status == StatusCode::UNAUTHORIZED {
                        "You must be logged in to view this page."
                    } else {
                        "Failed to load order history."
                    }
                },
                "Could not connect to the server to fetch orders.",
            )
        })
    }
}
