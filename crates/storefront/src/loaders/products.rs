use reqwest::StatusCode;
use shopfront_core::{Product, ProductId};
use tracing::instrument;

use super::{Load, LoadEvent, page_error};
use crate::error::PageError;

/// Catalogue page loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductListLoader;

impl Load for ProductListLoader {
    type Data = Vec<Product>;

    #[instrument(name = "product_list_load", skip_all)]
    async fn load(&self, event: &LoadEvent<'_>) -> Result<Vec<Product>, PageError> {
        event.api.products().await.map_err(|e| {
            page_error(
                e,
                |_| "Failed to fetch products.",
                "Could not connect to the server to fetch products.",
            )
        })
    }
}

/// Product detail page loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductLoader {
    /// Product to load, taken from the page path.
    pub id: ProductId,
}

impl ProductLoader {
    /// Loader for the product `id`.
    #[must_use]
    pub fn new(id: impl Into<ProductId>) -> Self {
        Self { id: id.into() }
    }
}

impl Load for ProductLoader {
    type Data = Product;

    #[instrument(name = "product_load", skip_all, fields(product_id = %self.id))]
    async fn load(&self, event: &LoadEvent<'_>) -> Result<Product, PageError> {
        event.api.product(&self.id).await.map_err(|e| {
            page_error(
                e,
                |status| {
                    if status == StatusCode::NOT_FOUND {
                        "Product not found"
                    } else {
                        "Failed to fetch product data."
                    }
                },
                "Could not connect to the server to fetch product data.",
            )
        })
    }
}
