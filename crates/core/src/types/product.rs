//! Catalog product type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// A product as served by `GET /api/products` and `GET /api/products/{id}`.
///
/// Owned and versioned by the remote API; the client never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long-form description.
    pub description: String,
    /// Unit price in the store currency. Travels as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Units available.
    pub stock: u32,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether at least one unit is available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const API_PRODUCT: &str = r#"{
        "id": "clx1",
        "name": "Lavender Soap",
        "description": "Hand made",
        "price": 12.5,
        "stock": 3,
        "createdAt": "2025-11-17T08:00:00.000Z",
        "updatedAt": "2025-11-18T09:30:00.000Z"
    }"#;

    #[test]
    fn test_deserialize_api_payload() {
        let product: Product = serde_json::from_str(API_PRODUCT).unwrap();
        assert_eq!(product.id.as_str(), "clx1");
        assert_eq!(product.price, Decimal::new(125, 1));
        assert_eq!(product.stock, 3);
        assert!(product.in_stock());
        assert!(product.updated_at > product.created_at);
    }

    #[test]
    fn test_integer_price_accepted() {
        let json = API_PRODUCT.replace("12.5", "20");
        let product: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(product.price, Decimal::from(20));
    }

    #[test]
    fn test_serializes_camel_case_with_numeric_price() {
        let product: Product = serde_json::from_str(API_PRODUCT).unwrap();
        let value = serde_json::to_value(&product).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("created_at").is_none());
        assert!(value["price"].is_number());
    }

    #[test]
    fn test_out_of_stock() {
        let json = API_PRODUCT.replace("\"stock\": 3", "\"stock\": 0");
        let product: Product = serde_json::from_str(&json).unwrap();
        assert!(!product.in_stock());
    }
}
