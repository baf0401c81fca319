//! Order history entries.

use serde::{Deserialize, Serialize};

/// An entry of `GET /api/user/orders`.
///
/// The storefront client never inspects orders; it hands them to the view as
/// the API produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Order(serde_json::Value);

impl Order {
    /// The raw JSON value.
    #[must_use]
    pub const fn as_json(&self) -> &serde_json::Value {
        &self.0
    }
}
