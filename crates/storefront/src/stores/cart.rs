//! Shopping cart state container.
//!
//! The cart is persisted to durable storage under [`CART_STORAGE_KEY`] after
//! every mutation and rehydrated from it when the container is created. The
//! persisted value is an envelope carrying a format version:
//!
//! ```json
//! {"state":{"items":[{"id":"p1","name":"…","quantity":2, …}]},"version":0}
//! ```
//!
//! Storage failures never reach the caller. The container keeps working in
//! memory and logs a warning.

use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{Product, ProductId};
use tracing::{debug, warn};

use super::{Store, Subscription};
use crate::bridge::StateContainer;
use crate::error::add_breadcrumb;
use crate::storage::Storage;

/// Storage key of the persisted cart.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Version of the persisted envelope. Snapshots with another version are
/// discarded on hydration.
pub const CART_STORAGE_VERSION: u32 = 0;

/// A product in the cart together with its quantity.
///
/// Serialized flat: the product fields plus `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    /// Always at least 1 while the item is in the cart.
    pub quantity: u32,
}

impl CartItem {
    /// Product ID of this line.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Ordered cart contents. No two items share a product ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartItem>,
}

impl CartState {
    /// Line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    fn with_added(&self, product: Product) -> Self {
        if self.get(&product.id).is_some() {
            // Only the quantity changes; the stored product fields win over
            // the payload passed in.
            let items = self
                .items
                .iter()
                .map(|item| {
                    if item.id() == &product.id {
                        CartItem {
                            quantity: item.quantity.saturating_add(1),
                            ..item.clone()
                        }
                    } else {
                        item.clone()
                    }
                })
                .collect();
            return Self { items };
        }

        let mut items = self.items.clone();
        items.push(CartItem {
            product,
            quantity: 1,
        });
        Self { items }
    }

    fn without(&self, id: &ProductId) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| item.id() != id)
                .cloned()
                .collect(),
        }
    }

    fn with_quantity(&self, id: &ProductId, quantity: i64) -> Self {
        if quantity <= 0 {
            return self.without(id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        Self {
            items: self
                .items
                .iter()
                .map(|item| {
                    if item.id() == id {
                        CartItem {
                            quantity,
                            ..item.clone()
                        }
                    } else {
                        item.clone()
                    }
                })
                .collect(),
        }
    }

    /// Drop zero-quantity lines and repeated IDs (the first occurrence wins).
    fn sanitized(self) -> Self {
        let mut seen = HashSet::new();
        let before = self.items.len();
        let items: Vec<CartItem> = self
            .items
            .into_iter()
            .filter(|item| item.quantity > 0 && seen.insert(item.id().clone()))
            .collect();
        if items.len() != before {
            warn!(
                dropped = before - items.len(),
                "Dropped invalid lines from persisted cart"
            );
        }
        Self { items }
    }
}

/// Persisted form of the cart.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedCart {
    state: CartState,
    version: u32,
}

/// Container for the shopping cart.
#[derive(Clone)]
pub struct CartStore {
    store: Store<CartState>,
    storage: Arc<dyn Storage>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create the container, restoring the last persisted cart from `storage`
    /// when one exists.
    #[must_use]
    pub fn hydrate(storage: Arc<dyn Storage>) -> Self {
        let initial = load_persisted(storage.as_ref()).unwrap_or_default();
        debug!(lines = initial.items.len(), "Cart hydrated");
        Self {
            store: Store::new(initial),
            storage,
        }
    }

    /// Add one unit of `product`.
    ///
    /// A product already in the cart only has its quantity incremented; the
    /// stored name, price and other fields are kept as they were.
    pub fn add_item(&self, product: Product) {
        add_breadcrumb("cart", "Added item", Some(&[("product_id", product.id.as_str())]));
        self.mutate(|state| state.with_added(product));
    }

    /// Remove the line for `id`. Absent IDs are ignored.
    pub fn remove_item(&self, id: &ProductId) {
        add_breadcrumb("cart", "Removed item", Some(&[("product_id", id.as_str())]));
        self.mutate(|state| state.without(id));
    }

    /// Set the quantity for `id`. A quantity of zero or less removes the line;
    /// absent IDs are ignored.
    pub fn update_quantity(&self, id: &ProductId, quantity: i64) {
        let quantity_str = quantity.to_string();
        add_breadcrumb(
            "cart",
            "Updated quantity",
            Some(&[("product_id", id.as_str()), ("quantity", quantity_str.as_str())]),
        );
        self.mutate(|state| state.with_quantity(id, quantity));
    }

    /// Remove every line.
    pub fn clear_cart(&self) {
        add_breadcrumb("cart", "Cleared cart", None);
        self.mutate(|_| CartState::default());
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.store.get()
    }

    /// Sum of all quantities in the cart.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.store.read(CartState::total_quantity)
    }

    fn mutate(&self, derive: impl FnOnce(&CartState) -> CartState) {
        self.store.update_then(derive, |next| self.persist(next));
    }

    fn persist(&self, state: &CartState) {
        let envelope = PersistedCart {
            state: state.clone(),
            version: CART_STORAGE_VERSION,
        };
        let json = match serde_json::to_string(&envelope) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize cart");
                return;
            }
        };
        if let Err(e) = self.storage.set_item(CART_STORAGE_KEY, &json) {
            warn!(error = %e, "Failed to persist cart, continuing in memory");
        }
    }
}

impl StateContainer for CartStore {
    type State = CartState;

    fn snapshot(&self) -> CartState {
        self.store.get()
    }

    fn subscribe(&self, listener: impl Fn(&CartState) + Send + Sync + 'static) -> Subscription {
        self.store.subscribe(listener)
    }
}

/// Read and validate the persisted cart. `None` means "start empty".
fn load_persisted(storage: &dyn Storage) -> Option<CartState> {
    let raw = match storage.get_item(CART_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "Cart storage unavailable, starting with an empty cart");
            return None;
        }
    };

    let envelope: PersistedCart = match serde_json::from_str(&raw) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "Persisted cart is malformed, starting with an empty cart");
            return None;
        }
    };

    if envelope.version != CART_STORAGE_VERSION {
        warn!(
            found = envelope.version,
            expected = CART_STORAGE_VERSION,
            "Persisted cart has an unknown version, starting with an empty cart"
        );
        return None;
    }

    Some(envelope.state.sanitized())
}
