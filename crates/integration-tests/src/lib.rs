//! Integration tests for the Shopfront storefront client.
//!
//! The storefront API is replaced by a `wiremock` server, so the tests need no
//! running backend.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use shopfront_storefront::Storefront;
use shopfront_storefront::config::{ApiConfig, StorefrontConfig};
use shopfront_storefront::storage::{MemoryStorage, Storage};
use wiremock::MockServer;

/// Session cookie used by tests that act as a logged-in visitor.
pub const SESSION_COOKIE: &str = "token=test-session";

/// Storefront configuration pointing at `server`.
#[must_use]
pub fn config_for(server: &MockServer) -> StorefrontConfig {
    StorefrontConfig {
        api: ApiConfig::with_base_url(&server.uri()).expect("mock server URI is a valid base URL"),
        ..StorefrontConfig::defaults().expect("built-in defaults are valid")
    }
}

/// Storefront against `server` with in-memory storage.
#[must_use]
pub fn storefront_for(server: &MockServer) -> Storefront {
    storefront_with_storage(server, Arc::new(MemoryStorage::new()))
}

/// Storefront against `server` with the given storage.
#[must_use]
pub fn storefront_with_storage(server: &MockServer, storage: Arc<dyn Storage>) -> Storefront {
    Storefront::new(&config_for(server), storage).expect("Failed to build storefront")
}

/// Storefront against `server` whose requests time out after `timeout`.
#[must_use]
pub fn storefront_with_timeout(server: &MockServer, timeout: Duration) -> Storefront {
    let mut config = config_for(server);
    config.api.request_timeout = timeout;
    Storefront::new(&config, Arc::new(MemoryStorage::new())).expect("Failed to build storefront")
}

/// Base URL of a port that nothing listens on.
pub async fn unreachable_base_url() -> String {
    // wiremock pools servers, so a dropped `MockServer` keeps listening;
    // bind and release a plain socket instead.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

/// A product payload as the API serves it.
#[must_use]
pub fn product_json(id: &str, name: &str, price: f64) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name} description"),
        "price": price,
        "stock": 10,
        "createdAt": "2025-11-17T08:00:00.000Z",
        "updatedAt": "2025-11-18T09:30:00.000Z"
    })
}

/// A profile payload as the API serves it.
#[must_use]
pub fn profile_json(id: &str, email: &str) -> Value {
    json!({
        "user": {
            "id": id,
            "name": "Test Customer",
            "email": email
        }
    })
}
