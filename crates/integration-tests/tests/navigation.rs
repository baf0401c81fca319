//! Integration tests for full navigations through the composition root.

use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use shopfront_core::{Product, ProductId, UserId};
use shopfront_integration_tests::{
    SESSION_COOKIE, product_json, profile_json, storefront_for, storefront_with_storage,
};
use shopfront_storefront::bridge::Scope;
use shopfront_storefront::storage::FileStorage;
use shopfront_storefront::{Navigation, PageData, PageError, Route};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_profile(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .and(header("cookie", SESSION_COOKIE))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_json("u1", "a@example.com")))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .respond_with(ResponseTemplate::new(401))
        .mount(server)
        .await;
}

fn product(id: &str) -> Product {
    serde_json::from_value(product_json(id, "Soap", 12.5)).expect("valid product payload")
}

#[tokio::test]
async fn test_layout_completes_before_page_loader() {
    let server = MockServer::start().await;
    mount_profile(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            product_json("1", "Soap", 12.5)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let storefront = storefront_for(&server);
    let page = storefront
        .navigate(&Navigation::new(Route::Home).with_session(SESSION_COOKIE))
        .await
        .expect("home should load");

    assert!(matches!(page, PageData::Home(ref products) if products.len() == 1));
    assert_eq!(
        storefront.auth().user().map(|u| u.id),
        Some(UserId::new("u1"))
    );

    let requests = server.received_requests().await.expect("recording enabled");
    let paths: Vec<&str> = requests.iter().map(|r| r.url.path()).collect();
    assert_eq!(paths, vec!["/api/auth/profile", "/api/products"]);
}

#[tokio::test]
async fn test_second_navigation_reuses_session() {
    let server = MockServer::start().await;
    mount_profile(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/user/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let storefront = storefront_for(&server);
    let navigation = Navigation::new(Route::Orders).with_session(SESSION_COOKIE);
    storefront.navigate(&navigation).await.expect("orders should load");
    storefront.navigate(&navigation).await.expect("orders should load");

    let requests = server.received_requests().await.expect("recording enabled");
    let profile_calls = requests
        .iter()
        .filter(|r| r.url.path() == "/api/auth/profile")
        .count();
    assert_eq!(profile_calls, 1);
}

#[tokio::test]
async fn test_anonymous_orders_navigation_fails_with_401() {
    let server = MockServer::start().await;
    mount_profile(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/user/orders"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let storefront = storefront_for(&server);
    let err = storefront
        .navigate(&Navigation::new(Route::Orders))
        .await
        .expect_err("anonymous visitor cannot see orders");

    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(err.message(), "You must be logged in to view this page.");
    assert!(!storefront.auth().is_authenticated());
}

#[tokio::test]
async fn test_missing_product_navigation() {
    let server = MockServer::start().await;
    mount_profile(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/products/42"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let storefront = storefront_for(&server);
    let route = Route::Product {
        id: ProductId::new("42"),
    };
    let err = storefront
        .navigate(&Navigation::new(route))
        .await
        .expect_err("missing product");

    assert_eq!(err, PageError::http(StatusCode::NOT_FOUND, "Product not found"));
}

#[tokio::test]
async fn test_cart_navigation_reads_container() {
    let server = MockServer::start().await;
    mount_profile(&server).await;

    let storefront = storefront_for(&server);
    storefront.cart().add_item(product("1"));
    storefront.cart().add_item(product("1"));

    let page = storefront
        .navigate(&Navigation::new(Route::Cart))
        .await
        .expect("cart page never fails");

    let PageData::Cart(cart) = page else {
        panic!("expected cart page data");
    };
    assert_eq!(cart.total_quantity(), 2);

    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.iter().all(|r| r.url.path() == "/api/auth/profile"));
}

#[tokio::test]
async fn test_component_observes_login_during_navigation() {
    let server = MockServer::start().await;
    mount_profile(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let storefront = storefront_for(&server);
    let names_seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&names_seen);

    let mut scope = Scope::new();
    scope.sync(storefront.auth(), move |state| {
        sink.lock()
            .expect("lock")
            .push(state.user().map(|u| u.name.clone()));
    });

    storefront
        .navigate(&Navigation::new(Route::Home).with_session(SESSION_COOKIE))
        .await
        .expect("home should load");
    scope.teardown();
    storefront.auth().logout();

    assert_eq!(
        *names_seen.lock().expect("lock"),
        vec![None, Some("Test Customer".to_string())]
    );
}

#[tokio::test]
async fn test_cart_survives_restart_with_file_storage() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");

    {
        let storefront =
            storefront_with_storage(&server, Arc::new(FileStorage::new(dir.path())));
        storefront.cart().add_item(product("1"));
        storefront.cart().add_item(product("2"));
        storefront.cart().update_quantity(&ProductId::new("2"), 3);
    }

    let restarted = storefront_with_storage(&server, Arc::new(FileStorage::new(dir.path())));
    let cart = restarted.cart().snapshot();

    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.total_quantity(), 4);
    assert!(dir.path().join("cart-storage.json").exists());
}
