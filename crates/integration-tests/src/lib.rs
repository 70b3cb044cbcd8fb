//! Shared helpers for the integration tests.
//!
//! `test_app` builds the real router over the real catalog file with an
//! in-memory snapshot store and no Telegram credentials. Router clones share
//! the same app state, so one `test_app()` per test gives that test an
//! isolated cart.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use greenhollow_storefront::cart::{CartManager, MemoryStore};
use greenhollow_storefront::catalog::Catalog;
use greenhollow_storefront::config::{StorefrontConfig, WhatsAppConfig};
use greenhollow_storefront::routes;
use greenhollow_storefront::state::AppState;

/// Destination phone used by the test configuration.
pub const TEST_WHATSAPP_PHONE: &str = "919629002576";

/// Path to the checked-in catalog file.
#[must_use]
pub fn catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/catalog/products.json")
}

/// Configuration for tests: real catalog, throwaway data dir, no Telegram.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://127.0.0.1:3000".to_string(),
        catalog_path: catalog_path(),
        data_dir: std::env::temp_dir(),
        whatsapp: WhatsAppConfig {
            phone_number: TEST_WHATSAPP_PHONE.to_string(),
        },
        telegram: None,
        sentry_dsn: None,
    }
}

/// Build the storefront router over an in-memory snapshot store.
#[must_use]
pub fn test_app() -> Router {
    let config = test_config();
    let catalog = Catalog::load(&config.catalog_path).expect("catalog file should load");
    let cart = CartManager::load(Arc::new(MemoryStore::new()));
    let state = AppState::new(config, catalog, cart);

    Router::new().merge(routes::routes()).with_state(state)
}

/// Issue a GET request against the app.
pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Issue a form-encoded POST request against the app.
pub async fn post_form(app: &Router, uri: &str, body: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_owned()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Collect a response body into a string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Assert status and return the body for further checks.
pub async fn expect_status(response: Response<Body>, status: StatusCode) -> String {
    assert_eq!(response.status(), status);
    body_string(response).await
}
