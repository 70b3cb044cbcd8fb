//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products               - Product listing (optional ?category=)
//! GET  /products/{id}          - Product detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns count, triggers cart-updated)
//! POST /cart/update            - Update quantity (returns cart fragment)
//! POST /cart/remove            - Remove item (returns cart fragment)
//! POST /cart/save              - Save item for later (returns cart fragment)
//! POST /cart/move              - Move saved item back (returns cart fragment)
//! POST /cart/saved/remove     - Drop saved item (returns cart fragment)
//! POST /cart/clear             - Empty both lists (returns cart fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Order handoff
//! GET  /order                  - Order review page (summary + customer form)
//! POST /order                  - Validate, notify, clear, redirect to WhatsApp
//! ```

pub mod cart;
pub mod home;
pub mod order;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/save", post(cart::save_for_later))
        .route("/move", post(cart::move_to_cart))
        .route("/saved/remove", post(cart::remove_saved))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the order handoff router.
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/", get(order::show).post(order::submit))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Order handoff
        .nest("/order", order_routes())
}
