//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every handler talks to the one shared cart manager in the app state;
//! rejected mutations come back as short inline error fragments (the toast
//! analog) with a 422 status so the page can surface them without losing
//! the current cart view.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use greenhollow_core::{CartItem, ProductId};

use crate::cart::CartManager;
use crate::filters;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: String,
    pub in_stock: bool,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.product.id.to_string(),
            name: item.product.name.clone(),
            unit: item.product.unit.clone(),
            quantity: item.quantity,
            price: item.product.price().to_string(),
            line_price: item.subtotal().to_string(),
            image: item.product.image.clone(),
            in_stock: item.product.in_stock,
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub saved: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    /// Snapshot the shared manager into display data.
    #[must_use]
    pub fn from_manager(cart: &CartManager) -> Self {
        Self {
            items: cart.cart_items().iter().map(CartItemView::from).collect(),
            saved: cart.saved_items().iter().map(CartItemView::from).collect(),
            subtotal: cart.total().to_string(),
            item_count: cart.items_count(),
        }
    }
}

// =============================================================================
// Form Data
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: u32,
}

/// Single-product form data (remove/save/move).
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub product_id: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart body fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Inline error fragment: the transient toast analog.
fn toast_error(message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Html(format!("<span class=\"cart-error\">{message}</span>")),
    )
        .into_response()
}

/// Cart body fragment plus the HX-Trigger that refreshes the count badge.
fn cart_fragment(state: &AppState) -> Response {
    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from_manager(state.cart()),
        },
    )
        .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> CartShowTemplate {
    CartShowTemplate {
        cart: CartView::from_manager(state.cart()),
    }
}

/// Add item to cart (HTMX).
///
/// Returns the count badge with an HX-Trigger so other fragments refresh;
/// a stock rejection comes back as a 422 error fragment and leaves the
/// cart untouched.
#[instrument(skip(state))]
pub async fn add(State(state): State<AppState>, Form(form): Form<AddToCartForm>) -> Response {
    let id = ProductId::new(form.product_id);
    let Some(product) = state.catalog().get(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Html("<span class=\"cart-error\">Product not found</span>"),
        )
            .into_response();
    };

    let quantity = form.quantity.unwrap_or(1).max(1);
    match state.cart().add_to_cart(product, quantity) {
        Ok(()) => (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartCountTemplate {
                count: state.cart().items_count(),
            },
        )
            .into_response(),
        Err(e) => {
            tracing::debug!(product = %id, error = %e, "Add to cart rejected");
            toast_error(&e.to_string())
        }
    }
}

/// Update cart item quantity (HTMX). Quantity zero removes the line.
#[instrument(skip(state))]
pub async fn update(State(state): State<AppState>, Form(form): Form<UpdateCartForm>) -> Response {
    let id = ProductId::new(form.product_id);
    match state.cart().update_quantity(&id, form.quantity) {
        Ok(()) => cart_fragment(&state),
        Err(e) => {
            tracing::debug!(product = %id, error = %e, "Quantity update rejected");
            toast_error(&e.to_string())
        }
    }
}

/// Remove item from cart (HTMX).
#[instrument(skip(state))]
pub async fn remove(State(state): State<AppState>, Form(form): Form<ProductForm>) -> Response {
    state.cart().remove_from_cart(&ProductId::new(form.product_id));
    cart_fragment(&state)
}

/// Move item to the saved-for-later list (HTMX).
#[instrument(skip(state))]
pub async fn save_for_later(
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Response {
    state.cart().save_for_later(&ProductId::new(form.product_id));
    cart_fragment(&state)
}

/// Move a saved item back into the cart (HTMX).
///
/// Stock is re-validated: the item stays saved when it no longer fits.
#[instrument(skip(state))]
pub async fn move_to_cart(
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Response {
    let id = ProductId::new(form.product_id);
    match state.cart().move_to_cart(&id) {
        Ok(()) => cart_fragment(&state),
        Err(e) => {
            tracing::debug!(product = %id, error = %e, "Move to cart rejected");
            toast_error(&e.to_string())
        }
    }
}

/// Drop a saved-for-later item (HTMX).
#[instrument(skip(state))]
pub async fn remove_saved(
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Response {
    state
        .cart()
        .remove_saved_item(&ProductId::new(form.product_id));
    cart_fragment(&state)
}

/// Empty the cart and the saved list (HTMX).
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Response {
    state.cart().clear_cart();
    cart_fragment(&state)
}

/// Get cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> CartCountTemplate {
    CartCountTemplate {
        count: state.cart().items_count(),
    }
}
