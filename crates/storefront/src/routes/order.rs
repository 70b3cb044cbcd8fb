//! Order review and WhatsApp handoff.
//!
//! A single linear pipeline: validate the customer form, format the order
//! message, fire the optional Telegram notification, clear the cart, and
//! redirect the browser to the WhatsApp deep link. The clear is optimistic -
//! once the link opens there is no callback telling us whether the message
//! was actually sent.

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

use greenhollow_core::CustomerInfo;

use crate::filters;
use crate::routes::cart::CartView;
use crate::services::OrderDetails;
use crate::services::whatsapp;
use crate::state::AppState;

/// Customer details form data.
#[derive(Debug, Deserialize)]
pub struct OrderForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub pincode: String,
}

/// Order review page template.
#[derive(Template, WebTemplate)]
#[template(path = "order/show.html")]
pub struct OrderShowTemplate {
    pub cart: CartView,
}

/// Inline error fragment naming the offending field.
fn form_error(message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Html(format!("<span class=\"form-error\">{message}</span>")),
    )
        .into_response()
}

/// Display the order review page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> OrderShowTemplate {
    OrderShowTemplate {
        cart: CartView::from_manager(state.cart()),
    }
}

/// Submit the order: validate, notify, clear, redirect to WhatsApp.
#[instrument(skip(state, form))]
pub async fn submit(State(state): State<AppState>, Form(form): Form<OrderForm>) -> Response {
    let cart = state.cart();
    if cart.is_empty() {
        return form_error("your cart is empty");
    }

    let customer = CustomerInfo::from_form(
        &form.name,
        &form.phone,
        &form.email,
        &form.address,
        &form.city,
        &form.pincode,
    );
    if let Err(e) = customer.validate() {
        tracing::debug!(error = %e, "Order form rejected");
        return form_error(&e.to_string());
    }

    let items = cart.cart_items();
    let total = cart.total();
    let message = whatsapp::order_message(&items, total, &customer);
    let link = whatsapp::order_link(&state.config().whatsapp.phone_number, &message);

    // Fire-and-forget side-channel; failures are logged only and never
    // block the handoff.
    if let Some(notifier) = state.telegram() {
        let notifier = notifier.clone();
        let order = OrderDetails::new(customer, items.clone(), total);
        tokio::spawn(async move {
            if let Err(e) = notifier.notify_order(&order).await {
                tracing::error!(
                    order_id = %order.order_id,
                    error = %e,
                    "Telegram order notification failed"
                );
            }
        });
    }

    cart.clear_cart();
    tracing::info!(lines = items.len(), total = %total, "Order handed off to WhatsApp");

    (
        AppendHeaders([("HX-Redirect", link)]),
        Html("Opening WhatsApp to send your order..."),
    )
        .into_response()
}
