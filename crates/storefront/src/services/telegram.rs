//! Telegram bot client for order notifications.
//!
//! A fire-and-forget side-channel: when an order is handed off to WhatsApp,
//! the same data is posted to a Telegram group so the farm staff see it
//! without waiting for the customer's message. Delivery is not tracked and
//! there is no retry - a failure is logged and the primary flow is
//! unaffected.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use greenhollow_core::{CartItem, CustomerInfo, OrderId, Price};

use crate::config::TelegramConfig;

/// Telegram Bot API base URL.
const BASE_URL: &str = "https://api.telegram.org";

/// Errors that can occur when talking to the Telegram Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API did not acknowledge the message.
    #[error("API error: {0}")]
    Api(String),
}

/// Structured payload for one outbound order notification.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub order_id: OrderId,
    pub placed_at: DateTime<Utc>,
    pub customer: CustomerInfo,
    /// Always informational: no payment runs through this system.
    pub payment_status: String,
    pub total: Price,
    pub items: Vec<CartItem>,
}

impl OrderDetails {
    /// Assemble the notification payload for a just-placed order.
    #[must_use]
    pub fn new(customer: CustomerInfo, items: Vec<CartItem>, total: Price) -> Self {
        Self {
            order_id: OrderId::generate(),
            placed_at: Utc::now(),
            customer,
            payment_status: "Pending (settled on delivery)".to_owned(),
            total,
            items,
        }
    }
}

/// Render the markdown notification text for an order.
#[must_use]
pub fn order_details_message(order: &OrderDetails) -> String {
    let mut message = String::from("\u{1f6d2} *New Order Received - Greenhollow Farms*\n\n");
    message.push_str(&format!("*Order ID:* {}\n", order.order_id));
    message.push_str(&format!(
        "*Time:* {}\n\n",
        order.placed_at.format("%Y-%m-%d %H:%M UTC")
    ));

    message.push_str("*Customer:*\n");
    message.push_str(&format!("Name: {}\n", order.customer.name));
    message.push_str(&format!("Phone: {}\n", order.customer.phone));
    message.push_str(&format!("Email: {}\n\n", order.customer.email));

    message.push_str("*Address:*\n");
    message.push_str(&format!("{}\n", order.customer.address));
    message.push_str(&format!(
        "{} - {}\n\n",
        order.customer.city, order.customer.pincode
    ));

    message.push_str("*Order Items:*\n");
    for item in &order.items {
        message.push_str(&format!(
            "\u{2022} {} \u{d7} {} - {}\n",
            item.product.name,
            item.quantity,
            item.subtotal()
        ));
    }

    message.push_str(&format!("\n*Total Amount:* {}\n", order.total));
    message.push_str(&format!("*Payment:* {}\n\n", order.payment_status));
    message.push_str("\u{26a0}\u{fe0f} Courier charges applicable\n");
    message.push_str("\u{1f4e6} Please acknowledge and process the order");

    message
}

/// Telegram Bot API client.
#[derive(Clone)]
pub struct TelegramNotifier {
    client: reqwest::Client,
    bot_token: SecretString,
    chat_id: String,
}

impl TelegramNotifier {
    /// Create a notifier from configuration.
    #[must_use]
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
        }
    }

    /// Post an order notification to the configured chat.
    ///
    /// Success is derived from the response body's `ok` acknowledgement
    /// field, not just the HTTP status.
    ///
    /// # Errors
    ///
    /// [`TelegramError`] when the request fails or the API does not
    /// acknowledge the message.
    pub async fn notify_order(&self, order: &OrderDetails) -> Result<(), TelegramError> {
        self.send_message(&order_details_message(order)).await
    }

    async fn send_message(&self, text: &str) -> Result<(), TelegramError> {
        let url = format!(
            "{BASE_URL}/bot{}/sendMessage",
            self.bot_token.expose_secret()
        );
        let body = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let ack: SendMessageResponse = response.json().await?;

        if !ack.ok {
            return Err(TelegramError::Api(
                ack.description
                    .unwrap_or_else(|| "sendMessage not acknowledged".to_owned()),
            ));
        }

        Ok(())
    }
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

/// Request body for the `sendMessage` method.
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// Acknowledgement envelope from the Bot API.
#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use greenhollow_core::{Cart, CurrencyCode, Product};

    fn product(name: &str, price: i64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": name,
            "name": name,
            "unit": "250 g",
            "original_price": format!("{}", price + 50),
            "discounted_price": format!("{price}"),
            "rating": 4.8,
            "reviews": 42,
            "badge": "Bestseller",
            "description": "",
            "category": "Powders",
            "image": "/static/images/placeholder.jpg",
            "farm_to_table_image": "/static/images/placeholder.jpg",
            "in_stock": true,
            "features": [],
            "processing_journey": [],
            "why_choose_our_farm": "",
            "unique_selling_points": [],
            "seasonal_availability": "",
            "pairing_suggestions": [],
            "storage_instructions": "",
            "customer_use_cases": [],
            "sustainability_impact": "",
            "farmer_story": "",
            "product_story": "",
            "health_benefits": [],
            "recipe_ideas": [],
            "eco_friendly_practices": [],
            "customer_spotlight": ""
        }))
        .unwrap()
    }

    fn order() -> OrderDetails {
        let mut cart = Cart::new();
        cart.add(&product("Organic Turmeric Powder", 120), 2).unwrap();
        cart.add(&product("Coconut Oil", 525), 1).unwrap();

        OrderDetails::new(
            CustomerInfo::from_form(
                "Meera Nair",
                "9876543210",
                "meera@example.com",
                "14 Hillside Lane",
                "Kochi",
                "682001",
            ),
            cart.items().to_vec(),
            cart.total(),
        )
    }

    #[test]
    fn test_order_details_message_layout() {
        let order = order();
        let message = order_details_message(&order);

        assert!(message.contains("*New Order Received - Greenhollow Farms*"));
        assert!(message.contains(&format!("*Order ID:* {}", order.order_id)));
        assert!(message.contains("Name: Meera Nair"));
        assert!(message.contains("Kochi - 682001"));
        assert!(message.contains("\u{2022} Organic Turmeric Powder \u{d7} 2 - \u{20b9}240.00"));
        assert!(message.contains("*Total Amount:* \u{20b9}765.00"));
        assert!(message.contains("Please acknowledge and process the order"));
    }

    #[test]
    fn test_order_details_new_totals() {
        let order = order();
        assert_eq!(order.total.amount, Decimal::new(765, 0));
        assert_eq!(order.total.currency_code, CurrencyCode::INR);
        assert_eq!(order.items.len(), 2);
    }

    #[test]
    fn test_ack_envelope_deserialization() {
        let ok: SendMessageResponse =
            serde_json::from_str("{\"ok\": true, \"result\": {\"message_id\": 5}}").unwrap();
        assert!(ok.ok);
        assert!(ok.description.is_none());

        let err: SendMessageResponse =
            serde_json::from_str("{\"ok\": false, \"description\": \"Bad Request: chat not found\"}")
                .unwrap();
        assert!(!err.ok);
        assert_eq!(err.description.as_deref(), Some("Bad Request: chat not found"));
    }

    #[test]
    fn test_notifier_debug_redacts_token() {
        let notifier = TelegramNotifier::new(&TelegramConfig {
            bot_token: SecretString::from("123456:super_secret"),
            chat_id: "-100123".to_owned(),
        });
        let debug_output = format!("{notifier:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret"));
    }
}
