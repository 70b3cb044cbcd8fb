//! WhatsApp order handoff.
//!
//! There is no checkout backend: an order is a preformatted chat message.
//! Everything here is a pure function of its inputs - the route layer opens
//! the returned deep link in the customer's browser and the farm staff take
//! it from there.

use greenhollow_core::{CartItem, CustomerInfo, Price};

/// Brand name used in the outbound messages.
const BRAND: &str = "Greenhollow Farms";

/// Render the order summary sent as the WhatsApp message body.
///
/// Deterministic and emoji-annotated: numbered item lines with quantity,
/// unit price and subtotal, the grand total, the customer block (when any
/// field is filled in), and a confirmation footer. An empty cart renders
/// the standing inquiry greeting instead.
#[must_use]
pub fn order_message(items: &[CartItem], total: Price, customer: &CustomerInfo) -> String {
    if items.is_empty() {
        return format!("Hello! I'm interested in your products from {BRAND}.");
    }

    let mut message = format!("\u{1f6d2} *New Order from {BRAND} Website*\n\n");
    message.push_str("\u{1f4e6} *Order Details:*\n");

    for (index, item) in items.iter().enumerate() {
        message.push_str(&format!("{}. *{}*\n", index + 1, item.product.name));
        message.push_str(&format!("   \u{2022} Quantity: {}\n", item.quantity));
        message.push_str(&format!(
            "   \u{2022} Unit Price: {} / {}\n",
            item.product.price(),
            item.product.unit
        ));
        message.push_str(&format!("   \u{2022} Subtotal: {}\n\n", item.subtotal()));
    }

    message.push_str(&format!("\u{1f4b0} *Total Amount: {total}*\n\n"));

    if customer.is_any_field_set() {
        message.push_str("\u{1f464} *Customer Information:*\n");
        push_field(&mut message, "Name", &customer.name);
        push_field(&mut message, "Phone", &customer.phone);
        push_field(&mut message, "Email", &customer.email);
        push_field(&mut message, "Address", &customer.address);
        push_field(&mut message, "City", &customer.city);
        push_field(&mut message, "PIN Code", &customer.pincode);
        message.push('\n');
    }

    message.push_str("\u{2705} Please confirm this order.\n");
    message.push_str(&format!("\u{1f64f} Thank you for choosing {BRAND}!"));

    message
}

/// Render the product inquiry message used by the detail page.
#[must_use]
pub fn product_inquiry_message(
    product_name: &str,
    product_unit: &str,
    customer_name: Option<&str>,
) -> String {
    let mut message = format!("\u{1f331} *Product Inquiry - {BRAND}*\n\n");
    message.push_str(&format!("\u{1f4e6} *Product: {product_name}*\n"));
    message.push_str(&format!("\u{1f4cf} *Unit: {product_unit}*\n\n"));

    if let Some(name) = customer_name {
        message.push_str(&format!("\u{1f464} *Customer: {name}*\n\n"));
    }

    message.push_str(
        "Hi! I'm interested in this product. Could you please provide more details about availability and pricing?\n\n",
    );
    message.push_str("Thank you! \u{1f64f}");

    message
}

/// Build the wa.me deep link carrying `message` to `phone_number`.
///
/// The phone number is in international format without `+`; the message is
/// URL-encoded into the `text` query parameter. Opening the link is the
/// caller's job.
#[must_use]
pub fn order_link(phone_number: &str, message: &str) -> String {
    format!(
        "https://wa.me/{phone_number}?text={}",
        urlencoding::encode(message)
    )
}

fn push_field(message: &mut String, label: &str, value: &str) {
    if !value.is_empty() {
        message.push_str(&format!("\u{2022} {label}: {value}\n"));
    }
}
