//! Outbound integrations: the WhatsApp handoff and the Telegram notifier.

pub mod telegram;
pub mod whatsapp;

pub use telegram::{OrderDetails, TelegramError, TelegramNotifier};
