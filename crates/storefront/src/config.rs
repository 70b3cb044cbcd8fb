//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GREENHOLLOW_WHATSAPP_PHONE` - Destination phone for order handoff,
//!   in international format without `+` (e.g. 919629002576)
//!
//! ## Optional
//! - `GREENHOLLOW_HOST` - Bind address (default: 127.0.0.1)
//! - `GREENHOLLOW_PORT` - Listen port (default: 3000)
//! - `GREENHOLLOW_BASE_URL` - Public URL (default: http://127.0.0.1:3000)
//! - `GREENHOLLOW_CATALOG_PATH` - Product catalog JSON file
//!   (default: crates/storefront/catalog/products.json)
//! - `GREENHOLLOW_DATA_DIR` - Directory for the cart snapshot store
//!   (default: ./data)
//! - `TELEGRAM_BOT_TOKEN` - Bot token for order notifications
//! - `TELEGRAM_CHAT_ID` - Chat the bot posts order notifications to
//! - `SENTRY_DSN` - Sentry error tracking DSN
//!
//! The Telegram pair is all-or-nothing: setting only one of the two
//! variables is a configuration error rather than a silently disabled
//! notifier.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Incomplete Telegram configuration: set both TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID, or neither")]
    PartialTelegramConfig,
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Path to the injected product catalog file
    pub catalog_path: PathBuf,
    /// Directory holding the cart snapshot store
    pub data_dir: PathBuf,
    /// WhatsApp order handoff configuration
    pub whatsapp: WhatsAppConfig,
    /// Telegram notification side-channel, when configured
    pub telegram: Option<TelegramConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// WhatsApp deep-link configuration.
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    /// Destination phone in international format without `+`.
    pub phone_number: String,
}

/// Telegram bot notification configuration.
///
/// Implements `Debug` manually to redact the bot token.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot API token
    pub bot_token: SecretString,
    /// Chat id the bot posts to (group chats are negative numbers)
    pub chat_id: String,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("GREENHOLLOW_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("GREENHOLLOW_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("GREENHOLLOW_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("GREENHOLLOW_PORT".to_string(), e.to_string()))?;

        let base_url = get_env_or_default("GREENHOLLOW_BASE_URL", "http://127.0.0.1:3000");
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("GREENHOLLOW_BASE_URL".to_string(), e.to_string())
        })?;

        let catalog_path = PathBuf::from(get_env_or_default(
            "GREENHOLLOW_CATALOG_PATH",
            "crates/storefront/catalog/products.json",
        ));
        let data_dir = PathBuf::from(get_env_or_default("GREENHOLLOW_DATA_DIR", "./data"));

        let whatsapp = WhatsAppConfig::from_env()?;
        let telegram = TelegramConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            host,
            port,
            base_url,
            catalog_path,
            data_dir,
            whatsapp,
            telegram,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl WhatsAppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let phone_number = get_required_env("GREENHOLLOW_WHATSAPP_PHONE")?;
        if phone_number.is_empty() || !phone_number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::InvalidEnvVar(
                "GREENHOLLOW_WHATSAPP_PHONE".to_string(),
                "expected digits only, international format without +".to_string(),
            ));
        }
        Ok(Self { phone_number })
    }
}

impl TelegramConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let bot_token = get_optional_env("TELEGRAM_BOT_TOKEN");
        let chat_id = get_optional_env("TELEGRAM_CHAT_ID");

        match (bot_token, chat_id) {
            (Some(bot_token), Some(chat_id)) => Ok(Some(Self {
                bot_token: SecretString::from(bot_token),
                chat_id,
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::PartialTelegramConfig),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://127.0.0.1:3000".to_string(),
            catalog_path: PathBuf::from("catalog/products.json"),
            data_dir: PathBuf::from("./data"),
            whatsapp: WhatsAppConfig {
                phone_number: "919629002576".to_string(),
            },
            telegram: Some(TelegramConfig {
                bot_token: SecretString::from("123456:super_secret_bot_token"),
                chat_id: "-1001234567890".to_string(),
            }),
            sentry_dsn: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_telegram_config_debug_redacts_token() {
        let debug_output = format!("{:?}", config().telegram.unwrap());

        assert!(debug_output.contains("-1001234567890"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_bot_token"));
    }
}
