//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::CartManager;
use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::services::TelegramNotifier;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the single shared cart manager, and the optional notifier.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    cart: CartManager,
    telegram: Option<TelegramNotifier>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The Telegram notifier is built from config when the credentials are
    /// present; otherwise the side-channel stays off.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog, cart: CartManager) -> Self {
        let telegram = config.telegram.as_ref().map(TelegramNotifier::new);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                cart,
                telegram,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the shared cart manager.
    #[must_use]
    pub fn cart(&self) -> &CartManager {
        &self.inner.cart
    }

    /// Get the Telegram notifier, when configured.
    #[must_use]
    pub fn telegram(&self) -> Option<&TelegramNotifier> {
        self.inner.telegram.as_ref()
    }
}
