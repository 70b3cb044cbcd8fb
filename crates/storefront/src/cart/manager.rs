//! The shared cart state manager.
//!
//! One `CartManager` instance lives in the app state and every handler talks
//! to it - there is a single reducer for cart state, not one per view.
//! The manager wraps the pure [`Cart`] semantics from the core crate with:
//!
//! - write-through persistence to a [`SnapshotStore`] after every mutation,
//! - a 24-hour session expiry evaluated at load time,
//! - versioned snapshot envelopes (unknown versions are discarded, not
//!   repaired),
//! - event-driven reconciliation with other manager instances sharing the
//!   same store (last snapshot wins, per the accepted one-user-two-tabs
//!   model).
//!
//! Store failures never surface to callers: a snapshot that cannot be read
//! is an empty cart, a write that fails is logged and the in-memory state
//! stays authoritative for this instance.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;

use greenhollow_core::{Cart, CartItem, Price, Product, ProductId, StockError};

use super::store::{SnapshotStore, StoreEvent};

/// Store key for the bought-items list.
pub const CART_KEY: &str = "cart";
/// Store key for the saved-for-later list.
pub const SAVED_KEY: &str = "saved_for_later";
/// Store key for the session-expiry timestamp.
pub const UPDATED_AT_KEY: &str = "updated_at";

/// Snapshot envelope version this build reads and writes.
const SNAPSHOT_VERSION: u32 = 1;

/// A snapshot older than this is a stale session and gets discarded.
const SESSION_TTL_HOURS: i64 = 24;

/// Versioned persisted form of one cart list.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    items: Vec<CartItem>,
}

/// Shared cart state over a snapshot store.
///
/// Cheaply cloneable; clones share the same state and store.
#[derive(Clone)]
pub struct CartManager {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn SnapshotStore>,
    state: RwLock<Cart>,
}

impl CartManager {
    /// Load cart state from the store.
    ///
    /// Parse failures fall back to an empty list for the affected
    /// collection. A missing, unreadable, or stale `updated_at` timestamp
    /// discards both collections and resets the timestamp.
    #[must_use]
    pub fn load(store: Arc<dyn SnapshotStore>) -> Self {
        let manager = Self {
            inner: Arc::new(Inner {
                store,
                state: RwLock::new(Cart::new()),
            }),
        };

        if manager.session_expired() {
            tracing::info!("Cart session expired or missing; starting empty");
            manager.persist(&Cart::new());
            return manager;
        }

        let items = manager.read_list(CART_KEY);
        let saved = manager.read_list(SAVED_KEY);
        *manager.write() = Cart::restore(items, saved);
        manager
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of `product`.
    ///
    /// # Errors
    ///
    /// Rejected by the stock check; callers surface the error as a toast.
    pub fn add_to_cart(&self, product: &Product, quantity: u32) -> Result<(), StockError> {
        let mut state = self.write();
        state.add(product, quantity)?;
        self.persist(&state);
        Ok(())
    }

    /// Set a line's quantity; zero removes the line.
    ///
    /// # Errors
    ///
    /// Rejected by the stock check; the line keeps its old quantity.
    pub fn update_quantity(&self, id: &ProductId, quantity: u32) -> Result<(), StockError> {
        let mut state = self.write();
        state.update_quantity(id, quantity)?;
        self.persist(&state);
        Ok(())
    }

    /// Drop a line unconditionally.
    pub fn remove_from_cart(&self, id: &ProductId) {
        let mut state = self.write();
        state.remove(id);
        self.persist(&state);
    }

    /// Move a line to the saved-for-later list.
    pub fn save_for_later(&self, id: &ProductId) {
        let mut state = self.write();
        state.save_for_later(id);
        self.persist(&state);
    }

    /// Move a saved line back into the cart, re-validating stock.
    ///
    /// # Errors
    ///
    /// Rejected by the stock check; the item stays saved.
    pub fn move_to_cart(&self, id: &ProductId) -> Result<(), StockError> {
        let mut state = self.write();
        state.move_to_cart(id)?;
        self.persist(&state);
        Ok(())
    }

    /// Drop a saved-for-later line unconditionally.
    pub fn remove_saved_item(&self, id: &ProductId) {
        let mut state = self.write();
        state.remove_saved(id);
        self.persist(&state);
    }

    /// Empty both lists and reset the session timestamp.
    pub fn clear_cart(&self) {
        let mut state = self.write();
        state.clear();
        self.persist(&state);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The bought items, in display order.
    #[must_use]
    pub fn cart_items(&self) -> Vec<CartItem> {
        self.read().items().to_vec()
    }

    /// The saved-for-later items, in display order.
    #[must_use]
    pub fn saved_items(&self) -> Vec<CartItem> {
        self.read().saved_items().to_vec()
    }

    /// Sum of line subtotals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.read().total()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn items_count(&self) -> u32 {
        self.read().items_count()
    }

    /// True when there is nothing to order.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // =========================================================================
    // Cross-instance synchronization
    // =========================================================================

    /// Consume the store's change feed and apply external snapshots until
    /// the store is dropped.
    pub fn spawn_sync(&self) -> tokio::task::JoinHandle<()> {
        let manager = self.clone();
        let mut feed = manager.inner.store.subscribe();
        tokio::spawn(async move {
            loop {
                match feed.recv().await {
                    Ok(event) => manager.apply_store_event(&event),
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "Cart change feed lagged; resyncing from store");
                        manager.resync_from_store();
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    /// Apply one store change notification.
    ///
    /// The most recently read snapshot wins; a concurrent local edit that
    /// was not flushed yet is silently discarded. A removed key decodes as
    /// an empty list. Own writes arrive here too and no-op on the equality
    /// check.
    pub fn apply_store_event(&self, event: &StoreEvent) {
        match event.key.as_str() {
            CART_KEY => {
                let items = decode_list(event.new_value.as_deref(), CART_KEY);
                let mut state = self.write();
                if state.items() != items.as_slice() {
                    tracing::debug!(count = items.len(), "Cart list replaced from store event");
                    state.replace_items(items);
                }
            }
            SAVED_KEY => {
                let saved = decode_list(event.new_value.as_deref(), SAVED_KEY);
                let mut state = self.write();
                if state.saved_items() != saved.as_slice() {
                    tracing::debug!(count = saved.len(), "Saved list replaced from store event");
                    state.replace_saved(saved);
                }
            }
            _ => {}
        }
    }

    /// Re-read both snapshots and replace local state.
    fn resync_from_store(&self) {
        let items = self.read_list(CART_KEY);
        let saved = self.read_list(SAVED_KEY);
        let mut state = self.write();
        state.replace_items(items);
        state.replace_saved(saved);
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write both lists and the session timestamp through to the store.
    ///
    /// Failures are logged only; in-memory state stays authoritative.
    fn persist(&self, cart: &Cart) {
        self.persist_list(CART_KEY, cart.items());
        self.persist_list(SAVED_KEY, cart.saved_items());
        if let Err(e) = self
            .inner
            .store
            .put(UPDATED_AT_KEY, &Utc::now().to_rfc3339())
        {
            tracing::error!(key = UPDATED_AT_KEY, error = %e, "Failed to persist cart timestamp");
        }
    }

    fn persist_list(&self, key: &str, items: &[CartItem]) {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            items: items.to_vec(),
        };
        match serde_json::to_string(&snapshot) {
            Ok(encoded) => {
                if let Err(e) = self.inner.store.put(key, &encoded) {
                    tracing::error!(key, error = %e, "Failed to persist cart snapshot");
                }
            }
            Err(e) => tracing::error!(key, error = %e, "Failed to encode cart snapshot"),
        }
    }

    fn read_list(&self, key: &str) -> Vec<CartItem> {
        match self.inner.store.get(key) {
            Ok(raw) => decode_list(raw.as_deref(), key),
            Err(e) => {
                tracing::error!(key, error = %e, "Failed to read cart snapshot");
                Vec::new()
            }
        }
    }

    /// Whether the persisted session is missing or older than the TTL.
    fn session_expired(&self) -> bool {
        let raw = match self.inner.store.get(UPDATED_AT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return true,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read cart timestamp");
                return true;
            }
        };

        DateTime::parse_from_rfc3339(&raw).map_or(true, |updated_at| {
            Utc::now() - updated_at.with_timezone(&Utc) > Duration::hours(SESSION_TTL_HOURS)
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, Cart> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Cart> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Decode one persisted list; anything malformed is an empty list.
fn decode_list(raw: Option<&str>, key: &str) -> Vec<CartItem> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    match serde_json::from_str::<Snapshot>(raw) {
        Ok(snapshot) if snapshot.version == SNAPSHOT_VERSION => snapshot.items,
        Ok(snapshot) => {
            tracing::warn!(
                key,
                version = snapshot.version,
                "Discarding cart snapshot with unrecognized version"
            );
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding unparseable cart snapshot");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::super::store::MemoryStore;
    use super::*;
    use greenhollow_core::{CurrencyCode, ProductId};

    fn product(id: &str, price: i64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Product {id}"),
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

    #[test]
    fn test_snapshot_roundtrip_through_reload() {
        let store = Arc::new(MemoryStore::new());
        let manager = CartManager::load(store.clone());

        manager.add_to_cart(&product("a", 120), 2).unwrap();
        manager.add_to_cart(&product("b", 525), 1).unwrap();
        manager.save_for_later(&ProductId::new("b"));

        let reloaded = CartManager::load(store);
        let order: Vec<(String, u32)> = reloaded
            .cart_items()
            .iter()
            .map(|item| (item.product.id.to_string(), item.quantity))
            .collect();
        assert_eq!(order, [("a".to_owned(), 2)]);
        assert_eq!(reloaded.saved_items().len(), 1);
        assert_eq!(reloaded.total().amount, Decimal::new(240, 0));
    }

    #[test]
    fn test_malformed_snapshot_loads_empty() {
        let store = Arc::new(MemoryStore::new());
        store.put(UPDATED_AT_KEY, &Utc::now().to_rfc3339()).unwrap();
        store.put(CART_KEY, "{definitely not json").unwrap();

        let manager = CartManager::load(store);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_unrecognized_version_discarded() {
        let store = Arc::new(MemoryStore::new());
        store.put(UPDATED_AT_KEY, &Utc::now().to_rfc3339()).unwrap();
        store
            .put(CART_KEY, "{\"version\": 99, \"items\": []}")
            .unwrap();

        let manager = CartManager::load(store);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_stale_session_discarded_and_timestamp_reset() {
        let store = Arc::new(MemoryStore::new());
        let seeded = CartManager::load(store.clone());
        seeded.add_to_cart(&product("a", 120), 2).unwrap();

        let stale = (Utc::now() - Duration::hours(25)).to_rfc3339();
        store.put(UPDATED_AT_KEY, &stale).unwrap();

        let manager = CartManager::load(store.clone());
        assert!(manager.is_empty());

        let reset = store.get(UPDATED_AT_KEY).unwrap().unwrap();
        let reset = DateTime::parse_from_rfc3339(&reset).unwrap();
        assert!(Utc::now() - reset.with_timezone(&Utc) < Duration::minutes(1));
    }

    #[test]
    fn test_missing_timestamp_discards_snapshot() {
        let store = Arc::new(MemoryStore::new());
        let seeded = CartManager::load(store.clone());
        seeded.add_to_cart(&product("a", 120), 2).unwrap();
        store.remove(UPDATED_AT_KEY).unwrap();

        let manager = CartManager::load(store);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_apply_store_event_replaces_differing_state() {
        let store = Arc::new(MemoryStore::new());
        let first = CartManager::load(store.clone());
        let second = CartManager::load(store.clone());

        first.add_to_cart(&product("a", 120), 2).unwrap();
        assert_eq!(second.items_count(), 0);

        let event = StoreEvent {
            key: CART_KEY.to_owned(),
            new_value: store.get(CART_KEY).unwrap(),
        };
        second.apply_store_event(&event);
        assert_eq!(second.items_count(), 2);
    }

    #[test]
    fn test_apply_store_event_removed_key_empties_list() {
        let store = Arc::new(MemoryStore::new());
        let manager = CartManager::load(store);
        manager.add_to_cart(&product("a", 120), 2).unwrap();

        manager.apply_store_event(&StoreEvent {
            key: CART_KEY.to_owned(),
            new_value: None,
        });
        assert!(manager.is_empty());
    }

    #[test]
    fn test_apply_store_event_ignores_unrelated_keys() {
        let store = Arc::new(MemoryStore::new());
        let manager = CartManager::load(store);
        manager.add_to_cart(&product("a", 120), 2).unwrap();

        manager.apply_store_event(&StoreEvent {
            key: "something_else".to_owned(),
            new_value: None,
        });
        assert_eq!(manager.items_count(), 2);
    }

    #[tokio::test]
    async fn test_spawn_sync_reconciles_two_instances() {
        let store = Arc::new(MemoryStore::new());
        let first = CartManager::load(store.clone());
        let second = CartManager::load(store);
        let handle = second.spawn_sync();

        first.add_to_cart(&product("a", 120), 3).unwrap();

        let mut reconciled = false;
        for _ in 0..200 {
            if second.items_count() == 3 {
                reconciled = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert!(reconciled, "second instance never picked up the snapshot");
        assert_eq!(second.total().amount, Decimal::new(360, 0));
        assert_eq!(second.total().currency_code, CurrencyCode::INR);

        handle.abort();
    }

    #[test]
    fn test_clear_cart_persists_empty_lists() {
        let store = Arc::new(MemoryStore::new());
        let manager = CartManager::load(store.clone());
        manager.add_to_cart(&product("a", 120), 2).unwrap();
        manager.save_for_later(&ProductId::new("a"));

        manager.clear_cart();

        let reloaded = CartManager::load(store);
        assert!(reloaded.is_empty());
        assert!(reloaded.saved_items().is_empty());
    }

    #[test]
    fn test_stock_rejection_leaves_store_untouched() {
        let store = Arc::new(MemoryStore::new());
        let manager = CartManager::load(store.clone());
        manager.add_to_cart(&product("a", 120), 9).unwrap();

        assert!(manager.add_to_cart(&product("a", 120), 2).is_err());

        let reloaded = CartManager::load(store);
        assert_eq!(reloaded.items_count(), 9);
    }
}
