//! Cart state and its invariants.
//!
//! A [`Cart`] holds two parallel lists: the items being bought and the items
//! saved for later. Both keep insertion order (which is display order) and
//! hold at most one entry per product id; an entry never appears in both
//! lists at once. All operations here are pure and synchronous - persistence
//! and cross-instance synchronization are layered on in the storefront's
//! cart manager.
//!
//! The 10-unit ceiling is a trust-the-client UX guard, not an inventory
//! guarantee: there is no authoritative stock source behind it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::id::ProductId;
use crate::types::price::Price;
use crate::types::product::Product;

/// Most units of a single product a cart will accept.
pub const MAX_UNITS_PER_PRODUCT: u32 = 10;

/// A product plus the quantity of it in a cart list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Line subtotal: quantity times the discounted price.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.product.price().times(self.quantity)
    }
}

/// Why an add or quantity change was rejected.
///
/// The `Display` form is the user-facing toast message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StockError {
    /// The projected quantity would exceed [`MAX_UNITS_PER_PRODUCT`].
    #[error("only {available} more of this item available in stock")]
    LimitExceeded {
        /// How many more units the cart will still accept.
        available: u32,
    },
    /// The product's stock flag is off.
    #[error("this product is currently out of stock")]
    OutOfStock,
}

/// The in-session cart: items being bought plus items saved for later.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
    saved_for_later: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            saved_for_later: Vec::new(),
        }
    }

    /// Rebuild a cart from previously persisted lists.
    #[must_use]
    pub const fn restore(items: Vec<CartItem>, saved_for_later: Vec<CartItem>) -> Self {
        Self {
            items,
            saved_for_later,
        }
    }

    /// The items being bought, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The saved-for-later list, in insertion order.
    #[must_use]
    pub fn saved_items(&self) -> &[CartItem] {
        &self.saved_for_later
    }

    /// Replace the bought-items list wholesale (snapshot reconciliation).
    pub fn replace_items(&mut self, items: Vec<CartItem>) {
        self.items = items;
    }

    /// Replace the saved-for-later list wholesale (snapshot reconciliation).
    pub fn replace_saved(&mut self, saved: Vec<CartItem>) {
        self.saved_for_later = saved;
    }

    /// Quantity of a product already in the bought-items list.
    #[must_use]
    pub fn quantity_of(&self, id: &ProductId) -> u32 {
        self.items
            .iter()
            .find(|item| &item.product.id == id)
            .map_or(0, |item| item.quantity)
    }

    /// Check whether `additional` more units of `product` fit in the cart.
    ///
    /// The ceiling is evaluated against the projected total (current in-cart
    /// quantity plus `additional`); the stock flag is checked second, so a
    /// ceiling violation wins when both apply.
    ///
    /// # Errors
    ///
    /// [`StockError::LimitExceeded`] or [`StockError::OutOfStock`].
    pub fn check_stock(&self, product: &Product, additional: i64) -> Result<(), StockError> {
        let current = self.quantity_of(&product.id);
        let projected = i64::from(current) + additional;

        if projected > i64::from(MAX_UNITS_PER_PRODUCT) {
            return Err(StockError::LimitExceeded {
                available: MAX_UNITS_PER_PRODUCT.saturating_sub(current),
            });
        }

        if !product.in_stock {
            return Err(StockError::OutOfStock);
        }

        Ok(())
    }

    /// Add `quantity` units of `product`, merging into an existing line.
    ///
    /// # Errors
    ///
    /// Rejected by the stock check; the cart is left untouched.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<(), StockError> {
        self.check_stock(product, i64::from(quantity))?;

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product.id == product.id)
        {
            item.quantity += quantity;
        } else {
            self.items.push(CartItem {
                product: product.clone(),
                quantity,
            });
        }

        Ok(())
    }

    /// Set a line's quantity. Zero delegates to [`Self::remove`]; an unknown
    /// id is a no-op.
    ///
    /// # Errors
    ///
    /// Rejected by the stock check (evaluated on the delta from the current
    /// quantity); the line keeps its old quantity.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: u32) -> Result<(), StockError> {
        if quantity == 0 {
            self.remove(id);
            return Ok(());
        }

        let Some(current) = self.items.iter().find(|item| &item.product.id == id) else {
            return Ok(());
        };
        let product = current.product.clone();
        let delta = i64::from(quantity) - i64::from(current.quantity);
        self.check_stock(&product, delta)?;

        if let Some(item) = self.items.iter_mut().find(|item| &item.product.id == id) {
            item.quantity = quantity;
        }

        Ok(())
    }

    /// Drop a line unconditionally.
    pub fn remove(&mut self, id: &ProductId) {
        self.items.retain(|item| &item.product.id != id);
    }

    /// Move a line to the saved-for-later list, merging quantities if the
    /// product is already saved. Unknown ids are a no-op.
    pub fn save_for_later(&mut self, id: &ProductId) {
        let Some(pos) = self.items.iter().position(|item| &item.product.id == id) else {
            return;
        };
        let item = self.items.remove(pos);

        if let Some(saved) = self
            .saved_for_later
            .iter_mut()
            .find(|saved| saved.product.id == item.product.id)
        {
            saved.quantity += item.quantity;
        } else {
            self.saved_for_later.push(item);
        }
    }

    /// Move a saved line back into the cart, merging quantities.
    ///
    /// Stock is re-validated first: time may have passed since the item was
    /// saved. On rejection the item stays in the saved list.
    ///
    /// # Errors
    ///
    /// Rejected by the stock check.
    pub fn move_to_cart(&mut self, id: &ProductId) -> Result<(), StockError> {
        let Some(pos) = self
            .saved_for_later
            .iter()
            .position(|item| &item.product.id == id)
        else {
            return Ok(());
        };
        let Some(saved) = self.saved_for_later.get(pos) else {
            return Ok(());
        };

        let (product, quantity) = (saved.product.clone(), saved.quantity);
        self.check_stock(&product, i64::from(quantity))?;

        let item = self.saved_for_later.remove(pos);
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|existing| existing.product.id == item.product.id)
        {
            existing.quantity += item.quantity;
        } else {
            self.items.push(item);
        }

        Ok(())
    }

    /// Drop a saved-for-later line unconditionally.
    pub fn remove_saved(&mut self, id: &ProductId) {
        self.saved_for_later.retain(|item| &item.product.id != id);
    }

    /// Empty both lists.
    pub fn clear(&mut self) {
        self.items.clear();
        self.saved_for_later.clear();
    }

    /// Sum of line subtotals over the bought items.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Sum of quantities over the bought items.
    #[must_use]
    pub fn items_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// True when the bought-items list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
