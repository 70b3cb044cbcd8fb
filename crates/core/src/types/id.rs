//! Newtype ids for type-safe entity references.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a catalog product.
///
/// Catalog ids are opaque strings assigned in the catalog file; the wrapper
/// keeps them from being mixed up with other string-shaped values (units,
/// category names) in function signatures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id from its string form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The underlying string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier stamped onto an outbound order notification.
///
/// Orders are not persisted anywhere; the id only exists so the person
/// reading the chat message can refer back to a specific order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Generate a fresh random order id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_display() {
        let id = ProductId::new("turmeric-250");
        assert_eq!(id.to_string(), "turmeric-250");
        assert_eq!(id.as_str(), "turmeric-250");
    }

    #[test]
    fn test_product_id_serde_transparent() {
        let id = ProductId::new("1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"1\"");
        let back: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_order_ids_are_unique() {
        assert_ne!(OrderId::generate(), OrderId::generate());
    }
}
