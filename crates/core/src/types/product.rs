//! Catalog product records.
//!
//! Products are read-only data: deserialized once from the catalog file at
//! startup and never mutated. Besides the fields the shop logic needs (id,
//! prices, unit, stock flag), each record carries the marketing copy the
//! detail page renders.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::price::{CurrencyCode, Price};

/// A single product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Sale unit shown next to the price (e.g. "250 g", "1 ltr").
    pub unit: String,
    pub original_price: Decimal,
    pub discounted_price: Decimal,
    pub rating: f32,
    pub reviews: u32,
    /// Short merchandising label ("Bestseller", "Fresh", ...).
    pub badge: String,
    pub description: String,
    pub category: String,
    pub image: String,
    pub farm_to_table_image: String,
    pub in_stock: bool,

    // Marketing copy rendered on the product detail page.
    pub features: Vec<String>,
    pub processing_journey: Vec<String>,
    pub why_choose_our_farm: String,
    pub unique_selling_points: Vec<String>,
    pub seasonal_availability: String,
    pub pairing_suggestions: Vec<String>,
    pub storage_instructions: String,
    pub customer_use_cases: Vec<String>,
    pub sustainability_impact: String,
    pub farmer_story: String,
    pub product_story: String,
    pub health_benefits: Vec<String>,
    pub recipe_ideas: Vec<String>,
    pub eco_friendly_practices: Vec<String>,
    pub customer_spotlight: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limited_edition_appeal: Option<String>,
}

impl Product {
    /// The effective selling price.
    #[must_use]
    pub const fn price(&self) -> Price {
        Price::new(self.discounted_price, CurrencyCode::INR)
    }

    /// The struck-through original price, when it differs from the
    /// discounted one.
    #[must_use]
    pub fn compare_at_price(&self) -> Option<Price> {
        (self.original_price > self.discounted_price)
            .then(|| Price::new(self.original_price, CurrencyCode::INR))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// A minimal product for cart tests.
    pub(crate) fn product(id: &str, price: i64, in_stock: bool) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            unit: "250 g".to_owned(),
            original_price: Decimal::new(price + 50, 0),
            discounted_price: Decimal::new(price, 0),
            rating: 4.8,
            reviews: 42,
            badge: "Bestseller".to_owned(),
            description: String::new(),
            category: "Powders".to_owned(),
            image: "/static/images/placeholder.jpg".to_owned(),
            farm_to_table_image: "/static/images/placeholder.jpg".to_owned(),
            in_stock,
            features: Vec::new(),
            processing_journey: Vec::new(),
            why_choose_our_farm: String::new(),
            unique_selling_points: Vec::new(),
            seasonal_availability: String::new(),
            pairing_suggestions: Vec::new(),
            storage_instructions: String::new(),
            customer_use_cases: Vec::new(),
            sustainability_impact: String::new(),
            farmer_story: String::new(),
            product_story: String::new(),
            health_benefits: Vec::new(),
            recipe_ideas: Vec::new(),
            eco_friendly_practices: Vec::new(),
            customer_spotlight: String::new(),
            limited_edition_appeal: None,
        }
    }

    #[test]
    fn test_price_uses_discounted_amount() {
        let p = product("1", 120, true);
        assert_eq!(p.price().amount, Decimal::new(120, 0));
    }

    #[test]
    fn test_compare_at_price_only_when_discounted() {
        let mut p = product("1", 120, true);
        assert!(p.compare_at_price().is_some());

        p.original_price = p.discounted_price;
        assert!(p.compare_at_price().is_none());
    }

    #[test]
    fn test_serde_roundtrip() {
        let p = product("1", 120, true);
        let json = serde_json::to_string(&p).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
