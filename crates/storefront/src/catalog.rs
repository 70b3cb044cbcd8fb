//! Product catalog loaded from an injected data file.
//!
//! The catalog is configuration, not source: products live in a JSON file
//! whose path comes from the environment, loaded once at startup and held
//! in memory for the life of the process. There is exactly one copy - the
//! routes all read through this store.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use greenhollow_core::{Product, ProductId};
use thiserror::Error;

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error reading catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Parse error in catalog {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("Duplicate product id in catalog: {0}")]
    DuplicateId(ProductId),
}

/// In-memory product catalog, indexed by id.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<Vec<Product>>,
    by_id: Arc<HashMap<ProductId, usize>>,
}

impl Catalog {
    /// Load the catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the file cannot be read or parsed, or
    /// when two products share an id. Load failures are fatal: a storefront
    /// without a catalog has nothing to sell.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let products: Vec<Product> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        let catalog = Self::from_products(products)?;
        tracing::info!(
            count = catalog.len(),
            path = %path.display(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Build a catalog from an already-deserialized product list.
    ///
    /// # Errors
    ///
    /// [`CatalogError::DuplicateId`] when two products share an id.
    pub fn from_products(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(products.len());
        for (index, product) in products.iter().enumerate() {
            if by_id.insert(product.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }

        Ok(Self {
            products: Arc::new(products),
            by_id: Arc::new(by_id),
        })
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.by_id
            .get(id)
            .and_then(|&index| self.products.get(index))
    }

    /// All products, in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Products in a category (case-insensitive match).
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| product.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// All distinct category names, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .products
            .iter()
            .map(|product| product.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// True when the catalog holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample(id: &str, category: &str) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Product {id}"),
            "unit": "250 g",
            "original_price": "200",
            "discounted_price": "120",
            "rating": 4.8,
            "reviews": 10,
            "badge": "Fresh",
            "description": "",
            "category": category,
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
    fn test_get_by_id() {
        let catalog =
            Catalog::from_products(vec![sample("1", "Powders"), sample("2", "Oils")]).unwrap();

        assert_eq!(
            catalog.get(&ProductId::new("2")).map(|p| p.name.as_str()),
            Some("Product 2")
        );
        assert!(catalog.get(&ProductId::new("ghost")).is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Catalog::from_products(vec![sample("1", "Powders"), sample("1", "Oils")]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(_))));
    }

    #[test]
    fn test_by_category_is_case_insensitive() {
        let catalog = Catalog::from_products(vec![
            sample("1", "Powders"),
            sample("2", "Oils"),
            sample("3", "Powders"),
        ])
        .unwrap();

        assert_eq!(catalog.by_category("powders").len(), 2);
        assert_eq!(catalog.by_category("OILS").len(), 1);
        assert!(catalog.by_category("Seeds").is_empty());
    }

    #[test]
    fn test_categories_sorted_and_deduped() {
        let catalog = Catalog::from_products(vec![
            sample("1", "Powders"),
            sample("2", "Oils"),
            sample("3", "Powders"),
        ])
        .unwrap();

        assert_eq!(catalog.categories(), ["Oils", "Powders"]);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = Catalog::load(Path::new("/definitely/not/here/products.json"));
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }
}
