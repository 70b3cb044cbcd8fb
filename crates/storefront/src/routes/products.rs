//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::instrument;

use greenhollow_core::{Product, ProductId};

use crate::error::AppError;
use crate::filters;
use crate::services::whatsapp;
use crate::state::AppState;

/// Product card data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub badge: String,
    pub rating: String,
    pub reviews: u32,
    pub description: String,
    pub category: String,
    pub image: String,
    pub in_stock: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            unit: product.unit.clone(),
            price: product.price().to_string(),
            compare_at_price: product.compare_at_price().map(|price| price.to_string()),
            badge: product.badge.clone(),
            rating: format!("{:.1}", product.rating),
            reviews: product.reviews,
            description: product.description.clone(),
            category: product.category.clone(),
            image: product.image.clone(),
            in_stock: product.in_stock,
        }
    }
}

/// Catalog filter query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub categories: Vec<String>,
    pub active_category: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    /// Full catalog record; the template reads the marketing fields off it.
    pub product: Product,
    pub view: ProductView,
    /// WhatsApp deep link carrying a prefilled inquiry for this product.
    pub inquiry_link: String,
}

/// Display product listing page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> ProductsIndexTemplate {
    let catalog = state.catalog();

    let products = match query.category.as_deref() {
        Some(category) => catalog
            .by_category(category)
            .into_iter()
            .map(ProductView::from)
            .collect(),
        None => catalog.all().iter().map(ProductView::from).collect(),
    };

    ProductsIndexTemplate {
        products,
        categories: catalog.categories(),
        active_category: query.category,
    }
}

/// Display product detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ProductShowTemplate, AppError> {
    let id = ProductId::new(id);
    let product = state
        .catalog()
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?
        .clone();

    let inquiry = whatsapp::product_inquiry_message(&product.name, &product.unit, None);
    let inquiry_link = whatsapp::order_link(&state.config().whatsapp.phone_number, &inquiry);

    Ok(ProductShowTemplate {
        view: ProductView::from(&product),
        product,
        inquiry_link,
    })
}
