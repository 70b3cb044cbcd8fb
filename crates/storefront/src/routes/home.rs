//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::routes::products::ProductView;
use crate::state::AppState;

/// Number of products featured on the home page.
const FEATURED_PRODUCTS: usize = 3;

/// Hero banner content.
#[derive(Clone)]
pub struct HeroView {
    pub title: String,
    pub subtitle: String,
    pub button_text: String,
    pub button_url: String,
    pub image_path: String,
}

impl Default for HeroView {
    fn default() -> Self {
        Self {
            title: "Fresh From Our Fields".to_string(),
            subtitle: "Single-origin powders and cold-pressed oils, grown and ground on our own farm in the Kerala hills.".to_string(),
            button_text: "Shop Products".to_string(),
            button_url: "/products".to_string(),
            image_path: "/static/images/hero-farm.jpg".to_string(),
        }
    }
}

/// A headline number for the stats strip.
#[derive(Clone)]
pub struct StatView {
    pub value: String,
    pub label: String,
}

/// A customer testimonial for display on the homepage.
#[derive(Clone)]
pub struct TestimonialView {
    pub name: String,
    pub location: String,
    pub content: String,
    pub rating: u8,
}

/// Static stats for the homepage strip.
fn farm_stats() -> Vec<StatView> {
    vec![
        StatView {
            value: "3rd".to_string(),
            label: "generation family farm".to_string(),
        },
        StatView {
            value: "0".to_string(),
            label: "chemical pesticides used".to_string(),
        },
        StatView {
            value: "48h".to_string(),
            label: "from harvest to dispatch".to_string(),
        },
    ]
}

/// Static testimonials for the homepage (can be replaced with dynamic data later).
fn featured_testimonials() -> Vec<TestimonialView> {
    vec![
        TestimonialView {
            name: "Lakshmi P.".to_string(),
            location: "Bengaluru".to_string(),
            content: "The turmeric smells nothing like the supermarket jars. One order and we never went back.".to_string(),
            rating: 5,
        },
        TestimonialView {
            name: "Arjun S.".to_string(),
            location: "Chennai".to_string(),
            content: "Ordered over WhatsApp on a Sunday evening, the parcel reached us by Wednesday. Oil tastes like my grandmother's pressing.".to_string(),
            rating: 5,
        },
        TestimonialView {
            name: "Divya R.".to_string(),
            location: "Kochi".to_string(),
            content: "The moringa powder goes into our dosa batter every morning now. Love that every packet names the farmer.".to_string(),
            rating: 4,
        },
    ]
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub hero: HeroView,
    pub featured: Vec<ProductView>,
    pub stats: Vec<StatView>,
    pub testimonials: Vec<TestimonialView>,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let featured = state
        .catalog()
        .all()
        .iter()
        .take(FEATURED_PRODUCTS)
        .map(ProductView::from)
        .collect();

    HomeTemplate {
        hero: HeroView::default(),
        featured,
        stats: farm_stats(),
        testimonials: featured_testimonials(),
    }
}
