//! Product catalog route handler. The catalog is the home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use sprtshop_core::Product;

use crate::filters;
use crate::middleware::{CspNonce, OptionalIdentity};
use crate::routes::Nav;
use crate::state::AppState;

/// Product display data for catalog cards.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub stock: u32,
    pub in_stock: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            category: product.category.display_label(),
            price: product.price.format_inr(),
            stock: product.stock,
            in_stock: product.stock > 0,
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub nav: Nav,
    pub products: Vec<ProductCardView>,
    /// Set when the catalog could not be loaded; the page renders a retry
    /// notice instead of cards.
    pub error: Option<String>,
    pub signed_in: bool,
}

/// Display the product catalog.
#[instrument(skip(state, identity, nonce))]
pub async fn home(
    State(state): State<AppState>,
    OptionalIdentity(identity): OptionalIdentity,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let (products, error) = match state.backend().get_products().await {
        Ok(products) => (
            products.iter().map(ProductCardView::from).collect(),
            None,
        ),
        Err(e) => {
            tracing::error!("Failed to fetch product catalog: {e}");
            (
                Vec::new(),
                Some("Products are unavailable right now. Please try again.".to_string()),
            )
        }
    };

    let nav = super::nav(&state, identity.as_ref(), nonce).await;
    let signed_in = identity.is_some();

    HomeTemplate {
        nav,
        products,
        error,
        signed_in,
    }
}
