//! Admin console route handlers.
//!
//! Every handler extracts [`RequireAdmin`], so the backend's role answer
//! gates the whole console; a non-admin never reaches a handler body. The
//! backend additionally checks the role on each admin write, so a stale
//! cached answer can render the console but not mutate anything.

pub mod orders;
pub mod products;
pub mod roles;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use sprtshop_core::{CustomSticker, Product};

use crate::filters;
use crate::middleware::{CspNonce, RequireAdmin};
use crate::routes::Nav;
use crate::state::AppState;

/// Product row in the admin catalog table.
#[derive(Clone)]
pub struct AdminProductRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub stock: u32,
}

impl From<&Product> for AdminProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            category: product.category.display_label(),
            price: product.price.format_inr(),
            stock: product.stock,
        }
    }
}

/// Sticker row in the admin sticker overview.
#[derive(Clone)]
pub struct AdminStickerRow {
    pub name: String,
    pub creator: String,
    pub category: String,
    pub price: String,
    pub image_url: String,
}

impl From<&CustomSticker> for AdminStickerRow {
    fn from(sticker: &CustomSticker) -> Self {
        Self {
            name: sticker.name.clone(),
            creator: sticker.creator.abbreviated(),
            category: sticker.category.display_label(),
            price: sticker.price.format_inr(),
            image_url: sticker.image_url.clone(),
        }
    }
}

/// Query parameters for the panel page.
#[derive(Debug, Deserialize)]
pub struct PanelQuery {
    /// Set by the post-grant redirect to show the confirmation banner.
    pub role_granted: Option<u8>,
}

/// Admin panel page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/admin_panel.html")]
pub struct AdminPanelTemplate {
    pub nav: Nav,
    pub products: Vec<AdminProductRow>,
    pub products_error: Option<String>,
    pub stickers: Vec<AdminStickerRow>,
    pub stickers_error: Option<String>,
    pub role_granted: bool,
}

/// Display the admin panel: catalog management, the sticker overview, and
/// the role grant form.
///
/// The two sections load independently; one failing does not blank the
/// other.
#[instrument(skip(state, admin, nonce))]
pub async fn panel(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    CspNonce(nonce): CspNonce,
    Query(query): Query<PanelQuery>,
) -> impl IntoResponse {
    let (products, products_error) = match state.backend().get_products().await {
        Ok(products) => (products.iter().map(AdminProductRow::from).collect(), None),
        Err(e) => {
            tracing::error!("Failed to fetch products for admin panel: {e}");
            (
                Vec::new(),
                Some("Products could not be loaded. Please try again.".to_string()),
            )
        }
    };

    let (stickers, stickers_error) = match state.backend().get_all_stickers(&admin).await {
        Ok(stickers) => (stickers.iter().map(AdminStickerRow::from).collect(), None),
        Err(e) => {
            tracing::error!("Failed to fetch stickers for admin panel: {e}");
            (
                Vec::new(),
                Some("Stickers could not be loaded. Please try again.".to_string()),
            )
        }
    };

    let nav = super::nav(&state, Some(&admin), nonce).await;

    AdminPanelTemplate {
        nav,
        products,
        products_error,
        stickers,
        stickers_error,
        role_granted: query.role_granted == Some(1),
    }
}
