//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The backend owns the cart; every handler re-reads it after a write so
//! the fragment reflects what was actually stored.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use sprtshop_core::{
    CartItem, CustomSticker, ItemId, Paise, Product,
    cart::item_count,
    pricing::{cart_total, resolve_priced_item},
};

use crate::backend::BackendError;
use crate::filters;
use crate::middleware::{CspNonce, OptionalIdentity, RequireIdentity};
use crate::models::Identity;
use crate::routes::{Nav, form_error, rejection_message};
use crate::state::AppState;
use crate::validate;

/// One cart line, resolved against the catalog for display.
#[derive(Clone)]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
    pub image_url: Option<String>,
    /// Stock ceiling for the quantity input; sticker lines have none.
    pub max_quantity: Option<u32>,
    /// False when the item no longer exists in either collection.
    pub available: bool,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            total: Paise::ZERO.format_inr(),
            item_count: 0,
        }
    }

    /// Resolve raw cart lines against the catalog and the caller's
    /// stickers. Lines that resolve to neither render as unavailable and
    /// price at zero.
    #[must_use]
    pub fn build(items: &[CartItem], products: &[Product], stickers: &[CustomSticker]) -> Self {
        let lines = items
            .iter()
            .map(|item| {
                resolve_priced_item(item.product_id, products, stickers).map_or_else(
                    || CartLineView {
                        product_id: item.product_id.to_string(),
                        name: "Item unavailable".to_string(),
                        quantity: item.quantity,
                        unit_price: Paise::ZERO.format_inr(),
                        line_total: Paise::ZERO.format_inr(),
                        image_url: None,
                        max_quantity: None,
                        available: false,
                    },
                    |priced| CartLineView {
                        product_id: item.product_id.to_string(),
                        name: priced.name.clone(),
                        quantity: item.quantity,
                        unit_price: priced.price.format_inr(),
                        line_total: (priced.price * item.quantity).format_inr(),
                        image_url: priced.image_url,
                        max_quantity: priced.stock,
                        available: true,
                    },
                )
            })
            .collect();

        Self {
            lines,
            total: cart_total(items, products, stickers).format_inr(),
            item_count: item_count(items),
        }
    }
}

/// Reject a quantity that exceeds a regular product's stock before the
/// backend is called.
///
/// Sticker lines have no stock ceiling and unknown ids pass through; when
/// the catalog itself cannot be read the gate stands aside and the
/// backend's own check decides.
async fn check_stock(
    state: &AppState,
    caller: &Identity,
    product_id: ItemId,
    quantity: u32,
) -> Result<(), validate::ValidationError> {
    let products = state.backend().get_products().await.unwrap_or_default();
    let stickers = state
        .backend()
        .get_caller_stickers(caller)
        .await
        .unwrap_or_default();

    match resolve_priced_item(product_id, &products, &stickers) {
        Some(priced) => validate::check_stock_bound(quantity, priced.stock),
        None => Ok(()),
    }
}

/// Fetch and resolve the caller's cart.
pub(crate) async fn build_cart_view(
    state: &AppState,
    caller: &Identity,
) -> Result<CartView, BackendError> {
    let items = state.backend().get_cart(caller).await?;
    let products = state.backend().get_products().await?;
    let stickers = state.backend().get_caller_stickers(caller).await?;
    Ok(CartView::build(&items, &products, &stickers))
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i64,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i64,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i64,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/cart.html")]
pub struct CartShowTemplate {
    pub nav: Nav,
    pub cart: CartView,
    pub error: Option<String>,
    pub signed_in: bool,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
    pub error: Option<String>,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(state, identity, nonce))]
pub async fn show(
    State(state): State<AppState>,
    OptionalIdentity(identity): OptionalIdentity,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let (cart, error) = match identity {
        Some(ref caller) => match build_cart_view(&state, caller).await {
            Ok(view) => (view, None),
            Err(e) => {
                tracing::error!("Failed to load cart: {e}");
                (
                    CartView::empty(),
                    Some("Your cart could not be loaded. Please try again.".to_string()),
                )
            }
        },
        None => (CartView::empty(), None),
    };

    let nav = super::nav(&state, identity.as_ref(), nonce).await;
    let signed_in = identity.is_some();

    CartShowTemplate {
        nav,
        cart,
        error,
        signed_in,
    }
}

/// Add an item to the cart (HTMX).
///
/// Returns the refreshed count badge and fires `cart-updated` so other
/// fragments can refresh themselves.
#[instrument(skip(state, caller))]
pub async fn add(
    State(state): State<AppState>,
    RequireIdentity(caller): RequireIdentity,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let quantity = match validate::check_quantity(form.quantity.unwrap_or(1)) {
        Ok(quantity) => quantity,
        Err(e) => return form_error(e.to_string()),
    };
    if let Err(e) = check_stock(&state, &caller, ItemId::new(form.product_id), quantity).await {
        return form_error(e.to_string());
    }

    match state
        .backend()
        .add_to_cart(&caller, ItemId::new(form.product_id), quantity)
        .await
    {
        Ok(()) => {
            let items = state.backend().get_cart_or_default(Some(&caller)).await;
            (
                AppendHeaders([("HX-Trigger", "cart-updated")]),
                CartCountTemplate {
                    count: item_count(&items),
                },
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to add item to cart: {e}");
            form_error(rejection_message(&e, "Could not add to cart. Please try again."))
        }
    }
}

/// Change a cart line's quantity (HTMX).
#[instrument(skip(state, caller))]
pub async fn update(
    State(state): State<AppState>,
    RequireIdentity(caller): RequireIdentity,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let quantity = match validate::check_quantity(form.quantity) {
        Ok(quantity) => quantity,
        Err(e) => return form_error(e.to_string()),
    };
    if let Err(e) = check_stock(&state, &caller, ItemId::new(form.product_id), quantity).await {
        return form_error(e.to_string());
    }

    match state
        .backend()
        .update_cart_item(&caller, ItemId::new(form.product_id), quantity)
        .await
    {
        Ok(()) => refreshed_items(&state, &caller).await,
        Err(e) => {
            tracing::warn!("Failed to update cart line: {e}");
            form_error(rejection_message(&e, "Could not update the cart. Please try again."))
        }
    }
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(state, caller))]
pub async fn remove(
    State(state): State<AppState>,
    RequireIdentity(caller): RequireIdentity,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    match state
        .backend()
        .remove_cart_item(&caller, ItemId::new(form.product_id))
        .await
    {
        Ok(()) => refreshed_items(&state, &caller).await,
        Err(e) => {
            tracing::warn!("Failed to remove cart line: {e}");
            form_error(rejection_message(&e, "Could not remove the item. Please try again."))
        }
    }
}

/// Empty the cart (HTMX).
#[instrument(skip(state, caller))]
pub async fn clear(
    State(state): State<AppState>,
    RequireIdentity(caller): RequireIdentity,
) -> Response {
    match state.backend().clear_cart(&caller).await {
        Ok(()) => refreshed_items(&state, &caller).await,
        Err(e) => {
            tracing::warn!("Failed to clear cart: {e}");
            form_error(rejection_message(&e, "Could not clear the cart. Please try again."))
        }
    }
}

/// Cart count badge fragment (HTMX).
#[instrument(skip(state, identity))]
pub async fn count(
    State(state): State<AppState>,
    OptionalIdentity(identity): OptionalIdentity,
) -> impl IntoResponse {
    let items = state.backend().get_cart_or_default(identity.as_ref()).await;
    CartCountTemplate {
        count: item_count(&items),
    }
}

/// Rebuild the cart items fragment after a successful write.
async fn refreshed_items(state: &AppState, caller: &Identity) -> Response {
    let (cart, error) = match build_cart_view(state, caller).await {
        Ok(view) => (view, None),
        Err(e) => {
            tracing::error!("Failed to refresh cart after update: {e}");
            (
                CartView::empty(),
                Some("Your cart could not be refreshed. Reload the page.".to_string()),
            )
        }
    };

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart, error },
    )
        .into_response()
}
