//! Order history and confirmation route handlers.
//!
//! The backend decides who may see an order (owner or admin); these
//! handlers pass its answer through rather than re-deriving it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use sprtshop_core::{Order, OrderId, Paise, cart::item_count, pricing::resolve_priced_item};

use crate::error::Result;
use crate::filters;
use crate::middleware::{CspNonce, RequireIdentity};
use crate::routes::Nav;
use crate::state::AppState;

/// One row of the order history table.
#[derive(Clone)]
pub struct OrderSummaryView {
    pub id: String,
    pub status: String,
    pub status_slug: String,
    pub payment: String,
    pub total: String,
    pub item_count: u32,
}

impl From<&Order> for OrderSummaryView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            status: order.status.label().to_string(),
            status_slug: order.status.as_str().to_string(),
            payment: order.payment_method.label().to_string(),
            total: order.total.format_inr(),
            item_count: item_count(&order.items),
        }
    }
}

/// Order header data for the detail page.
#[derive(Clone)]
pub struct OrderDetailView {
    pub id: String,
    pub customer_name: String,
    pub delivery_address: String,
    pub payment: String,
    pub status: String,
    pub status_slug: String,
    pub total: String,
}

impl From<&Order> for OrderDetailView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            customer_name: order.customer_name.clone(),
            delivery_address: order.delivery_address.clone(),
            payment: order.payment_method.label().to_string(),
            status: order.status.label().to_string(),
            status_slug: order.status.as_str().to_string(),
            total: order.total.format_inr(),
        }
    }
}

/// One line of the order detail page.
///
/// Unit prices are resolved against the catalog at display time; the order
/// total is the checkout-time snapshot and stays authoritative.
#[derive(Clone)]
pub struct OrderLineView {
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub image_url: Option<String>,
    pub available: bool,
}

impl OrderLineView {
    fn unavailable(quantity: u32) -> Self {
        Self {
            name: "Item unavailable".to_string(),
            quantity,
            unit_price: Paise::ZERO.format_inr(),
            image_url: None,
            available: false,
        }
    }
}

/// Query parameters for the detail page.
#[derive(Debug, Deserialize)]
pub struct OrderShowQuery {
    /// Set by the checkout redirect to show the confirmation banner.
    pub placed: Option<u8>,
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/orders.html")]
pub struct OrdersTemplate {
    pub nav: Nav,
    pub orders: Vec<OrderSummaryView>,
    pub error: Option<String>,
}

/// Order detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/order_detail.html")]
pub struct OrderDetailTemplate {
    pub nav: Nav,
    pub order: OrderDetailView,
    pub lines: Vec<OrderLineView>,
    pub placed: bool,
}

/// Display the caller's order history, newest first as the backend returns
/// them.
#[instrument(skip(state, caller, nonce))]
pub async fn index(
    State(state): State<AppState>,
    RequireIdentity(caller): RequireIdentity,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let (orders, error) = match state.backend().get_caller_orders(&caller).await {
        Ok(orders) => (orders.iter().map(OrderSummaryView::from).collect(), None),
        Err(e) => {
            tracing::error!("Failed to fetch order history: {e}");
            (
                Vec::new(),
                Some("Your orders could not be loaded. Please try again.".to_string()),
            )
        }
    };

    let nav = super::nav(&state, Some(&caller), nonce).await;

    OrdersTemplate { nav, orders, error }
}

/// Display a single order.
///
/// Also serves as the post-checkout confirmation page via `?placed=1`.
#[instrument(skip(state, caller, nonce), fields(order_id = id))]
pub async fn show(
    State(state): State<AppState>,
    RequireIdentity(caller): RequireIdentity,
    CspNonce(nonce): CspNonce,
    Path(id): Path<i64>,
    Query(query): Query<OrderShowQuery>,
) -> Result<impl IntoResponse> {
    let order = state.backend().get_order(&caller, OrderId::new(id)).await?;

    let products = state.backend().get_products().await?;
    let stickers = state.backend().get_caller_stickers(&caller).await?;

    let mut lines = Vec::with_capacity(order.items.len());
    for item in &order.items {
        let line = if let Some(priced) =
            resolve_priced_item(item.product_id, &products, &stickers)
        {
            OrderLineView {
                name: priced.name.clone(),
                quantity: item.quantity,
                unit_price: priced.price.format_inr(),
                image_url: priced.image_url,
                available: true,
            }
        } else {
            // An admin viewing someone else's order will not have the
            // owner's stickers in hand; ask the backend for the single
            // sticker instead
            match state.backend().get_sticker(&caller, item.product_id).await {
                Ok(sticker) => OrderLineView {
                    name: sticker.name,
                    quantity: item.quantity,
                    unit_price: sticker.price.format_inr(),
                    image_url: Some(sticker.image_url),
                    available: true,
                },
                Err(e) => {
                    tracing::debug!("Order line {} no longer resolves: {e}", item.product_id);
                    OrderLineView::unavailable(item.quantity)
                }
            }
        };
        lines.push(line);
    }

    let nav = super::nav(&state, Some(&caller), nonce).await;

    Ok(OrderDetailTemplate {
        nav,
        order: OrderDetailView::from(&order),
        lines,
        placed: query.placed == Some(1),
    })
}
