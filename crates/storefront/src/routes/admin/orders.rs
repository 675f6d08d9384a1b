//! Admin order management route handlers.
//!
//! Every order in the store is listed with who placed it and an inline
//! status form. A status change swaps only the affected table row back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use sprtshop_core::{
    CustomSticker, Order, OrderId, OrderStatus, PrincipalId, Product,
    pricing::resolve_priced_item,
};

use crate::backend::BackendError;
use crate::filters;
use crate::middleware::{CspNonce, RequireAdmin};
use crate::models::Identity;
use crate::routes::{Nav, form_error, rejection_message};
use crate::state::AppState;

/// One choice in a row's status select.
#[derive(Clone)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// One row of the all-orders table.
#[derive(Clone)]
pub struct AdminOrderRow {
    pub id: String,
    /// Owner's display name when they have one, abbreviated principal
    /// otherwise.
    pub placed_by: String,
    /// Full owner principal, carried in a hidden field so a status change
    /// can drop the owner's cached history.
    pub owner_principal: String,
    pub customer_name: String,
    pub payment: String,
    pub status: String,
    pub status_slug: String,
    pub total: String,
    /// "quantity × name" per line, already resolved.
    pub lines: Vec<String>,
    pub statuses: Vec<StatusOption>,
}

/// Status change form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: OrderStatus,
    pub owner: String,
}

/// All-orders page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/admin_orders.html")]
pub struct AdminOrdersTemplate {
    pub nav: Nav,
    pub orders: Vec<AdminOrderRow>,
    pub error: Option<String>,
}

/// Single refreshed row, swapped in after a status change.
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_row.html")]
pub struct OrderRowTemplate {
    pub row: AdminOrderRow,
}

async fn build_order_row(
    state: &AppState,
    admin: &Identity,
    order: &Order,
    products: &[Product],
    stickers: &[CustomSticker],
) -> AdminOrderRow {
    let placed_by = match state.backend().get_user_profile(admin, &order.user).await {
        Ok(profile) if !profile.name.trim().is_empty() => profile.name,
        Ok(_) => order.user.abbreviated(),
        Err(e) => {
            tracing::debug!("No profile for {}: {e}", order.user.abbreviated());
            order.user.abbreviated()
        }
    };

    let lines = order
        .items
        .iter()
        .map(|item| {
            resolve_priced_item(item.product_id, products, stickers).map_or_else(
                || format!("{} × Item unavailable", item.quantity),
                |priced| format!("{} × {}", item.quantity, priced.name),
            )
        })
        .collect();

    let statuses = OrderStatus::ALL
        .iter()
        .map(|status| StatusOption {
            value: status.as_str(),
            label: status.label(),
            selected: *status == order.status,
        })
        .collect();

    AdminOrderRow {
        id: order.id.to_string(),
        placed_by,
        owner_principal: order.user.as_str().to_string(),
        customer_name: order.customer_name.clone(),
        payment: order.payment_method.label().to_string(),
        status: order.status.label().to_string(),
        status_slug: order.status.as_str().to_string(),
        total: order.total.format_inr(),
        lines,
        statuses,
    }
}

/// Display every order in the store.
#[instrument(skip(state, admin, nonce))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let (orders, error) = match state.backend().get_all_orders(&admin).await {
        Ok(orders) => (orders, None),
        Err(e) => {
            tracing::error!("Failed to fetch orders: {e}");
            (
                Vec::new(),
                Some("Orders could not be loaded. Please try again.".to_string()),
            )
        }
    };

    // Line names degrade to "Item unavailable" when these fail; the table
    // itself still renders.
    let products = state.backend().get_products().await.unwrap_or_else(|e| {
        tracing::warn!("Failed to fetch products for order lines: {e}");
        Vec::new()
    });
    let stickers = state
        .backend()
        .get_all_stickers(&admin)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to fetch stickers for order lines: {e}");
            Vec::new()
        });

    let mut rows = Vec::with_capacity(orders.len());
    for order in &orders {
        rows.push(build_order_row(&state, &admin, order, &products, &stickers).await);
    }

    let nav = crate::routes::nav(&state, Some(&admin), nonce).await;

    AdminOrdersTemplate {
        nav,
        orders: rows,
        error,
    }
}

/// Change an order's status (HTMX) and swap the refreshed row back in.
#[instrument(skip(state, admin, form), fields(order_id = id))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Response {
    let order_id = OrderId::new(id);
    let owner = PrincipalId::new(&form.owner);

    if let Err(e) = state
        .backend()
        .update_order_status(&admin, order_id, form.status, &owner)
        .await
    {
        tracing::warn!("Failed to update order status: {e}");
        return form_error(rejection_message(
            &e,
            "Could not update the order. Please try again.",
        ));
    }

    match refreshed_row(&state, &admin, order_id).await {
        Ok(row) => OrderRowTemplate { row }.into_response(),
        Err(e) => {
            tracing::warn!("Failed to re-render order row: {e}");
            form_error(
                "Status saved, but the row could not be refreshed. Reload the page.".to_string(),
            )
        }
    }
}

async fn refreshed_row(
    state: &AppState,
    admin: &Identity,
    order_id: OrderId,
) -> Result<AdminOrderRow, BackendError> {
    let order = state.backend().get_order(admin, order_id).await?;
    let products = state.backend().get_products().await?;
    let stickers = state.backend().get_all_stickers(admin).await?;
    Ok(build_order_row(state, admin, &order, &products, &stickers).await)
}
