//! Checkout route handlers.
//!
//! Checkout is cash-on-delivery only for now; the Google Pay option renders
//! disabled in the form and is rejected server-side if submitted anyway.
//! A successful order ends in an `HX-Redirect` to the confirmation page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::backend::CheckoutRequest;
use crate::filters;
use crate::middleware::{CspNonce, RequireIdentity};
use crate::routes::cart::{CartView, build_cart_view};
use crate::routes::{Nav, form_error, rejection_message};
use crate::state::AppState;
use crate::validate;

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub delivery_address: String,
    pub payment_method: String,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/checkout.html")]
pub struct CheckoutTemplate {
    pub nav: Nav,
    pub cart: CartView,
    /// Prefilled from the caller's saved profile.
    pub customer_name: String,
    pub error: Option<String>,
}

/// Display the checkout form.
///
/// An empty cart has nothing to check out; the caller goes back to the
/// cart page instead.
#[instrument(skip(state, caller, nonce))]
pub async fn form(
    State(state): State<AppState>,
    RequireIdentity(caller): RequireIdentity,
    CspNonce(nonce): CspNonce,
) -> Response {
    let (cart, error) = match build_cart_view(&state, &caller).await {
        Ok(view) => (view, None),
        Err(e) => {
            tracing::error!("Failed to load cart for checkout: {e}");
            (
                CartView::empty(),
                Some("Your cart could not be loaded. Please try again.".to_string()),
            )
        }
    };

    if cart.lines.is_empty() && error.is_none() {
        return Redirect::to("/cart").into_response();
    }

    // Prefill from the saved profile; a missing profile just means an
    // empty field
    let customer_name = match state.backend().get_profile(&caller).await {
        Ok(profile) => profile.name,
        Err(e) => {
            tracing::debug!("No profile name to prefill: {e}");
            String::new()
        }
    };

    let nav = super::nav(&state, Some(&caller), nonce).await;

    CheckoutTemplate {
        nav,
        cart,
        customer_name,
        error,
    }
    .into_response()
}

/// Place the order (HTMX).
///
/// Success answers with an `HX-Redirect` to the order confirmation page;
/// validation and backend rejections render into the form's alert region.
#[instrument(skip(state, caller, checkout))]
pub async fn place_order(
    State(state): State<AppState>,
    RequireIdentity(caller): RequireIdentity,
    Form(checkout): Form<CheckoutForm>,
) -> Response {
    let customer_name = match validate::require("Name", &checkout.customer_name) {
        Ok(name) => name,
        Err(e) => return form_error(e.to_string()),
    };
    let delivery_address = match validate::require("Delivery address", &checkout.delivery_address) {
        Ok(address) => address,
        Err(e) => return form_error(e.to_string()),
    };
    let payment_method = match validate::parse_payment_method(&checkout.payment_method) {
        Ok(method) => method,
        Err(e) => return form_error(e.to_string()),
    };

    // The backend rejects empty-cart checkouts too; checking here gives a
    // clearer message than a generic rejection
    let items = state.backend().get_cart_or_default(Some(&caller)).await;
    if items.is_empty() {
        return form_error("Your cart is empty.".to_string());
    }

    let request = CheckoutRequest {
        payment_method,
        delivery_address,
        customer_name,
    };

    match state.backend().checkout(&caller, &request).await {
        Ok(placed) => {
            let destination = format!("/orders/{}?placed=1", placed.order_id);
            (AppendHeaders([("HX-Redirect", destination)]), ()).into_response()
        }
        Err(e) => {
            tracing::warn!("Checkout failed: {e}");
            form_error(rejection_message(
                &e,
                "Could not place your order. Please try again.",
            ))
        }
    }
}
