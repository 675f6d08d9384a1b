//! HTTP route handlers for the storefront and admin console.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                           - Product catalog (home)
//! GET  /health                     - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart                       - Cart page
//! POST /cart/add                   - Add item (returns count badge, fires cart-updated)
//! POST /cart/update                - Change line quantity (returns cart items fragment)
//! POST /cart/remove                - Remove line (returns cart items fragment)
//! POST /cart/clear                 - Empty the cart (returns cart items fragment)
//! GET  /cart/count                 - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout                   - Checkout form
//! POST /checkout                   - Place order (HX-Redirect to confirmation)
//!
//! # Orders (requires identity)
//! GET  /orders                     - Caller's order history
//! GET  /orders/{id}                - Order detail / confirmation
//!
//! # Custom stickers
//! GET  /stickers                   - Sticker gallery and creation form
//! POST /stickers                   - Create sticker (multipart upload)
//! GET  /stickers/coming-soon       - Sticker ordering placeholder
//!
//! # Profile (requires identity)
//! GET  /profile                    - Profile page
//! POST /profile                    - Save display name
//!
//! # Auth
//! GET  /auth/login                 - Login page (links out to the identity provider)
//! GET  /auth/callback              - Identity provider callback
//! POST /auth/logout                - Logout
//!
//! # Admin (requires admin role)
//! GET  /admin                      - Admin panel (products, stickers, roles)
//! GET  /admin/products/new         - New product form
//! POST /admin/products             - Create product
//! GET  /admin/products/{id}/edit   - Edit product form
//! POST /admin/products/{id}        - Update product
//! POST /admin/products/{id}/delete - Delete product
//! GET  /admin/orders               - All orders
//! POST /admin/orders/{id}/status   - Update order status (HTMX row swap)
//! POST /admin/roles                - Assign a role
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod profile;
pub mod stickers;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, post},
};

use sprtshop_core::{Category, cart::item_count};

use crate::backend::BackendError;
use crate::models::Identity;
use crate::state::AppState;

/// Inline form error fragment.
///
/// Handlers that answer htmx forms return this with `HX-Retarget` pointing
/// at the page's alert region, so validation failures land in the right
/// element regardless of what the form normally swaps.
#[derive(Template, WebTemplate)]
#[template(path = "partials/form_error.html")]
pub struct FormErrorTemplate {
    pub message: String,
}

/// Render a validation or rejection message into the page's `#form-alert`
/// region.
pub(crate) fn form_error(message: String) -> Response {
    (
        AppendHeaders([("HX-Retarget", "#form-alert"), ("HX-Reswap", "innerHTML")]),
        FormErrorTemplate { message },
    )
        .into_response()
}

/// Surface the backend's own rejection text; anything else gets a generic
/// fallback.
pub(crate) fn rejection_message(error: &BackendError, fallback: &str) -> String {
    match error {
        BackendError::Rejected(reason) => reason.clone(),
        _ => fallback.to_string(),
    }
}

/// One option of a category select.
#[derive(Clone)]
pub struct CategoryOption {
    pub value: String,
    pub label: String,
}

/// Build select options from a known label set.
pub(crate) fn category_options(labels: &[&str]) -> Vec<CategoryOption> {
    labels
        .iter()
        .map(|label| CategoryOption {
            value: (*label).to_string(),
            label: Category::named(*label).display_label(),
        })
        .collect()
}

/// Data the shared page chrome (header, nav, footer) needs.
///
/// Built once per page render; both lookups behind it fail closed, so a
/// backend outage degrades the chrome instead of erroring the page.
#[derive(Clone)]
pub struct Nav {
    /// Total units in the caller's cart.
    pub cart_count: u32,
    /// Whether to show the admin console link.
    pub is_admin: bool,
    /// Present when the caller is signed in.
    pub identity: Option<IdentityView>,
    /// Per-request CSP nonce for the layout's inline script.
    pub nonce: String,
    /// Stylesheet href, content-hashed when the build produced one.
    pub css_href: String,
}

/// Signed-in caller display data for the header menu.
#[derive(Clone)]
pub struct IdentityView {
    /// Abbreviated principal, short enough for the header.
    pub principal_short: String,
}

/// Stylesheet href, preferring the content-hashed file emitted by the build
/// script. The hash is empty on the very first build of a fresh checkout.
#[must_use]
pub fn css_href() -> String {
    let hash = env!("CSS_HASH");
    if hash.is_empty() {
        "/static/css/main.css".to_string()
    } else {
        format!("/static/css/derived/main.{hash}.css")
    }
}

/// Build the nav chrome for the current caller.
pub async fn nav(state: &AppState, identity: Option<&Identity>, nonce: String) -> Nav {
    let items = state.backend().get_cart_or_default(identity).await;
    let is_admin = state.backend().is_caller_admin(identity).await;

    Nav {
        cart_count: item_count(&items),
        is_admin,
        identity: identity.map(|id| IdentityView {
            principal_short: id.principal.abbreviated(),
        }),
        nonce,
        css_href: css_href(),
    }
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create the sticker routes router.
pub fn sticker_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(stickers::index).post(stickers::create))
        .route("/coming-soon", get(stickers::coming_soon))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page))
        .route("/callback", get(auth::callback))
        .route("/logout", post(auth::logout))
}

/// Create the admin routes router. Every handler in here extracts
/// `RequireAdmin`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::panel))
        .route("/products", post(admin::products::create))
        .route("/products/new", get(admin::products::new_form))
        .route("/products/{id}/edit", get(admin::products::edit_form))
        .route("/products/{id}", post(admin::products::update))
        .route("/products/{id}/delete", post(admin::products::delete))
        .route("/orders", get(admin::orders::index))
        .route("/orders/{id}/status", post(admin::orders::update_status))
        .route("/roles", post(admin::roles::assign))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Product catalog is the home page
        .route("/", get(catalog::home))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", get(checkout::form).post(checkout::place_order))
        // Order history and detail
        .nest("/orders", order_routes())
        // Custom stickers
        .nest("/stickers", sticker_routes())
        // Profile
        .route("/profile", get(profile::show).post(profile::save))
        // Auth routes
        .nest("/auth", auth_routes())
        // Admin console
        .nest("/admin", admin_routes())
}
