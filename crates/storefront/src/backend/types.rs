//! Request and response payloads for the backend REST API.
//!
//! Domain entities themselves live in `sprtshop_core`; these are only the
//! envelopes specific to individual endpoints.

use serde::{Deserialize, Serialize};

use sprtshop_core::{Category, ItemId, OrderId, OrderStatus, Paise, PaymentMethod, PrincipalId, Role};

/// Payload for adding a cart line.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineRequest {
    pub product_id: ItemId,
    pub quantity: u32,
}

/// Payload for updating a cart line's quantity.
#[derive(Debug, Clone, Serialize)]
pub struct QuantityUpdate {
    pub quantity: u32,
}

/// Checkout submission.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
    pub customer_name: String,
}

/// Checkout acknowledgement.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutResponse {
    pub order_id: OrderId,
}

/// Fields for creating or updating a product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub stock: u32,
    pub price: Paise,
}

/// Acknowledgement carrying the id the backend assigned.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedProduct {
    pub id: ItemId,
}

/// Fields for creating a custom sticker. The image travels base64-encoded;
/// the backend stores it and returns the hosted URL on the created entity.
#[derive(Debug, Clone, Serialize)]
pub struct StickerDraft {
    pub name: String,
    pub description: Option<String>,
    pub category: Category,
    pub price: Paise,
    pub image: String,
    pub image_content_type: String,
}

/// Order status change payload.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// Profile save payload.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
}

/// Role grant submission.
#[derive(Debug, Clone, Serialize)]
pub struct RoleAssignment {
    pub user: PrincipalId,
    pub role: Role,
}

/// Role lookup response.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleResponse {
    pub role: Role,
}

/// Admin status lookup response.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminStatusResponse {
    pub is_admin: bool,
}
