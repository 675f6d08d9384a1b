//! Catalog entities: regular products and custom stickers.
//!
//! Both are owned by the backend; the storefront only caches them. They are
//! distinct collections in one id space, and a cart line may resolve to
//! either (see [`crate::pricing`]).

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::id::{ItemId, PrincipalId};
use super::money::Paise;

/// A regular catalog product.
///
/// Created, updated, and deleted via admin actions; readable by everyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Backend-assigned identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Long-form description.
    pub description: String,
    /// Category (same tagged shape as stickers).
    pub category: Category,
    /// Units available; quantities in carts are bounded by this.
    pub stock: u32,
    /// Unit price in paise.
    pub price: Paise,
}

/// A user-created custom sticker.
///
/// Created by an authenticated user, readable by its creator and admins,
/// not deletable in this version. Sticker quantities are never bounded by
/// stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSticker {
    /// Backend-assigned identifier (disjoint from product ids).
    pub id: ItemId,
    /// The identity that created the sticker.
    pub creator: PrincipalId,
    /// Display name.
    pub name: String,
    /// Optional long-form description.
    pub description: Option<String>,
    /// Category (same tagged shape as products).
    pub category: Category,
    /// URL of the backend-hosted sticker image.
    pub image_url: String,
    /// Unit price in paise.
    pub price: Paise,
}
