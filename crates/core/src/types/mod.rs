//! Core types for yourdailysprtshop.
//!
//! This module provides type-safe wrappers for common domain concepts and
//! the wire entities exchanged with the backend.

pub mod cart;
pub mod catalog;
pub mod category;
pub mod id;
pub mod money;
pub mod order;
pub mod user;

pub use cart::CartItem;
pub use catalog::{CustomSticker, Product};
pub use category::{Category, PRODUCT_LABELS, STICKER_LABELS};
pub use id::*;
pub use money::{Paise, ParseAmountError};
pub use order::{Order, OrderStatus, PaymentMethod};
pub use user::{Role, UserProfile};
