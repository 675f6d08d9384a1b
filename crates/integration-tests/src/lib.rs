//! Integration tests for yourdailysprtshop.
//!
//! These tests exercise cross-crate behavior - cart totals flowing into
//! currency formatting, cache invalidation edges, form validation gates,
//! and the fail-closed defaults of the backend client - without a live
//! backend.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sprtshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_totals` - Pricing resolution across products and stickers
//! - `cache_invalidation` - Mutation-to-cache-key edges
//! - `fail_closed` - Safe defaults when the backend is unreachable
//! - `form_gates` - Client-side validation blocking backend calls

use secrecy::SecretString;

use sprtshop_core::{Category, CustomSticker, ItemId, Paise, PrincipalId, Product};
use sprtshop_storefront::backend::BackendClient;
use sprtshop_storefront::config::BackendConfig;
use sprtshop_storefront::models::Identity;

/// A backend client pointed at a port nothing listens on. Every call fails
/// with a connect error.
///
/// # Panics
///
/// Panics if the HTTP client cannot be constructed.
#[must_use]
pub fn unreachable_backend() -> BackendClient {
    let config = BackendConfig {
        api_url: "http://127.0.0.1:1".to_string(),
        api_key: SecretString::from("k".repeat(32)),
    };
    BackendClient::new(&config).expect("client should build")
}

/// A signed-in test caller.
#[must_use]
pub fn test_identity(principal: &str) -> Identity {
    Identity {
        principal: PrincipalId::new(principal),
        token: "test-token".to_string(),
    }
}

/// A catalog product fixture.
#[must_use]
pub fn product(id: i64, price: i64, stock: u32) -> Product {
    Product {
        id: ItemId::new(id),
        name: format!("Product {id}"),
        description: "Test product".to_string(),
        category: Category::named("table-tennis-balls"),
        stock,
        price: Paise::new(price),
    }
}

/// A custom sticker fixture.
#[must_use]
pub fn sticker(id: i64, price: i64) -> CustomSticker {
    CustomSticker {
        id: ItemId::new(id),
        creator: PrincipalId::new("2vxsx-fae"),
        name: format!("Sticker {id}"),
        description: None,
        category: Category::named("sports"),
        image_url: format!("https://cdn.example/stickers/{id}.png"),
        price: Paise::new(price),
    }
}
