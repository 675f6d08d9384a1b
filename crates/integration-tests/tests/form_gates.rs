//! Client-side validation gates.
//!
//! Each of these rejections happens before any backend call is issued; the
//! shopper gets a specific message and the cart and catalog stay untouched.

use sprtshop_core::{ItemId, pricing::resolve_priced_item};
use sprtshop_integration_tests::{product, sticker};
use sprtshop_storefront::validate::{self, ValidationError};

// =============================================================================
// Checkout Gates
// =============================================================================

#[test]
fn checkout_requires_a_delivery_address() {
    assert_eq!(
        validate::require("Delivery address", ""),
        Err(ValidationError::Required("Delivery address"))
    );
    assert_eq!(
        validate::require("Delivery address", "   "),
        Err(ValidationError::Required("Delivery address"))
    );
    assert_eq!(
        validate::require("Delivery address", "12 MG Road, Indore"),
        Ok("12 MG Road, Indore".to_string())
    );
}

#[test]
fn checkout_requires_a_customer_name() {
    assert_eq!(
        validate::require("Name", ""),
        Err(ValidationError::Required("Name"))
    );
}

#[test]
fn checkout_accepts_only_cash_on_delivery() {
    assert!(validate::parse_payment_method("cash").is_ok());
    assert_eq!(
        validate::parse_payment_method("google_pay"),
        Err(ValidationError::PaymentUnavailable("Google Pay"))
    );
    assert_eq!(
        validate::parse_payment_method("card"),
        Err(ValidationError::InvalidPayment)
    );
}

// =============================================================================
// Stock Gates
// =============================================================================

#[test]
fn product_quantity_is_bounded_by_stock() {
    let products = [product(1, 500, 5)];
    let resolved = resolve_priced_item(ItemId::new(1), &products, &[])
        .expect("product should resolve");

    assert_eq!(validate::check_stock_bound(5, resolved.stock), Ok(()));
    assert_eq!(
        validate::check_stock_bound(6, resolved.stock),
        Err(ValidationError::InsufficientStock { available: 5 })
    );
}

#[test]
fn sticker_quantity_is_never_stock_checked() {
    let stickers = [sticker(7, 150)];
    let resolved = resolve_priced_item(ItemId::new(7), &[], &stickers)
        .expect("sticker should resolve");

    assert_eq!(resolved.stock, None);
    assert_eq!(validate::check_stock_bound(1000, resolved.stock), Ok(()));
}

// =============================================================================
// Price Gates
// =============================================================================

#[test]
fn operator_prices_must_be_positive_rupee_amounts() {
    assert!(validate::parse_price("249.50").is_ok());
    assert_eq!(
        validate::parse_price("0"),
        Err(ValidationError::NonPositivePrice)
    );
    assert_eq!(
        validate::parse_price("-10"),
        Err(ValidationError::NonPositivePrice)
    );
    assert!(validate::parse_price("ten rupees").is_err());
    assert!(validate::parse_price("1.005").is_err());
}
