//! End-to-end pricing: cart lines resolved against the two catalog
//! collections, summed in paise, and rendered as rupee strings.

use sprtshop_core::{CartItem, ItemId, Paise, pricing::cart_total};
use sprtshop_integration_tests::{product, sticker};

// =============================================================================
// Reference Scenarios
// =============================================================================

#[test]
fn product_line_totals_and_formats() {
    let cart = [CartItem::new(ItemId::new(1), 2)];
    let products = [product(1, 500, 10)];

    let total = cart_total(&cart, &products, &[]);
    assert_eq!(total, Paise::new(1000));
    assert_eq!(total.format_inr(), "₹10");
}

#[test]
fn sticker_line_totals_and_formats() {
    let cart = [CartItem::new(ItemId::new(7), 3)];
    let stickers = [sticker(7, 150)];

    let total = cart_total(&cart, &[], &stickers);
    assert_eq!(total, Paise::new(450));
    assert_eq!(total.format_inr(), "₹4.50");
}

#[test]
fn mixed_cart_sums_both_collections() {
    let cart = [
        CartItem::new(ItemId::new(1), 2),
        CartItem::new(ItemId::new(7), 3),
    ];
    let products = [product(1, 500, 10)];
    let stickers = [sticker(7, 150)];

    let total = cart_total(&cart, &products, &stickers);
    assert_eq!(total, Paise::new(1450));
    assert_eq!(total.format_inr(), "₹14.50");
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn total_is_order_independent() {
    let products = [product(1, 500, 10), product(2, 33, 10)];
    let stickers = [sticker(7, 150)];
    let mut cart = vec![
        CartItem::new(ItemId::new(2), 1),
        CartItem::new(ItemId::new(7), 3),
        CartItem::new(ItemId::new(1), 2),
        CartItem::new(ItemId::new(999), 4),
    ];

    let forward = cart_total(&cart, &products, &stickers);
    cart.reverse();
    let reversed = cart_total(&cart, &products, &stickers);

    assert_eq!(forward, reversed);
    assert!(forward >= Paise::ZERO);
}

#[test]
fn unknown_ids_contribute_exactly_zero() {
    let products = [product(1, 500, 10)];
    let known = [CartItem::new(ItemId::new(1), 2)];
    let with_orphan = [
        CartItem::new(ItemId::new(1), 2),
        CartItem::new(ItemId::new(999), 5),
    ];

    assert_eq!(
        cart_total(&known, &products, &[]),
        cart_total(&with_orphan, &products, &[]),
    );
}

#[test]
fn empty_cart_totals_zero() {
    let products = [product(1, 500, 10)];
    let total = cart_total(&[], &products, &[]);
    assert_eq!(total, Paise::ZERO);
    assert_eq!(total.format_inr(), "₹0");
}

// =============================================================================
// Currency Formatting
// =============================================================================

#[test]
fn decimal_point_appears_iff_not_a_whole_rupee_amount() {
    for amount in [0_i64, 1, 50, 99, 100, 101, 450, 1000, 2005, 1_000_000] {
        let formatted = Paise::new(amount).format_inr();
        assert_eq!(
            formatted.contains('.'),
            amount % 100 != 0,
            "unexpected formatting for {amount} paise: {formatted}"
        );
    }
}

#[test]
fn fractional_amounts_always_show_two_places() {
    assert_eq!(Paise::new(2005).format_inr(), "₹20.05");
    assert_eq!(Paise::new(1).format_inr(), "₹0.01");
    assert_eq!(Paise::new(99).format_inr(), "₹0.99");
}
