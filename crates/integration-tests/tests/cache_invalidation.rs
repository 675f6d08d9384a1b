//! The mutation-to-cache-key invalidation table.
//!
//! Each write names every cached read it could have changed; these tests
//! pin the edges the UI depends on - a cart write must force the next cart
//! read to re-fetch, a role grant must force the target's next admin-status
//! check to re-fetch.

use sprtshop_core::{ItemId, OrderId, PrincipalId};
use sprtshop_storefront::backend::{CacheKey, Mutation};

fn principal(text: &str) -> PrincipalId {
    PrincipalId::new(text)
}

#[test]
fn cart_write_invalidates_the_callers_cart_read() {
    // Add, update, remove, and clear all funnel through CartChanged, so a
    // successful add is followed by a fresh cart fetch on the next render.
    let keys = Mutation::CartChanged {
        caller: principal("alice"),
    }
    .invalidated_keys();

    assert_eq!(keys, vec![CacheKey::Cart(principal("alice"))]);
}

#[test]
fn cart_writes_leave_other_callers_cached_carts_alone() {
    let keys = Mutation::CartChanged {
        caller: principal("alice"),
    }
    .invalidated_keys();

    assert!(!keys.contains(&CacheKey::Cart(principal("bob"))));
}

#[test]
fn checkout_invalidates_cart_orders_and_catalog() {
    let keys = Mutation::Checkout {
        caller: principal("alice"),
    }
    .invalidated_keys();

    assert!(keys.contains(&CacheKey::Cart(principal("alice"))));
    assert!(keys.contains(&CacheKey::Orders));
    assert!(keys.contains(&CacheKey::UserOrders(principal("alice"))));
    // Stock moved, so the cached catalog is stale too.
    assert!(keys.contains(&CacheKey::Products));
}

#[test]
fn role_grant_invalidates_the_targets_admin_status() {
    // After an admin grants admin to X, X's next status query must hit the
    // backend again instead of answering from a stale "false".
    let keys = Mutation::RoleAssigned {
        target: principal("x-principal"),
    }
    .invalidated_keys();

    assert!(keys.contains(&CacheKey::AdminStatus(principal("x-principal"))));
    assert!(keys.contains(&CacheKey::Role(principal("x-principal"))));
}

#[test]
fn role_grant_does_not_touch_the_granting_admins_status() {
    let keys = Mutation::RoleAssigned {
        target: principal("x-principal"),
    }
    .invalidated_keys();

    assert!(!keys.contains(&CacheKey::AdminStatus(principal("granting-admin"))));
}

#[test]
fn product_writes_invalidate_list_and_detail() {
    let keys = Mutation::ProductChanged { id: ItemId::new(3) }.invalidated_keys();

    assert!(keys.contains(&CacheKey::Products));
    assert!(keys.contains(&CacheKey::Product(ItemId::new(3))));
    assert!(!keys.contains(&CacheKey::Product(ItemId::new(4))));
}

#[test]
fn sticker_creation_invalidates_creator_and_admin_galleries() {
    let keys = Mutation::StickerCreated {
        creator: principal("alice"),
    }
    .invalidated_keys();

    assert!(keys.contains(&CacheKey::CallerStickers(principal("alice"))));
    assert!(keys.contains(&CacheKey::AllStickers));
}

#[test]
fn order_status_change_invalidates_every_order_view() {
    let keys = Mutation::OrderStatusChanged {
        id: OrderId::new(9),
        owner: principal("bob"),
    }
    .invalidated_keys();

    assert!(keys.contains(&CacheKey::Orders));
    assert!(keys.contains(&CacheKey::UserOrders(principal("bob"))));
    assert!(keys.contains(&CacheKey::Order(OrderId::new(9))));
}

#[test]
fn no_two_resources_share_a_cache_key_string() {
    let alice = principal("alice");
    let keys = [
        CacheKey::Products,
        CacheKey::Product(ItemId::new(1)),
        CacheKey::Cart(alice.clone()),
        CacheKey::Orders,
        CacheKey::UserOrders(alice.clone()),
        CacheKey::Order(OrderId::new(1)),
        CacheKey::CallerStickers(alice.clone()),
        CacheKey::AllStickers,
        CacheKey::Profile(alice.clone()),
        CacheKey::AdminStatus(alice.clone()),
        CacheKey::Role(alice),
    ];

    let rendered: Vec<String> = keys.iter().map(ToString::to_string).collect();
    for (i, a) in rendered.iter().enumerate() {
        for b in rendered.iter().skip(i + 1) {
            assert_ne!(a, b, "two cache keys collide: {a}");
        }
    }
}
