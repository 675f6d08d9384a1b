//! Cache types for backend API responses.
//!
//! Reads are cached under a [`CacheKey`] per logical resource. Writes go
//! through [`Mutation`], whose `invalidated_keys` table names every cached
//! read the write could have changed. The TTL on the cache itself is only a
//! staleness backstop; correctness comes from these edges.

use core::fmt;

use sprtshop_core::{
    CartItem, CustomSticker, ItemId, Order, OrderId, PrincipalId, Product, Role, UserProfile,
};

/// Cache key for one logical backend resource.
///
/// Single-order and single-sticker reads are deliberately absent: those
/// responses depend on the backend's per-caller authorization check, so they
/// are never stored in the shared cache. `Order(id)` exists only as an
/// invalidation target for status changes.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    /// The full product catalog.
    Products,
    /// A single product.
    Product(ItemId),
    /// The caller's cart.
    Cart(PrincipalId),
    /// All orders (admin view).
    Orders,
    /// One user's order history.
    UserOrders(PrincipalId),
    /// A single order.
    Order(OrderId),
    /// The caller's custom stickers.
    CallerStickers(PrincipalId),
    /// All custom stickers (admin view).
    AllStickers,
    /// A user's profile.
    Profile(PrincipalId),
    /// Whether a user is an admin.
    AdminStatus(PrincipalId),
    /// A user's role.
    Role(PrincipalId),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Products => write!(f, "products"),
            Self::Product(id) => write!(f, "product:{id}"),
            Self::Cart(principal) => write!(f, "cart:{principal}"),
            Self::Orders => write!(f, "orders"),
            Self::UserOrders(principal) => write!(f, "orders:user:{principal}"),
            Self::Order(id) => write!(f, "order:{id}"),
            Self::CallerStickers(principal) => write!(f, "stickers:user:{principal}"),
            Self::AllStickers => write!(f, "stickers"),
            Self::Profile(principal) => write!(f, "profile:{principal}"),
            Self::AdminStatus(principal) => write!(f, "admin:{principal}"),
            Self::Role(principal) => write!(f, "role:{principal}"),
        }
    }
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Product(Box<Product>),
    Cart(Vec<CartItem>),
    Orders(Vec<Order>),
    Stickers(Vec<CustomSticker>),
    Profile(UserProfile),
    AdminStatus(bool),
    Role(Role),
}

/// A state-changing backend call, carrying the identifiers needed to name
/// the cached reads it invalidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// A cart line was added, updated, removed, or the cart was cleared.
    CartChanged { caller: PrincipalId },
    /// The caller checked out; the cart empties, orders appear, and stock
    /// levels move.
    Checkout { caller: PrincipalId },
    /// A product was created, updated, or removed.
    ProductChanged { id: ItemId },
    /// The caller created a custom sticker.
    StickerCreated { creator: PrincipalId },
    /// An admin changed an order's status.
    OrderStatusChanged { id: OrderId, owner: PrincipalId },
    /// An admin assigned a role to a user.
    RoleAssigned { target: PrincipalId },
    /// The caller saved their profile.
    ProfileSaved { caller: PrincipalId },
}

impl Mutation {
    /// Every cache key this mutation could have changed.
    #[must_use]
    pub fn invalidated_keys(&self) -> Vec<CacheKey> {
        match self {
            Self::CartChanged { caller } => vec![CacheKey::Cart(caller.clone())],
            Self::Checkout { caller } => vec![
                CacheKey::Cart(caller.clone()),
                CacheKey::Orders,
                CacheKey::UserOrders(caller.clone()),
                CacheKey::Products,
            ],
            Self::ProductChanged { id } => vec![CacheKey::Products, CacheKey::Product(*id)],
            Self::StickerCreated { creator } => vec![
                CacheKey::CallerStickers(creator.clone()),
                CacheKey::AllStickers,
            ],
            Self::OrderStatusChanged { id, owner } => vec![
                CacheKey::Orders,
                CacheKey::UserOrders(owner.clone()),
                CacheKey::Order(*id),
            ],
            Self::RoleAssigned { target } => vec![
                CacheKey::AdminStatus(target.clone()),
                CacheKey::Role(target.clone()),
            ],
            Self::ProfileSaved { caller } => vec![CacheKey::Profile(caller.clone())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(text: &str) -> PrincipalId {
        PrincipalId::new(text)
    }

    #[test]
    fn cache_keys_render_distinct_strings() {
        let alice = principal("alice");
        let keys = [
            CacheKey::Products,
            CacheKey::Product(ItemId::new(7)),
            CacheKey::Cart(alice.clone()),
            CacheKey::Orders,
            CacheKey::UserOrders(alice.clone()),
            CacheKey::Order(OrderId::new(7)),
            CacheKey::CallerStickers(alice.clone()),
            CacheKey::AllStickers,
            CacheKey::Profile(alice.clone()),
            CacheKey::AdminStatus(alice.clone()),
            CacheKey::Role(alice),
        ];

        let rendered: Vec<String> = keys.iter().map(ToString::to_string).collect();
        for (i, a) in rendered.iter().enumerate() {
            for b in rendered.iter().skip(i + 1) {
                assert_ne!(a, b, "two cache keys render to the same string");
            }
        }
    }

    #[test]
    fn cart_keys_are_scoped_per_principal() {
        assert_ne!(
            CacheKey::Cart(principal("alice")).to_string(),
            CacheKey::Cart(principal("bob")).to_string()
        );
    }

    #[test]
    fn cart_changes_invalidate_only_the_callers_cart() {
        let keys = Mutation::CartChanged {
            caller: principal("alice"),
        }
        .invalidated_keys();

        assert_eq!(keys, vec![CacheKey::Cart(principal("alice"))]);
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
        // Stock levels change on checkout, so the catalog must re-fetch.
        assert!(keys.contains(&CacheKey::Products));
    }

    #[test]
    fn product_changes_invalidate_list_and_detail() {
        let keys = Mutation::ProductChanged { id: ItemId::new(3) }.invalidated_keys();
        assert!(keys.contains(&CacheKey::Products));
        assert!(keys.contains(&CacheKey::Product(ItemId::new(3))));
    }

    #[test]
    fn sticker_creation_invalidates_creator_and_admin_views() {
        let keys = Mutation::StickerCreated {
            creator: principal("alice"),
        }
        .invalidated_keys();
        assert!(keys.contains(&CacheKey::CallerStickers(principal("alice"))));
        assert!(keys.contains(&CacheKey::AllStickers));
    }

    #[test]
    fn order_status_change_invalidates_both_order_views() {
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
    fn role_assignment_invalidates_the_targets_status() {
        let keys = Mutation::RoleAssigned {
            target: principal("carol"),
        }
        .invalidated_keys();

        assert!(keys.contains(&CacheKey::AdminStatus(principal("carol"))));
        assert!(keys.contains(&CacheKey::Role(principal("carol"))));
        // Nobody else's status is touched.
        assert!(!keys.contains(&CacheKey::AdminStatus(principal("alice"))));
    }

    #[test]
    fn profile_saves_invalidate_only_the_profile() {
        let keys = Mutation::ProfileSaved {
            caller: principal("alice"),
        }
        .invalidated_keys();
        assert_eq!(keys, vec![CacheKey::Profile(principal("alice"))]);
    }
}
