//! Priced-item resolution and cart totals.
//!
//! A cart line's unit price is never stored on the line itself. It is
//! resolved at computation time against two disjoint collections: the
//! product catalog first, then the caller's custom stickers. A line whose id
//! appears in neither collection contributes zero to the total (the item
//! was removed after the cart was built; the backend remains the source of
//! truth).

use crate::types::{CartItem, CustomSticker, ItemId, Paise, Product};

/// The common shape a cart line resolves to, regardless of which collection
/// it came from.
///
/// `stock` is present only for regular products; sticker quantities are
/// never stock-bounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedItem {
    /// Display name.
    pub name: String,
    /// Unit price in paise.
    pub price: Paise,
    /// Image URL where the source entity has one.
    pub image_url: Option<String>,
    /// Available stock, for products only.
    pub stock: Option<u32>,
}

/// Resolve an item id against the product catalog, then the sticker
/// collection.
#[must_use]
pub fn resolve_priced_item(
    id: ItemId,
    products: &[Product],
    stickers: &[CustomSticker],
) -> Option<PricedItem> {
    if let Some(product) = products.iter().find(|product| product.id == id) {
        return Some(PricedItem {
            name: product.name.clone(),
            price: product.price,
            image_url: None,
            stock: Some(product.stock),
        });
    }
    stickers
        .iter()
        .find(|sticker| sticker.id == id)
        .map(|sticker| PricedItem {
            name: sticker.name.clone(),
            price: sticker.price,
            image_url: Some(sticker.image_url.clone()),
            stock: None,
        })
}

/// Compute the grand total of a cart in paise.
///
/// Exact integer arithmetic, recomputed from scratch on every call, and
/// commutative over the order of cart lines. Lines that resolve to neither
/// collection are silently skipped.
#[must_use]
pub fn cart_total(cart: &[CartItem], products: &[Product], stickers: &[CustomSticker]) -> Paise {
    cart.iter()
        .map(|item| {
            resolve_priced_item(item.product_id, products, stickers)
                .map_or(Paise::ZERO, |priced| priced.price * item.quantity)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, PrincipalId};

    fn product(id: i64, price: i64, stock: u32) -> Product {
        Product {
            id: ItemId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            category: Category::named("table-tennis-balls"),
            stock,
            price: Paise::new(price),
        }
    }

    fn sticker(id: i64, price: i64) -> CustomSticker {
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

    #[test]
    fn total_sums_product_lines() {
        let cart = [CartItem::new(ItemId::new(1), 2)];
        let products = [product(1, 500, 10)];
        assert_eq!(cart_total(&cart, &products, &[]), Paise::new(1000));
    }

    #[test]
    fn total_falls_back_to_stickers_when_no_product_matches() {
        let cart = [CartItem::new(ItemId::new(7), 3)];
        let stickers = [sticker(7, 150)];
        assert_eq!(cart_total(&cart, &[], &stickers), Paise::new(450));
    }

    #[test]
    fn unknown_ids_contribute_exactly_zero() {
        let cart = [
            CartItem::new(ItemId::new(1), 2),
            CartItem::new(ItemId::new(999), 5),
        ];
        let products = [product(1, 500, 10)];
        assert_eq!(cart_total(&cart, &products, &[]), Paise::new(1000));
        assert_eq!(cart_total(&cart, &[], &[]), Paise::ZERO);
    }

    #[test]
    fn total_is_order_independent_and_non_negative() {
        let mut cart = vec![
            CartItem::new(ItemId::new(1), 2),
            CartItem::new(ItemId::new(7), 3),
            CartItem::new(ItemId::new(999), 1),
        ];
        let products = [product(1, 500, 10)];
        let stickers = [sticker(7, 150)];

        let forward = cart_total(&cart, &products, &stickers);
        cart.reverse();
        let reversed = cart_total(&cart, &products, &stickers);

        assert_eq!(forward, reversed);
        assert_eq!(forward, Paise::new(1450));
        assert!(forward >= Paise::ZERO);
        assert!(cart_total(&[], &products, &stickers) >= Paise::ZERO);
    }

    #[test]
    fn products_shadow_stickers_in_resolution() {
        // Id spaces are disjoint by backend contract; if they ever collide,
        // the product wins deterministically.
        let products = [product(5, 300, 1)];
        let stickers = [sticker(5, 999)];
        let resolved = resolve_priced_item(ItemId::new(5), &products, &stickers)
            .expect("item should resolve");
        assert_eq!(resolved.price, Paise::new(300));
        assert_eq!(resolved.stock, Some(1));
    }

    #[test]
    fn resolution_carries_the_common_shape() {
        let stickers = [sticker(7, 150)];
        let resolved =
            resolve_priced_item(ItemId::new(7), &[], &stickers).expect("sticker should resolve");
        assert_eq!(resolved.name, "Sticker 7");
        assert_eq!(resolved.stock, None);
        assert!(resolved.image_url.is_some());

        assert_eq!(resolve_priced_item(ItemId::new(404), &[], &stickers), None);
    }
}
