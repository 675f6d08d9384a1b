//! Cart line items.

use serde::{Deserialize, Serialize};

use super::id::ItemId;

/// One line of a caller-scoped cart.
///
/// The unit price is never stored on the line; it is looked up at render
/// time from whichever collection (products or the caller's stickers)
/// contains `product_id`. The backend keeps at most one line per item id
/// (add-to-cart merges quantities).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// The purchasable item this line refers to (product or sticker id).
    pub product_id: ItemId,
    /// Positive quantity; bounded by stock for regular products only.
    pub quantity: u32,
}

impl CartItem {
    /// Create a cart line.
    #[must_use]
    pub const fn new(product_id: ItemId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Sum of quantities across all lines, as shown on the cart badge.
#[must_use]
pub fn item_count(items: &[CartItem]) -> u32 {
    items.iter().map(|item| item.quantity).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_count_sums_quantities() {
        let items = [
            CartItem::new(ItemId::new(1), 2),
            CartItem::new(ItemId::new(9), 3),
        ];
        assert_eq!(item_count(&items), 5);
        assert_eq!(item_count(&[]), 0);
    }
}
