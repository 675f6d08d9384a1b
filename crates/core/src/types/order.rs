//! Orders and their status/payment enums.

use serde::{Deserialize, Serialize};

use super::cart::CartItem;
use super::id::{OrderId, PrincipalId};
use super::money::Paise;

/// Lifecycle status of an order. Mutated only by admins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in the order shown in admin selects.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Completed, Self::Cancelled];

    /// Wire/form value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// How an order is paid.
///
/// Only cash-on-delivery is live; `GooglePay` exists as a disabled
/// placeholder on the checkout form and is never submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    GooglePay,
}

impl PaymentMethod {
    /// Wire/form value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::GooglePay => "google_pay",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Cash on Delivery",
            Self::GooglePay => "Google Pay",
        }
    }
}

/// A placed order.
///
/// Created once per checkout with a copy of the cart at purchase time; the
/// total is the backend's authoritative figure, already in paise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Backend-assigned identifier.
    pub id: OrderId,
    /// Name collected on the checkout form.
    pub customer_name: String,
    /// Delivery address collected on the checkout form.
    pub delivery_address: String,
    /// Payment method chosen at checkout.
    pub payment_method: PaymentMethod,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Grand total in paise.
    pub total: Paise,
    /// The identity that placed the order.
    pub user: PrincipalId,
    /// Snapshot of the cart lines at purchase time.
    pub items: Vec<CartItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_wire_form() {
        for status in OrderStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            let back: OrderStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn payment_methods_use_snake_case_wire_values() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::GooglePay).unwrap(),
            "\"google_pay\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Cash).unwrap(),
            "\"cash\""
        );
    }
}
