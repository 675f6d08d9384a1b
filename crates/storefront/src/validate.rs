//! Form input validation.
//!
//! Every gate here runs before a write reaches the backend; the backend
//! validates again, so these exist to give the shopper or operator an
//! immediate, specific message instead of a round trip. Error display text
//! is written for end users and rendered verbatim in form alerts.

use thiserror::Error;

use sprtshop_core::{Category, ParseAmountError, Paise, PaymentMethod, Role};

/// A rejected form field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field was blank.
    #[error("{0} is required")]
    Required(&'static str),

    /// Price failed to parse as a rupee amount.
    #[error("Price is invalid: {0}")]
    InvalidPrice(#[from] ParseAmountError),

    /// Price parsed but is zero or negative.
    #[error("Price must be greater than zero")]
    NonPositivePrice,

    /// Stock is not a whole non-negative number.
    #[error("Stock must be a whole number of units")]
    InvalidStock,

    /// Quantity below one.
    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    /// Quantity above the product's available stock.
    #[error("Only {available} in stock")]
    InsufficientStock {
        /// Units the product has left.
        available: u32,
    },

    /// Category outside the allowed set.
    #[error("Choose a valid category")]
    InvalidCategory,

    /// Recognized payment method that cannot be used yet.
    #[error("{0} is not available yet")]
    PaymentUnavailable(&'static str),

    /// Unrecognized payment method value.
    #[error("Choose a valid payment method")]
    InvalidPayment,

    /// Role outside the grantable set.
    #[error("Choose a valid role")]
    InvalidRole,

    /// Upload field arrived without a file.
    #[error("An image is required")]
    MissingImage,

    /// Uploaded file is not an image.
    #[error("Upload an image file")]
    NotAnImage,
}

/// Require a non-blank text field, returning it trimmed.
///
/// # Errors
///
/// Returns [`ValidationError::Required`] when the trimmed value is empty.
pub fn require(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Trim an optional text field, mapping blank to `None`.
#[must_use]
pub fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse an operator-entered rupee price. Must be strictly positive.
///
/// # Errors
///
/// Returns an error when the input is not a valid amount or is not
/// positive.
pub fn parse_price(input: &str) -> Result<Paise, ValidationError> {
    let price = Paise::parse_rupees(input)?;
    if price.is_positive() {
        Ok(price)
    } else {
        Err(ValidationError::NonPositivePrice)
    }
}

/// Parse a stock count. `u32` parsing rejects negatives and fractions.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidStock`] when the input is not a whole
/// non-negative number.
pub fn parse_stock(input: &str) -> Result<u32, ValidationError> {
    input
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidStock)
}

/// Check a cart quantity.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidQuantity`] for a zero quantity.
pub fn check_quantity(quantity: u32) -> Result<u32, ValidationError> {
    if quantity >= 1 {
        Ok(quantity)
    } else {
        Err(ValidationError::InvalidQuantity)
    }
}

/// Bound a cart quantity by available stock.
///
/// Regular products carry a stock ceiling; custom stickers pass `None` and
/// are never blocked here.
///
/// # Errors
///
/// Returns [`ValidationError::InsufficientStock`] when the quantity exceeds
/// a known stock level.
pub fn check_stock_bound(quantity: u32, stock: Option<u32>) -> Result<(), ValidationError> {
    match stock {
        Some(available) if quantity > available => {
            Err(ValidationError::InsufficientStock { available })
        }
        _ => Ok(()),
    }
}

/// Parse a category select value against an allowed label set.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidCategory`] when the value is neither
/// `custom` nor in `allowed`.
pub fn parse_category(value: &str, allowed: &[&str]) -> Result<Category, ValidationError> {
    Category::from_slug(value, allowed).ok_or(ValidationError::InvalidCategory)
}

/// Check an uploaded sticker image.
///
/// # Errors
///
/// Returns an error when no file arrived or its declared type is not an
/// image.
pub fn check_image(data: &[u8], content_type: &str) -> Result<(), ValidationError> {
    if data.is_empty() {
        return Err(ValidationError::MissingImage);
    }
    if !content_type.starts_with("image/") {
        return Err(ValidationError::NotAnImage);
    }
    Ok(())
}

/// Parse the checkout payment method select.
///
/// Google Pay appears in the form but is not accepting payments, so a
/// tampered submission naming it is rejected like any other bad value.
///
/// # Errors
///
/// Returns an error for anything other than cash on delivery.
pub fn parse_payment_method(value: &str) -> Result<PaymentMethod, ValidationError> {
    match value {
        "cash" => Ok(PaymentMethod::Cash),
        "google_pay" => Err(ValidationError::PaymentUnavailable("Google Pay")),
        _ => Err(ValidationError::InvalidPayment),
    }
}

/// Parse the role select on the admin grant form.
///
/// Only admin and user are grantable; guest is the implicit state of a
/// signed-out caller, not something to hand out.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidRole`] for anything else.
pub fn parse_role(value: &str) -> Result<Role, ValidationError> {
    match value {
        "admin" => Ok(Role::Admin),
        "user" => Ok(Role::User),
        _ => Err(ValidationError::InvalidRole),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprtshop_core::{PRODUCT_LABELS, STICKER_LABELS};

    #[test]
    fn require_rejects_blank_and_whitespace() {
        assert_eq!(
            require("Name", ""),
            Err(ValidationError::Required("Name"))
        );
        assert_eq!(
            require("Name", "   "),
            Err(ValidationError::Required("Name"))
        );
        assert_eq!(require("Name", "  Ball  "), Ok("Ball".to_string()));
    }

    #[test]
    fn optional_maps_blank_to_none() {
        assert_eq!(optional(""), None);
        assert_eq!(optional("  "), None);
        assert_eq!(optional(" glossy "), Some("glossy".to_string()));
    }

    #[test]
    fn price_must_be_a_positive_amount() {
        assert_eq!(parse_price("20.50"), Ok(Paise::new(2050)));
        assert_eq!(parse_price("1"), Ok(Paise::new(100)));
        assert_eq!(parse_price("0"), Err(ValidationError::NonPositivePrice));
        assert_eq!(parse_price("-5"), Err(ValidationError::NonPositivePrice));
        assert!(matches!(
            parse_price("abc"),
            Err(ValidationError::InvalidPrice(ParseAmountError::Invalid))
        ));
        assert!(matches!(
            parse_price("1.005"),
            Err(ValidationError::InvalidPrice(ParseAmountError::TooPrecise))
        ));
    }

    #[test]
    fn stock_must_be_a_whole_non_negative_number() {
        assert_eq!(parse_stock("0"), Ok(0));
        assert_eq!(parse_stock(" 12 "), Ok(12));
        assert_eq!(parse_stock("-1"), Err(ValidationError::InvalidStock));
        assert_eq!(parse_stock("3.5"), Err(ValidationError::InvalidStock));
        assert_eq!(parse_stock("lots"), Err(ValidationError::InvalidStock));
    }

    #[test]
    fn quantity_starts_at_one() {
        assert_eq!(check_quantity(0), Err(ValidationError::InvalidQuantity));
        assert_eq!(check_quantity(1), Ok(1));
        assert_eq!(check_quantity(99), Ok(99));
    }

    #[test]
    fn stock_bound_applies_to_products_only() {
        assert_eq!(check_stock_bound(3, Some(5)), Ok(()));
        assert_eq!(check_stock_bound(5, Some(5)), Ok(()));
        assert_eq!(
            check_stock_bound(6, Some(5)),
            Err(ValidationError::InsufficientStock { available: 5 })
        );
        // Sticker lines have no stock ceiling, whatever the quantity.
        assert_eq!(check_stock_bound(500, None), Ok(()));
    }

    #[test]
    fn category_is_checked_against_the_right_set() {
        assert!(parse_category("table-tennis-balls", PRODUCT_LABELS).is_ok());
        assert!(parse_category("patterns", STICKER_LABELS).is_ok());
        assert!(parse_category("custom", STICKER_LABELS).is_ok());
        assert_eq!(
            parse_category("patterns", PRODUCT_LABELS),
            Err(ValidationError::InvalidCategory)
        );
        assert_eq!(
            parse_category("", STICKER_LABELS),
            Err(ValidationError::InvalidCategory)
        );
    }

    #[test]
    fn image_uploads_must_be_non_empty_images() {
        assert_eq!(check_image(&[], "image/png"), Err(ValidationError::MissingImage));
        assert_eq!(
            check_image(b"data", "application/pdf"),
            Err(ValidationError::NotAnImage)
        );
        assert_eq!(check_image(b"data", "image/jpeg"), Ok(()));
    }

    #[test]
    fn only_cash_on_delivery_is_accepted() {
        assert_eq!(parse_payment_method("cash"), Ok(PaymentMethod::Cash));
        assert_eq!(
            parse_payment_method("google_pay"),
            Err(ValidationError::PaymentUnavailable("Google Pay"))
        );
        assert_eq!(
            parse_payment_method("bitcoin"),
            Err(ValidationError::InvalidPayment)
        );
    }

    #[test]
    fn only_admin_and_user_roles_are_grantable() {
        assert_eq!(parse_role("admin"), Ok(Role::Admin));
        assert_eq!(parse_role("user"), Ok(Role::User));
        assert_eq!(parse_role("guest"), Err(ValidationError::InvalidRole));
        assert_eq!(parse_role(""), Err(ValidationError::InvalidRole));
    }
}
