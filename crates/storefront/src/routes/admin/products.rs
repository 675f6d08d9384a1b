//! Admin product management route handlers.
//!
//! One form template serves both create and edit; the handlers differ only
//! in where the draft goes. Prices are entered in rupees and converted to
//! paise before they leave the process.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use sprtshop_core::{ItemId, PRODUCT_LABELS, Product};

use crate::backend::ProductDraft;
use crate::error::Result;
use crate::filters;
use crate::middleware::{CspNonce, RequireAdmin};
use crate::routes::{CategoryOption, Nav, category_options, form_error, rejection_message};
use crate::state::AppState;
use crate::validate::{self, ValidationError};

/// Product form data, all fields as the browser sent them.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub stock: String,
}

/// Product form page template, shared by create and edit.
#[derive(Template, WebTemplate)]
#[template(path = "pages/admin_product_form.html")]
pub struct ProductFormTemplate {
    pub nav: Nav,
    pub heading: String,
    pub form_action: String,
    pub name: String,
    pub description: String,
    pub category_slug: String,
    pub price: String,
    pub stock: String,
    pub categories: Vec<CategoryOption>,
}

/// Validate the submitted form into a backend draft.
fn parse_product_form(form: &ProductForm) -> std::result::Result<ProductDraft, ValidationError> {
    Ok(ProductDraft {
        name: validate::require("Name", &form.name)?,
        description: validate::require("Description", &form.description)?,
        category: validate::parse_category(&form.category, PRODUCT_LABELS)?,
        stock: validate::parse_stock(&form.stock)?,
        price: validate::parse_price(&form.price)?,
    })
}

/// Rupee string for prefilling the price input, no currency glyph.
fn price_input_value(product: &Product) -> String {
    product
        .price
        .format_inr()
        .trim_start_matches('₹')
        .to_string()
}

/// Display the empty product form.
#[instrument(skip(state, admin, nonce))]
pub async fn new_form(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let nav = crate::routes::nav(&state, Some(&admin), nonce).await;

    ProductFormTemplate {
        nav,
        heading: "New product".to_string(),
        form_action: "/admin/products".to_string(),
        name: String::new(),
        description: String::new(),
        category_slug: String::new(),
        price: String::new(),
        stock: String::new(),
        categories: category_options(PRODUCT_LABELS),
    }
}

/// Display the form prefilled with an existing product.
#[instrument(skip(state, admin, nonce), fields(product_id = id))]
pub async fn edit_form(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    CspNonce(nonce): CspNonce,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let product = state.backend().get_product(ItemId::new(id)).await?;
    let nav = crate::routes::nav(&state, Some(&admin), nonce).await;

    Ok(ProductFormTemplate {
        nav,
        heading: format!("Edit {}", product.name),
        form_action: format!("/admin/products/{id}"),
        name: product.name.clone(),
        description: product.description.clone(),
        category_slug: product.category.slug().to_string(),
        price: price_input_value(&product),
        stock: product.stock.to_string(),
        categories: category_options(PRODUCT_LABELS),
    })
}

/// Create a product (HTMX).
#[instrument(skip(state, admin, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<ProductForm>,
) -> Response {
    let draft = match parse_product_form(&form) {
        Ok(draft) => draft,
        Err(e) => return form_error(e.to_string()),
    };

    match state.backend().create_product(&admin, &draft).await {
        Ok(id) => {
            tracing::info!(product_id = %id, "Product created");
            (AppendHeaders([("HX-Redirect", "/admin")]), ()).into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to create product: {e}");
            form_error(rejection_message(
                &e,
                "Could not create the product. Please try again.",
            ))
        }
    }
}

/// Update a product (HTMX).
#[instrument(skip(state, admin, form), fields(product_id = id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Form(form): Form<ProductForm>,
) -> Response {
    let draft = match parse_product_form(&form) {
        Ok(draft) => draft,
        Err(e) => return form_error(e.to_string()),
    };

    match state
        .backend()
        .update_product(&admin, ItemId::new(id), &draft)
        .await
    {
        Ok(()) => (AppendHeaders([("HX-Redirect", "/admin")]), ()).into_response(),
        Err(e) => {
            tracing::warn!("Failed to update product: {e}");
            form_error(rejection_message(
                &e,
                "Could not update the product. Please try again.",
            ))
        }
    }
}

/// Delete a product (HTMX, confirmed client-side).
#[instrument(skip(state, admin), fields(product_id = id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Response {
    match state.backend().delete_product(&admin, ItemId::new(id)).await {
        Ok(()) => (AppendHeaders([("HX-Redirect", "/admin")]), ()).into_response(),
        Err(e) => {
            tracing::warn!("Failed to delete product: {e}");
            form_error(rejection_message(
                &e,
                "Could not delete the product. Please try again.",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprtshop_core::{Category, Paise};

    fn form(name: &str, description: &str, category: &str, price: &str, stock: &str) -> ProductForm {
        ProductForm {
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            price: price.to_string(),
            stock: stock.to_string(),
        }
    }

    #[test]
    fn valid_form_parses_into_a_draft() {
        let draft = parse_product_form(&form(
            " 3-Star Ball ",
            "Tournament grade",
            "table-tennis-balls",
            "249.50",
            "40",
        ))
        .expect("form should validate");

        assert_eq!(draft.name, "3-Star Ball");
        assert_eq!(draft.category, Category::named("table-tennis-balls"));
        assert_eq!(draft.price, Paise::new(24950));
        assert_eq!(draft.stock, 40);
    }

    #[test]
    fn blank_and_malformed_fields_are_rejected() {
        assert!(matches!(
            parse_product_form(&form("", "d", "table-tennis-balls", "10", "1")),
            Err(ValidationError::Required("Name"))
        ));
        assert!(matches!(
            parse_product_form(&form("n", "  ", "table-tennis-balls", "10", "1")),
            Err(ValidationError::Required("Description"))
        ));
        assert!(matches!(
            parse_product_form(&form("n", "d", "skates", "10", "1")),
            Err(ValidationError::InvalidCategory)
        ));
        assert!(matches!(
            parse_product_form(&form("n", "d", "table-tennis-balls", "0", "1")),
            Err(ValidationError::NonPositivePrice)
        ));
        assert!(matches!(
            parse_product_form(&form("n", "d", "table-tennis-balls", "ten", "1")),
            Err(ValidationError::InvalidPrice(_))
        ));
        assert!(matches!(
            parse_product_form(&form("n", "d", "table-tennis-balls", "10", "-3")),
            Err(ValidationError::InvalidStock)
        ));
    }

    #[test]
    fn price_prefill_matches_what_the_operator_typed() {
        let product = Product {
            id: ItemId::new(1),
            name: "Ball".to_string(),
            description: String::new(),
            category: Category::named("table-tennis-balls"),
            stock: 5,
            price: Paise::new(24950),
        };
        assert_eq!(price_input_value(&product), "249.50");

        let whole = Product {
            price: Paise::new(20000),
            ..product
        };
        assert_eq!(price_input_value(&whole), "200");
    }
}
