//! Custom sticker route handlers.
//!
//! Signed-in users design their own stickers: a name, a category, a price
//! and an uploaded image. The image travels to the backend base64-encoded
//! inside the JSON draft; the backend stores it and hands back a hosted
//! URL. Ordering stickers is not live yet, so the gallery links to a
//! coming-soon page instead of a buy button.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Query, State},
    response::{AppendHeaders, IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;
use tracing::instrument;

use sprtshop_core::{CustomSticker, STICKER_LABELS};

use crate::backend::StickerDraft;
use crate::filters;
use crate::middleware::{CspNonce, OptionalIdentity, RequireIdentity};
use crate::routes::{CategoryOption, Nav, category_options, form_error, rejection_message};
use crate::state::AppState;
use crate::validate;

/// Sticker display data for gallery cards.
#[derive(Clone)]
pub struct StickerCardView {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: String,
    pub image_url: String,
}

impl From<&CustomSticker> for StickerCardView {
    fn from(sticker: &CustomSticker) -> Self {
        Self {
            name: sticker.name.clone(),
            description: sticker.description.clone(),
            category: sticker.category.display_label(),
            price: sticker.price.format_inr(),
            image_url: sticker.image_url.clone(),
        }
    }
}

/// Query parameters for the gallery page.
#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    /// Set by the post-creation redirect to show the success banner.
    pub created: Option<u8>,
}

/// Sticker gallery page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/stickers.html")]
pub struct StickersTemplate {
    pub nav: Nav,
    pub stickers: Vec<StickerCardView>,
    pub categories: Vec<CategoryOption>,
    pub error: Option<String>,
    pub signed_in: bool,
    pub created: bool,
}

/// Coming-soon page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/stickers_coming_soon.html")]
pub struct StickersComingSoonTemplate {
    pub nav: Nav,
}

/// Category options for the creation form: the known sticker labels plus
/// the free-form custom choice.
fn sticker_category_options() -> Vec<CategoryOption> {
    let mut options = category_options(STICKER_LABELS);
    options.push(CategoryOption {
        value: "custom".to_string(),
        label: "Custom".to_string(),
    });
    options
}

/// Display the caller's sticker gallery and the creation form.
///
/// Guests see a sign-in prompt; stickers are personal.
#[instrument(skip(state, identity, nonce))]
pub async fn index(
    State(state): State<AppState>,
    OptionalIdentity(identity): OptionalIdentity,
    CspNonce(nonce): CspNonce,
    Query(query): Query<GalleryQuery>,
) -> impl IntoResponse {
    let (stickers, error) = match identity {
        Some(ref caller) => match state.backend().get_caller_stickers(caller).await {
            Ok(stickers) => (stickers.iter().map(StickerCardView::from).collect(), None),
            Err(e) => {
                tracing::error!("Failed to fetch stickers: {e}");
                (
                    Vec::new(),
                    Some("Your stickers could not be loaded. Please try again.".to_string()),
                )
            }
        },
        None => (Vec::new(), None),
    };

    let nav = super::nav(&state, identity.as_ref(), nonce).await;
    let signed_in = identity.is_some();

    StickersTemplate {
        nav,
        stickers,
        categories: sticker_category_options(),
        error,
        signed_in,
        created: query.created == Some(1),
    }
}

/// Create a sticker from the multipart upload (HTMX).
///
/// Success answers with an `HX-Redirect` back to the gallery, which both
/// shows the new sticker and resets the form. Failures render into the
/// form's alert region and leave the typed values in place.
#[instrument(skip(state, caller, multipart))]
pub async fn create(
    State(state): State<AppState>,
    RequireIdentity(caller): RequireIdentity,
    mut multipart: Multipart,
) -> Response {
    let mut name = String::new();
    let mut description = String::new();
    let mut category = String::new();
    let mut price = String::new();
    let mut image: Option<(Vec<u8>, String)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Malformed sticker upload: {e}");
                return form_error("The upload could not be read. Please try again.".to_string());
            }
        };

        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "image" => {
                let content_type = field
                    .content_type()
                    .map_or_else(|| "application/octet-stream".to_string(), ToString::to_string);
                match field.bytes().await {
                    Ok(data) => image = Some((data.to_vec(), content_type)),
                    Err(e) => {
                        tracing::warn!("Failed to read sticker image: {e}");
                        return form_error(
                            "The image could not be read. Please try again.".to_string(),
                        );
                    }
                }
            }
            "name" | "description" | "category" | "price" => {
                let value = match field.text().await {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::warn!("Failed to read sticker form field {field_name}: {e}");
                        return form_error(
                            "The upload could not be read. Please try again.".to_string(),
                        );
                    }
                };
                match field_name.as_str() {
                    "name" => name = value,
                    "description" => description = value,
                    "category" => category = value,
                    _ => price = value,
                }
            }
            _ => {}
        }
    }

    let name = match validate::require("Name", &name) {
        Ok(name) => name,
        Err(e) => return form_error(e.to_string()),
    };
    let category = match validate::parse_category(&category, STICKER_LABELS) {
        Ok(category) => category,
        Err(e) => return form_error(e.to_string()),
    };
    let price = match validate::parse_price(&price) {
        Ok(price) => price,
        Err(e) => return form_error(e.to_string()),
    };
    let (image_data, image_content_type) = match image {
        Some((data, content_type)) => {
            if let Err(e) = validate::check_image(&data, &content_type) {
                return form_error(e.to_string());
            }
            (data, content_type)
        }
        None => return form_error(validate::ValidationError::MissingImage.to_string()),
    };

    let draft = StickerDraft {
        name,
        description: validate::optional(&description),
        category,
        price,
        image: STANDARD.encode(image_data),
        image_content_type,
    };

    match state.backend().create_sticker(&caller, &draft).await {
        Ok(sticker) => {
            tracing::info!(sticker_id = %sticker.id, "Sticker created");
            (
                AppendHeaders([("HX-Redirect", "/stickers?created=1")]),
                (),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to create sticker: {e}");
            form_error(rejection_message(
                &e,
                "Could not create your sticker. Please try again.",
            ))
        }
    }
}

/// Placeholder page for ordering stickers.
#[instrument(skip(state, identity, nonce))]
pub async fn coming_soon(
    State(state): State<AppState>,
    OptionalIdentity(identity): OptionalIdentity,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let nav = super::nav(&state, identity.as_ref(), nonce).await;
    StickersComingSoonTemplate { nav }
}
