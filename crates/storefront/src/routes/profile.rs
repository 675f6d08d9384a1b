//! Profile route handlers.
//!
//! The profile is a display name plus read-only account facts (principal,
//! account type). The name prefills checkout and shows up in the admin
//! order list.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use sprtshop_core::Role;

use crate::backend::BackendError;
use crate::filters;
use crate::middleware::{CspNonce, RequireIdentity};
use crate::models::Identity;
use crate::routes::{Nav, rejection_message};
use crate::state::AppState;
use crate::validate;

/// Profile form data.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub name: String,
}

/// Query parameters for the profile page.
#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    /// Set by the post-save redirect to show the saved banner.
    pub saved: Option<u8>,
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/profile.html")]
pub struct ProfileTemplate {
    pub nav: Nav,
    pub name: String,
    pub principal: String,
    pub role: String,
    pub saved: bool,
    pub error: Option<String>,
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "Admin",
        Role::User => "User",
        Role::Guest => "Guest",
    }
}

/// Assemble the profile page for the caller.
async fn profile_page(
    state: &AppState,
    caller: &Identity,
    nonce: String,
    name_override: Option<String>,
    saved: bool,
    error: Option<String>,
) -> ProfileTemplate {
    let name = match name_override {
        Some(name) => name,
        None => match state.backend().get_profile(caller).await {
            Ok(profile) => profile.name,
            Err(BackendError::NotFound(_)) => String::new(),
            Err(e) => {
                tracing::warn!("Failed to fetch profile: {e}");
                String::new()
            }
        },
    };

    // The role is informational here; if the lookup fails the page still
    // renders
    let role = match state.backend().get_caller_role(Some(caller)).await {
        Ok(role) => role_label(role).to_string(),
        Err(e) => {
            tracing::warn!("Failed to fetch account role: {e}");
            "Unknown".to_string()
        }
    };

    let nav = super::nav(state, Some(caller), nonce).await;

    ProfileTemplate {
        nav,
        name,
        principal: caller.principal.to_string(),
        role,
        saved,
        error,
    }
}

/// Display the profile page.
#[instrument(skip(state, caller, nonce))]
pub async fn show(
    State(state): State<AppState>,
    RequireIdentity(caller): RequireIdentity,
    CspNonce(nonce): CspNonce,
    Query(query): Query<ProfileQuery>,
) -> impl IntoResponse {
    profile_page(&state, &caller, nonce, None, query.saved == Some(1), None).await
}

/// Save the display name.
#[instrument(skip(state, caller, nonce, form))]
pub async fn save(
    State(state): State<AppState>,
    RequireIdentity(caller): RequireIdentity,
    CspNonce(nonce): CspNonce,
    Form(form): Form<ProfileForm>,
) -> Response {
    let name = match validate::require("Name", &form.name) {
        Ok(name) => name,
        Err(e) => {
            return profile_page(
                &state,
                &caller,
                nonce,
                Some(form.name),
                false,
                Some(e.to_string()),
            )
            .await
            .into_response();
        }
    };

    match state.backend().save_profile(&caller, &name).await {
        Ok(()) => Redirect::to("/profile?saved=1").into_response(),
        Err(e) => {
            tracing::warn!("Failed to save profile: {e}");
            let message = rejection_message(&e, "Could not save your profile. Please try again.");
            profile_page(&state, &caller, nonce, Some(name), false, Some(message))
                .await
                .into_response()
        }
    }
}
