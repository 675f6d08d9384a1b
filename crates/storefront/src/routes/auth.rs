//! Authentication route handlers.
//!
//! Sign-in is delegated entirely to an external identity provider: the
//! login page links out with a random `state` value, the provider sends
//! the caller back to `/auth/callback` with a principal and a proof token,
//! and the pair is kept in the session from then on. The storefront never
//! sees credentials and never verifies tokens itself; the backend does
//! that on every caller-scoped request.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use url::Url;

use sprtshop_core::PrincipalId;

use crate::error::Result;
use crate::filters;
use crate::middleware::{CspNonce, OptionalIdentity, set_identity};
use crate::models::{Identity, LoginAttempt, session_keys};
use crate::routes::Nav;
use crate::state::AppState;

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub return_to: Option<String>,
}

/// Query parameters the identity provider sends to the callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub principal: Option<String>,
    pub token: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/login.html")]
pub struct LoginTemplate {
    pub nav: Nav,
    pub provider_url: String,
    pub error: Option<String>,
}

/// Keep only storefront-local redirect targets.
///
/// Anything that does not start with a single `/` could send the caller
/// off-site after login, so it is dropped.
fn safe_return_path(path: Option<&str>) -> Option<String> {
    path.filter(|p| p.starts_with('/') && !p.starts_with("//"))
        .map(ToString::to_string)
}

/// Random state value for the provider round trip.
fn generate_login_state() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Display the login page.
///
/// Stores a fresh [`LoginAttempt`] in the session and links out to the
/// identity provider with the callback address and state attached.
#[instrument(skip(state, session, identity, nonce))]
pub async fn login_page(
    State(state): State<AppState>,
    session: Session,
    OptionalIdentity(identity): OptionalIdentity,
    CspNonce(nonce): CspNonce,
    Query(query): Query<LoginQuery>,
) -> Result<Response> {
    if identity.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let attempt = LoginAttempt {
        state: generate_login_state(),
        return_to: safe_return_path(query.return_to.as_deref()),
    };
    session
        .insert(session_keys::LOGIN_ATTEMPT, &attempt)
        .await?;

    let provider_url = build_provider_url(&state, &attempt.state)?;
    let nav = super::nav(&state, None, nonce).await;

    Ok(LoginTemplate {
        nav,
        provider_url,
        error: None,
    }
    .into_response())
}

/// Handle the identity provider callback.
///
/// The `state` must match the attempt stored at login time; a stale or
/// forged callback renders the login page again instead of signing anyone
/// in. The session id is cycled before the identity is stored.
#[instrument(skip(state, session, nonce, query))]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
    Query(query): Query<CallbackQuery>,
) -> Result<Response> {
    let attempt: Option<LoginAttempt> = session.remove(session_keys::LOGIN_ATTEMPT).await?;

    if let Some(provider_error) = query.error {
        tracing::info!("Identity provider declined sign-in: {provider_error}");
        return login_again(
            &state,
            &session,
            nonce,
            "Sign-in was cancelled. Please try again.",
        )
        .await;
    }

    let Some(attempt) = attempt else {
        return login_again(
            &state,
            &session,
            nonce,
            "Your sign-in expired. Please try again.",
        )
        .await;
    };

    if query.state.as_deref() != Some(attempt.state.as_str()) {
        tracing::warn!("Login callback state mismatch");
        return login_again(
            &state,
            &session,
            nonce,
            "Your sign-in could not be verified. Please try again.",
        )
        .await;
    }

    let (Some(principal), Some(token)) = (query.principal, query.token) else {
        return login_again(
            &state,
            &session,
            nonce,
            "The identity provider sent an incomplete reply.",
        )
        .await;
    };
    if principal.is_empty() || token.is_empty() {
        return login_again(
            &state,
            &session,
            nonce,
            "The identity provider sent an incomplete reply.",
        )
        .await;
    }

    // Fresh session id for the freshly signed-in caller
    session.cycle_id().await?;

    let identity = Identity {
        principal: PrincipalId::new(principal),
        token,
    };
    set_identity(&session, &identity).await?;

    tracing::info!(principal = %identity.principal.abbreviated(), "Signed in");

    let destination = attempt.return_to.unwrap_or_else(|| "/".to_string());
    Ok(Redirect::to(&destination).into_response())
}

/// Log out and drop the whole session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    session.flush().await?;
    Ok(Redirect::to("/"))
}

/// Build the identity provider URL for a login attempt.
fn build_provider_url(state: &AppState, login_state: &str) -> Result<String> {
    let config = state.config();
    let mut url = Url::parse(&config.identity_provider_url).map_err(|e| {
        crate::error::AppError::Internal(format!("identity provider URL is invalid: {e}"))
    })?;
    url.query_pairs_mut()
        .append_pair(
            "redirect_uri",
            &format!("{}/auth/callback", config.base_url),
        )
        .append_pair("state", login_state);
    Ok(url.into())
}

/// Render the login page with an error and a fresh, stored attempt so the
/// retry link can complete.
async fn login_again(
    state: &AppState,
    session: &Session,
    nonce: String,
    message: &str,
) -> Result<Response> {
    let attempt = LoginAttempt {
        state: generate_login_state(),
        return_to: None,
    };
    session
        .insert(session_keys::LOGIN_ATTEMPT, &attempt)
        .await?;

    let provider_url = build_provider_url(state, &attempt.state)?;
    let nav = super::nav(state, None, nonce).await;

    Ok(LoginTemplate {
        nav,
        provider_url,
        error: Some(message.to_string()),
    }
    .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_paths_must_be_storefront_local() {
        assert_eq!(safe_return_path(Some("/cart")), Some("/cart".to_string()));
        assert_eq!(
            safe_return_path(Some("/orders/7")),
            Some("/orders/7".to_string())
        );
        assert_eq!(safe_return_path(Some("https://evil.example/")), None);
        assert_eq!(safe_return_path(Some("//evil.example")), None);
        assert_eq!(safe_return_path(Some("cart")), None);
        assert_eq!(safe_return_path(None), None);
    }

    #[test]
    fn login_states_are_unique() {
        assert_ne!(generate_login_state(), generate_login_state());
    }
}
