//! Authentication extractors.
//!
//! Route handlers declare their access level by extractor: [`RequireIdentity`]
//! for signed-in pages, [`OptionalIdentity`] for pages with a guest view, and
//! [`RequireAdmin`] for the admin console. The admin check is answered by the
//! backend and fails closed.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{Identity, session_keys};
use crate::state::AppState;

/// Extractor that requires a signed-in caller.
///
/// Browser requests are redirected to the login page with a `return_to`
/// back to the current path; htmx fragment requests get a plain 401 so the
/// redirect is not swallowed into a swap.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireIdentity(identity): RequireIdentity,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", identity.principal)
/// }
/// ```
pub struct RequireIdentity(pub Identity);

/// Rejection for [`RequireIdentity`].
pub enum AuthRejection {
    /// Redirect to the login page, returning here afterwards.
    RedirectToLogin { return_to: String },
    /// Plain 401 for htmx fragment requests.
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { return_to } => {
                Redirect::to(&format!("/auth/login?return_to={return_to}")).into_response()
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Session is placed in extensions by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        let identity: Identity = session
            .get(session_keys::IDENTITY)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| {
                if parts.headers.contains_key("hx-request") {
                    AuthRejection::Unauthorized
                } else {
                    AuthRejection::RedirectToLogin {
                        return_to: parts.uri.path().to_string(),
                    }
                }
            })?;

        Ok(Self(identity))
    }
}

/// Extractor that optionally reads the caller identity.
///
/// Unlike [`RequireIdentity`], a signed-out caller is not rejected.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(
///     OptionalIdentity(identity): OptionalIdentity,
/// ) -> impl IntoResponse {
///     match identity {
///         Some(id) => format!("Hello, {}!", id.principal),
///         None => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct OptionalIdentity(pub Option<Identity>);

impl<S> FromRequestParts<S> for OptionalIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<Identity>(session_keys::IDENTITY)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(identity))
    }
}

/// Extractor that requires a signed-in admin.
///
/// Asks the backend whether the caller holds the admin role. Signed-out
/// callers go to login; signed-in non-admins get a 403 page. A failed
/// check counts as non-admin.
pub struct RequireAdmin(pub Identity);

/// Rejection for [`RequireAdmin`].
pub enum AdminRejection {
    /// Not signed in at all.
    RedirectToLogin { return_to: String },
    /// Signed in, but not an admin.
    Denied,
}

#[derive(Template, WebTemplate)]
#[template(path = "pages/access_denied.html")]
struct AccessDeniedTemplate;

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { return_to } => {
                Redirect::to(&format!("/auth/login?return_to={return_to}")).into_response()
            }
            Self::Denied => (StatusCode::FORBIDDEN, AccessDeniedTemplate).into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AdminRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().ok_or_else(|| {
            AdminRejection::RedirectToLogin {
                return_to: parts.uri.path().to_string(),
            }
        })?;

        let identity: Identity = session
            .get(session_keys::IDENTITY)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| AdminRejection::RedirectToLogin {
                return_to: parts.uri.path().to_string(),
            })?;

        if state.backend().is_caller_admin(Some(&identity)).await {
            Ok(Self(identity))
        } else {
            Err(AdminRejection::Denied)
        }
    }
}

/// Store the caller identity in the session after login.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_identity(
    session: &Session,
    identity: &Identity,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::IDENTITY, identity).await
}

/// Remove the caller identity from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_identity(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<Identity>(session_keys::IDENTITY).await?;
    Ok(())
}
