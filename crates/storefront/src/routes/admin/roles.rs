//! Admin role assignment route handler.
//!
//! The backend does not expose a user directory, so the form takes a raw
//! principal. A typo'd principal is accepted and simply grants a role to an
//! identity that may never sign in; the backend rejects only malformed
//! assignments.

use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use sprtshop_core::PrincipalId;

use crate::middleware::RequireAdmin;
use crate::routes::{form_error, rejection_message};
use crate::state::AppState;
use crate::validate;

/// Role grant form data.
#[derive(Debug, Deserialize)]
pub struct RoleForm {
    pub principal: String,
    pub role: String,
}

/// Grant a role to a principal (HTMX).
#[instrument(skip(state, admin, form))]
pub async fn assign(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<RoleForm>,
) -> Response {
    let principal = match validate::require("Principal", &form.principal) {
        Ok(principal) => principal,
        Err(e) => return form_error(e.to_string()),
    };
    let role = match validate::parse_role(&form.role) {
        Ok(role) => role,
        Err(e) => return form_error(e.to_string()),
    };

    let target = PrincipalId::new(principal);
    match state.backend().assign_role(&admin, target.clone(), role).await {
        Ok(()) => {
            tracing::info!(
                target_principal = %target.abbreviated(),
                role = role.as_str(),
                "Role assigned"
            );
            (AppendHeaders([("HX-Redirect", "/admin?role_granted=1")]), ()).into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to assign role: {e}");
            form_error(rejection_message(
                &e,
                "Could not assign the role. Please try again.",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ValidationError;
    use sprtshop_core::Role;

    #[test]
    fn blank_principal_is_rejected_before_the_backend_sees_it() {
        assert_eq!(
            validate::require("Principal", "   "),
            Err(ValidationError::Required("Principal"))
        );
    }

    #[test]
    fn only_grantable_roles_parse() {
        assert_eq!(validate::parse_role("admin"), Ok(Role::Admin));
        assert_eq!(validate::parse_role("user"), Ok(Role::User));
        assert_eq!(
            validate::parse_role("guest"),
            Err(ValidationError::InvalidRole)
        );
    }
}
