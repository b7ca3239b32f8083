//! Bearer-token authentication extractors.
//!
//! `CurrentUser` authenticates any role; the `Require*` wrappers add a role
//! gate on top. All of them re-fetch the user row, so a deleted account is
//! locked out even while its token is still within its lifetime.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use swiftcart_core::Role;

use crate::error::AppError;
use crate::models::User;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// The authenticated user behind the request's bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Auth(AuthError::MissingToken))?;

        let auth = AuthService::new(
            state.pool(),
            state.jwt_encoding_key(),
            state.jwt_decoding_key(),
        );
        let claims = auth.verify_token(token)?;
        let user = auth.user_for_claims(&claims).await?;

        Ok(Self(user))
    }
}

/// Pull the token out of an `Authorization: Bearer ...` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Check the authenticated user holds the expected role.
fn require_role(user: User, role: Role) -> Result<User, AppError> {
    if user.role == role {
        Ok(user)
    } else {
        Err(AppError::Forbidden(format!(
            "Access denied for role: {}",
            user.role
        )))
    }
}

macro_rules! role_extractor {
    ($(#[$doc:meta])* $name:ident, $role:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name(pub User);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
                Ok(Self(require_role(user, $role)?))
            }
        }
    };
}

role_extractor!(
    /// An authenticated customer.
    RequireCustomer,
    Role::Customer
);
role_extractor!(
    /// An authenticated vendor.
    RequireVendor,
    Role::Vendor
);
role_extractor!(
    /// An authenticated delivery agent.
    RequireAgent,
    Role::Agent
);
role_extractor!(
    /// An authenticated admin.
    RequireAdmin,
    Role::Admin
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use swiftcart_core::{Email, UserId};

    fn user(role: Role) -> User {
        User {
            id: UserId::new(1),
            name: "Test".to_string(),
            email: Email::parse("test@example.com").unwrap(),
            role,
            phone: None,
            region: None,
            address: None,
            place: None,
            category: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_require_role_matches() {
        assert!(require_role(user(Role::Vendor), Role::Vendor).is_ok());
    }

    #[test]
    fn test_require_role_rejects_other_roles() {
        let err = require_role(user(Role::Customer), Role::Admin).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_bearer_extraction_requires_prefix() {
        let (parts, ()) = axum::http::Request::builder()
            .header(AUTHORIZATION, "Token abc")
            .body(())
            .unwrap()
            .into_parts();
        assert!(bearer_token(&parts).is_none());

        let (parts, ()) = axum::http::Request::builder()
            .header(AUTHORIZATION, "Bearer abc")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts), Some("abc"));
    }
}
