//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;
use zakat_core::auth::{Action, Resource, authorize};
use zakat_shared::{AppError, Claims, Role, TokenType};

use crate::{AppState, error::ApiError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware that validates access tokens.
///
/// On success the claims are stored in request extensions for [`AuthUser`].
/// Refresh tokens are refused here.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return ApiError(AppError::Unauthorized(
            "Authorization header with Bearer token is required".to_string(),
        ))
        .into_response();
    };

    match state.jwt_service.validate_token(token, TokenType::Access) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Extractor for the authenticated caller.
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> Result<Response, ApiError> {
///     auth.authorize(Resource::Donor, Action::Create)?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.0.user_id()
    }

    /// Returns the caller's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.0.role
    }

    /// Applies the role policy for `action` on `resource`.
    pub fn authorize(&self, resource: Resource, action: Action) -> Result<(), ApiError> {
        authorize(self.role(), resource, action).map_err(|e| {
            tracing::warn!(user_id = %self.user_id(), role = %self.role(), "Denied by role policy");
            ApiError(e)
        })
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError(AppError::Unauthorized("Authentication required".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Bearer abc", Some("abc"))]
    #[case("bearer abc", Some("abc"))]
    #[case("Bearer ", None)]
    #[case("Basic abc", None)]
    #[case("abc", None)]
    fn test_extract_bearer_token(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_bearer_token(header), expected);
    }
}
