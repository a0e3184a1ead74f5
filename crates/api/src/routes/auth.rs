//! Authentication routes for register, login, token refresh and the current user.

use axum::{
    Router,
    extract::State,
    response::Response,
    routing::{get, post},
};
use tracing::{info, warn};

use crate::{AppState, error::ApiError, extractors::Payload, middleware::AuthUser, response};
use zakat_core::auth::{hash_password, verify_password, verify_without_account};
use zakat_core::validation::RegisterInput;
use zakat_db::RepositoryError;
use zakat_db::entities::users;
use zakat_shared::auth::{AuthResponse, LoginRequest, RefreshRequest, UserInfo};
use zakat_shared::{AppError, Role, TokenType};

/// Routes reachable without a token.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

/// Routes that need the auth middleware.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

fn invalid_credentials() -> ApiError {
    ApiError(AppError::Unauthorized("Invalid email or password".to_string()))
}

fn user_info(user: users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        role: user.role.into(),
    }
}

fn issue(state: &AppState, user: users::Model) -> Result<AuthResponse, ApiError> {
    let user = user_info(user);
    let tokens = state.jwt_service.issue_pair(user.id, user.role)?;
    Ok(AuthResponse { user, tokens })
}

/// POST /auth/register - Create a viewer account and sign it in.
async fn register(
    State(state): State<AppState>,
    payload: Payload<RegisterInput>,
) -> Result<Response, ApiError> {
    let draft = payload.into_inner()?.into_draft()?;
    let password_hash = hash_password(&draft.password)?;

    let user = state
        .users()
        .create(&draft.email, &password_hash, &draft.full_name, Role::Viewer)
        .await?;

    info!(user_id = %user.id, email = %user.email, "New user registered");
    Ok(response::created("Registration successful", issue(&state, user)?))
}

/// POST /auth/login - Authenticate and return tokens.
async fn login(
    State(state): State<AppState>,
    payload: Payload<LoginRequest>,
) -> Result<Response, ApiError> {
    let payload = payload.into_inner()?;
    let email = payload.email.trim().to_lowercase();

    let Some(user) = state.users().find_by_email(&email).await? else {
        verify_without_account(&payload.password);
        info!(email = %email, "Login attempt for non-existent user");
        return Err(invalid_credentials());
    };

    if !user.is_active {
        warn!(user_id = %user.id, "Login attempt on disabled account");
        return Err(ApiError(AppError::Unauthorized(
            "This account has been disabled".to_string(),
        )));
    }

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(invalid_credentials());
    }

    info!(user_id = %user.id, "User logged in successfully");
    Ok(response::ok("Login successful", issue(&state, user)?))
}

/// POST /auth/refresh - Exchange a refresh token for a new pair.
///
/// The user is re-read so a changed role or a disabled account takes effect.
async fn refresh(
    State(state): State<AppState>,
    payload: Payload<RefreshRequest>,
) -> Result<Response, ApiError> {
    let payload = payload.into_inner()?;
    let claims = state
        .jwt_service
        .validate_token(&payload.refresh_token, TokenType::Refresh)?;

    let user = match state.users().find_by_id(claims.user_id()).await {
        Ok(user) => user,
        Err(RepositoryError::NotFound { .. }) => {
            return Err(ApiError(AppError::Unauthorized(
                "Invalid refresh token".to_string(),
            )));
        }
        Err(e) => return Err(e.into()),
    };
    if !user.is_active {
        return Err(ApiError(AppError::Unauthorized(
            "This account has been disabled".to_string(),
        )));
    }

    Ok(response::ok("Token refreshed", issue(&state, user)?))
}

/// GET /auth/me - The authenticated user.
async fn me(State(state): State<AppState>, auth: AuthUser) -> Result<Response, ApiError> {
    let user = state.users().find_by_id(auth.user_id()).await?;
    Ok(response::ok("User retrieved", user_info(user)))
}
