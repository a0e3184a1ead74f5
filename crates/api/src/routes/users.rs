//! User administration routes (admin only).

use axum::{
    Router,
    extract::State,
    response::Response,
    routing::{get, put},
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    AppState,
    error::ApiError,
    extractors::{IdPath, Params, Payload, page_request},
    middleware::AuthUser,
    response,
};
use zakat_core::auth::{Action, Resource};
use zakat_core::validation::{RoleUpdateInput, parse_filter};
use zakat_db::repositories::UserFilter;
use zakat_shared::AppError;

/// Creates the user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/role", put(update_role))
}

/// Query parameters for listing users.
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    /// Search over name and email.
    pub q: Option<String>,
    /// Only this role.
    pub role: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Rows per page.
    pub per_page: Option<u32>,
}

async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    params: Params<ListUsersQuery>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::User, Action::Read)?;
    let query = params.into_inner()?;

    let filter = UserFilter {
        q: query.q,
        role: parse_filter("role", query.role.as_deref())?,
    };
    let page = state
        .users()
        .list(&filter, page_request(query.page, query.per_page))
        .await?;
    Ok(response::page("Users retrieved", page))
}

async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::User, Action::Read)?;
    let user = state.users().find_by_id(id.into_inner()?).await?;
    Ok(response::ok("User retrieved", user))
}

/// PUT /users/{id}/role
async fn update_role(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
    payload: Payload<RoleUpdateInput>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::User, Action::Update)?;
    let id = id.into_inner()?;
    let role = payload.into_inner()?.into_role()?;

    if id == auth.user_id() {
        warn!(user_id = %id, "Admin attempted to change their own role");
        return Err(ApiError(AppError::Forbidden(
            "cannot change your own role".to_string(),
        )));
    }

    let user = state.users().update_role(id, role).await?;
    info!(user_id = %id, role = %role, changed_by = %auth.user_id(), "User role updated");
    Ok(response::ok("User role updated", user))
}
