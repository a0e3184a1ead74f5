//! Beneficiary category (asnaf) routes.

use axum::{Router, extract::State, response::Response, routing::get};
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState,
    error::ApiError,
    extractors::{IdPath, Params, Payload, page_request},
    middleware::AuthUser,
    response,
};
use zakat_core::auth::{Action, Resource};
use zakat_core::validation::CategoryInput;
use zakat_db::repositories::CategoryFilter;

/// Creates the category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
}

/// Query parameters for listing categories.
#[derive(Debug, Default, Deserialize)]
pub struct ListCategoriesQuery {
    /// Search over the name.
    pub q: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Rows per page.
    pub per_page: Option<u32>,
}

async fn list_categories(
    State(state): State<AppState>,
    auth: AuthUser,
    params: Params<ListCategoriesQuery>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Category, Action::Read)?;
    let query = params.into_inner()?;

    let page = state
        .categories()
        .list(
            &CategoryFilter { q: query.q },
            page_request(query.page, query.per_page),
        )
        .await?;
    Ok(response::page("Categories retrieved", page))
}

async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Payload<CategoryInput>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Category, Action::Create)?;
    let draft = payload.into_inner()?.into_draft()?;

    let category = state.categories().create(draft).await?;
    info!(category_id = %category.id, name = %category.name, "Category created");
    Ok(response::created("Category created", category))
}

async fn get_category(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Category, Action::Read)?;
    let category = state.categories().find_by_id(id.into_inner()?).await?;
    Ok(response::ok("Category retrieved", category))
}

async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
    payload: Payload<CategoryInput>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Category, Action::Update)?;
    let id = id.into_inner()?;
    let draft = payload.into_inner()?.into_draft()?;

    let category = state.categories().update(id, draft).await?;
    info!(category_id = %id, "Category updated");
    Ok(response::ok("Category updated", category))
}

async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Category, Action::Delete)?;
    let id = id.into_inner()?;

    state.categories().delete(id).await?;
    info!(category_id = %id, user_id = %auth.user_id(), "Category deleted");
    Ok(response::deleted("Category deleted"))
}
