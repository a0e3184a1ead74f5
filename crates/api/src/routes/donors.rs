//! Donor (muzakki) routes.

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
use zakat_core::validation::DonorInput;
use zakat_db::repositories::DonorFilter;

/// Creates the donor routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/donors", get(list_donors).post(create_donor))
        .route(
            "/donors/{id}",
            get(get_donor).put(update_donor).delete(delete_donor),
        )
}

/// Query parameters for listing donors.
#[derive(Debug, Default, Deserialize)]
pub struct ListDonorsQuery {
    /// Search over name, phone and address.
    pub q: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Rows per page.
    pub per_page: Option<u32>,
}

/// GET /donors
async fn list_donors(
    State(state): State<AppState>,
    auth: AuthUser,
    params: Params<ListDonorsQuery>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Donor, Action::Read)?;
    let query = params.into_inner()?;

    let filter = DonorFilter { q: query.q };
    let page = state
        .donors()
        .list(&filter, page_request(query.page, query.per_page))
        .await?;
    Ok(response::page("Donors retrieved", page))
}

/// POST /donors
async fn create_donor(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Payload<DonorInput>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Donor, Action::Create)?;
    let draft = payload.into_inner()?.into_draft()?;

    let donor = state.donors().create(draft).await?;
    info!(donor_id = %donor.id, user_id = %auth.user_id(), "Donor created");
    Ok(response::created("Donor created", donor))
}

/// GET /donors/{id}
async fn get_donor(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Donor, Action::Read)?;
    let donor = state.donors().find_by_id(id.into_inner()?).await?;
    Ok(response::ok("Donor retrieved", donor))
}

/// PUT /donors/{id}
async fn update_donor(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
    payload: Payload<DonorInput>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Donor, Action::Update)?;
    let id = id.into_inner()?;
    let draft = payload.into_inner()?.into_draft()?;

    let donor = state.donors().update(id, draft).await?;
    info!(donor_id = %id, user_id = %auth.user_id(), "Donor updated");
    Ok(response::ok("Donor updated", donor))
}

/// DELETE /donors/{id}
async fn delete_donor(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Donor, Action::Delete)?;
    let id = id.into_inner()?;

    state.donors().delete(id).await?;
    info!(donor_id = %id, user_id = %auth.user_id(), "Donor deleted");
    Ok(response::deleted("Donor deleted"))
}
