//! Beneficiary (mustahiq) routes.

use axum::{Router, extract::State, response::Response, routing::get};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extractors::{IdPath, Params, Payload, page_request},
    middleware::AuthUser,
    response,
};
use zakat_core::auth::{Action, Resource};
use zakat_core::validation::{BeneficiaryInput, parse_filter};
use zakat_db::repositories::BeneficiaryFilter;

/// Creates the beneficiary routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/beneficiaries", get(list_beneficiaries).post(create_beneficiary))
        .route(
            "/beneficiaries/{id}",
            get(get_beneficiary)
                .put(update_beneficiary)
                .delete(delete_beneficiary),
        )
}

/// Query parameters for listing beneficiaries.
#[derive(Debug, Default, Deserialize)]
pub struct ListBeneficiariesQuery {
    /// Search over name, phone and address.
    pub q: Option<String>,
    /// `active`, `inactive` or `pending`.
    pub status: Option<String>,
    /// Only this category.
    pub category_id: Option<Uuid>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Rows per page.
    pub per_page: Option<u32>,
}

async fn list_beneficiaries(
    State(state): State<AppState>,
    auth: AuthUser,
    params: Params<ListBeneficiariesQuery>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Beneficiary, Action::Read)?;
    let query = params.into_inner()?;

    let filter = BeneficiaryFilter {
        q: query.q,
        status: parse_filter("status", query.status.as_deref())?,
        category_id: query.category_id,
    };
    let page = state
        .beneficiaries()
        .list(&filter, page_request(query.page, query.per_page))
        .await?;
    Ok(response::page("Beneficiaries retrieved", page))
}

async fn create_beneficiary(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Payload<BeneficiaryInput>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Beneficiary, Action::Create)?;
    let draft = payload.into_inner()?.into_draft()?;

    let view = state.beneficiaries().create(draft).await?;
    info!(
        beneficiary_id = %view.beneficiary.id,
        user_id = %auth.user_id(),
        "Beneficiary created"
    );
    Ok(response::created("Beneficiary created", view))
}

async fn get_beneficiary(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Beneficiary, Action::Read)?;
    let view = state.beneficiaries().find_by_id(id.into_inner()?).await?;
    Ok(response::ok("Beneficiary retrieved", view))
}

async fn update_beneficiary(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
    payload: Payload<BeneficiaryInput>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Beneficiary, Action::Update)?;
    let id = id.into_inner()?;
    let draft = payload.into_inner()?.into_draft()?;

    let view = state.beneficiaries().update(id, draft).await?;
    info!(
        beneficiary_id = %id,
        status = ?view.beneficiary.status,
        "Beneficiary updated"
    );
    Ok(response::ok("Beneficiary updated", view))
}

async fn delete_beneficiary(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Beneficiary, Action::Delete)?;
    let id = id.into_inner()?;

    state.beneficiaries().delete(id).await?;
    info!(beneficiary_id = %id, user_id = %auth.user_id(), "Beneficiary deleted");
    Ok(response::deleted("Beneficiary deleted"))
}
