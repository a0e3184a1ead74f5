//! Distribution routes.

use axum::{Router, extract::State, response::Response, routing::get};
use chrono::NaiveDate;
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
use zakat_core::validation::{DistributionInput, check_date_range, parse_filter};
use zakat_db::repositories::DistributionFilter;

/// Creates the distribution routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/distributions", get(list_distributions).post(create_distribution))
        .route(
            "/distributions/{id}",
            get(get_distribution)
                .put(update_distribution)
                .delete(delete_distribution),
        )
}

/// Query parameters for listing distributions.
#[derive(Debug, Default, Deserialize)]
pub struct ListDistributionsQuery {
    /// Search over program name and notes.
    pub q: Option<String>,
    /// Start date filter (inclusive, YYYY-MM-DD).
    pub date_from: Option<NaiveDate>,
    /// End date filter (inclusive, YYYY-MM-DD).
    pub date_to: Option<NaiveDate>,
    /// Bucket the money was drawn from.
    pub source_fund_type: Option<String>,
    /// Only this program.
    pub program_id: Option<Uuid>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Rows per page.
    pub per_page: Option<u32>,
}

impl ListDistributionsQuery {
    fn into_filter(self) -> Result<DistributionFilter, ApiError> {
        check_date_range(self.date_from, self.date_to)?;
        Ok(DistributionFilter {
            q: self.q,
            date_from: self.date_from,
            date_to: self.date_to,
            source_fund_type: parse_filter("source_fund_type", self.source_fund_type.as_deref())?,
            program_id: self.program_id,
        })
    }
}

async fn list_distributions(
    State(state): State<AppState>,
    auth: AuthUser,
    params: Params<ListDistributionsQuery>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Distribution, Action::Read)?;
    let query = params.into_inner()?;
    let page = page_request(query.page, query.per_page);
    let filter = query.into_filter()?;

    let distributions = state.distributions().list(&filter, page).await?;
    Ok(response::page("Distributions retrieved", distributions))
}

async fn create_distribution(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Payload<DistributionInput>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Distribution, Action::Create)?;
    let draft = payload.into_inner()?.into_draft()?;

    let distribution = state.distributions().create(draft, auth.user_id()).await?;
    info!(
        distribution_id = %distribution.distribution.id,
        total_amount = %distribution.distribution.total_amount,
        items = distribution.items.len(),
        user_id = %auth.user_id(),
        "Distribution created"
    );
    Ok(response::created("Distribution created", distribution))
}

async fn get_distribution(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Distribution, Action::Read)?;
    let distribution = state.distributions().find_by_id(id.into_inner()?).await?;
    Ok(response::ok("Distribution retrieved", distribution))
}

async fn update_distribution(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
    payload: Payload<DistributionInput>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Distribution, Action::Update)?;
    let id = id.into_inner()?;
    let draft = payload.into_inner()?.into_draft()?;

    let distribution = state.distributions().update(id, draft).await?;
    info!(
        distribution_id = %id,
        total_amount = %distribution.distribution.total_amount,
        items = distribution.items.len(),
        user_id = %auth.user_id(),
        "Distribution updated"
    );
    Ok(response::ok("Distribution updated", distribution))
}

async fn delete_distribution(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Distribution, Action::Delete)?;
    let id = id.into_inner()?;

    state.distributions().delete(id).await?;
    info!(distribution_id = %id, user_id = %auth.user_id(), "Distribution deleted");
    Ok(response::deleted("Distribution deleted"))
}
