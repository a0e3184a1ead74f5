//! Report routes. Every report is readable by any authenticated role.

use axum::{Router, extract::State, response::Response, routing::get};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    AppState,
    error::ApiError,
    extractors::{IdPath, Params},
    middleware::AuthUser,
    response,
};
use zakat_core::auth::{Action, Resource};
use zakat_core::reports::{DistributionSummaryQuery, IncomeSummaryQuery, ReportRange};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/income-summary", get(income_summary))
        .route("/reports/distribution-summary", get(distribution_summary))
        .route("/reports/fund-balance", get(fund_balance))
        .route("/reports/beneficiary-history/{id}", get(beneficiary_history))
}

/// Query parameters shared by the reports.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// Start date (inclusive, YYYY-MM-DD).
    pub date_from: Option<NaiveDate>,
    /// End date (inclusive, YYYY-MM-DD).
    pub date_to: Option<NaiveDate>,
    /// `daily`/`monthly` for income, `asnaf`/`program` for distributions.
    pub group_by: Option<String>,
    /// Distribution summary only.
    pub source_fund_type: Option<String>,
}

/// GET /reports/income-summary
async fn income_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    params: Params<ReportQuery>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Report, Action::Read)?;
    let query = params.into_inner()?;
    let query =
        IncomeSummaryQuery::parse(query.date_from, query.date_to, query.group_by.as_deref())?;

    let report = state.reports().income_summary(query).await?;
    Ok(response::ok("Income summary retrieved", report))
}

/// GET /reports/distribution-summary
async fn distribution_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    params: Params<ReportQuery>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Report, Action::Read)?;
    let query = params.into_inner()?;
    let query = DistributionSummaryQuery::parse(
        query.date_from,
        query.date_to,
        query.group_by.as_deref(),
        query.source_fund_type.as_deref(),
    )?;

    let report = state.reports().distribution_summary(query).await?;
    Ok(response::ok("Distribution summary retrieved", report))
}

/// GET /reports/fund-balance
async fn fund_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    params: Params<ReportQuery>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Report, Action::Read)?;
    let query = params.into_inner()?;
    let range = ReportRange::new(query.date_from, query.date_to)?;

    let report = state.reports().fund_balance(range).await?;
    Ok(response::ok("Fund balance retrieved", report))
}

/// GET /reports/beneficiary-history/{id}
async fn beneficiary_history(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Report, Action::Read)?;
    let history = state.reports().beneficiary_history(id.into_inner()?).await?;
    Ok(response::ok("Beneficiary history retrieved", history))
}
