//! Donation receipt routes.
//!
//! A receipt is written together with its items in one transaction; the
//! header total is always recomputed from the items.

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
use zakat_core::validation::{ReceiptInput, check_date_range, parse_filter};
use zakat_db::repositories::ReceiptFilter;

/// Creates the receipt routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/receipts", get(list_receipts).post(create_receipt))
        .route(
            "/receipts/{id}",
            get(get_receipt).put(update_receipt).delete(delete_receipt),
        )
}

/// Query parameters for listing receipts.
#[derive(Debug, Default, Deserialize)]
pub struct ListReceiptsQuery {
    /// Search over donor name and notes.
    pub q: Option<String>,
    /// Start date filter (inclusive, YYYY-MM-DD).
    pub date_from: Option<NaiveDate>,
    /// End date filter (inclusive, YYYY-MM-DD).
    pub date_to: Option<NaiveDate>,
    /// Receipts with at least one item of this fund type.
    pub fund_type: Option<String>,
    /// Receipts with at least one item of this zakat type.
    pub zakat_type: Option<String>,
    /// Exact payment method.
    pub payment_method: Option<String>,
    /// Only this donor.
    pub donor_id: Option<Uuid>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Rows per page.
    pub per_page: Option<u32>,
}

impl ListReceiptsQuery {
    fn into_filter(self) -> Result<ReceiptFilter, ApiError> {
        check_date_range(self.date_from, self.date_to)?;
        Ok(ReceiptFilter {
            q: self.q,
            date_from: self.date_from,
            date_to: self.date_to,
            fund_type: parse_filter("fund_type", self.fund_type.as_deref())?,
            zakat_type: parse_filter("zakat_type", self.zakat_type.as_deref())?,
            payment_method: self.payment_method,
            donor_id: self.donor_id,
        })
    }
}

async fn list_receipts(
    State(state): State<AppState>,
    auth: AuthUser,
    params: Params<ListReceiptsQuery>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Receipt, Action::Read)?;
    let query = params.into_inner()?;
    let page = page_request(query.page, query.per_page);
    let filter = query.into_filter()?;

    let receipts = state.receipts().list(&filter, page).await?;
    Ok(response::page("Receipts retrieved", receipts))
}

async fn create_receipt(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Payload<ReceiptInput>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Receipt, Action::Create)?;
    let draft = payload.into_inner()?.into_draft()?;

    let receipt = state.receipts().create(draft, auth.user_id()).await?;
    info!(
        receipt_id = %receipt.receipt.id,
        receipt_number = %receipt.receipt.receipt_number,
        total_amount = %receipt.receipt.total_amount,
        items = receipt.items.len(),
        user_id = %auth.user_id(),
        "Receipt created"
    );
    Ok(response::created("Receipt created", receipt))
}

async fn get_receipt(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Receipt, Action::Read)?;
    let receipt = state.receipts().find_by_id(id.into_inner()?).await?;
    Ok(response::ok("Receipt retrieved", receipt))
}

async fn update_receipt(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
    payload: Payload<ReceiptInput>,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Receipt, Action::Update)?;
    let id = id.into_inner()?;
    let draft = payload.into_inner()?.into_draft()?;

    let receipt = state.receipts().update(id, draft).await?;
    info!(
        receipt_id = %id,
        total_amount = %receipt.receipt.total_amount,
        items = receipt.items.len(),
        user_id = %auth.user_id(),
        "Receipt updated"
    );
    Ok(response::ok("Receipt updated", receipt))
}

async fn delete_receipt(
    State(state): State<AppState>,
    auth: AuthUser,
    id: IdPath,
) -> Result<Response, ApiError> {
    auth.authorize(Resource::Receipt, Action::Delete)?;
    let id = id.into_inner()?;

    state.receipts().delete(id).await?;
    info!(receipt_id = %id, user_id = %auth.user_id(), "Receipt deleted");
    Ok(response::deleted("Receipt deleted"))
}
