//! Success responses in the JSON envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use zakat_shared::types::{PageMeta, PageResponse};

/// `{ success: true, message, data, meta? }`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Always true.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Payload.
    pub data: T,
    /// Pagination, on list responses only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

fn respond<T: Serialize>(
    status: StatusCode,
    message: impl Into<String>,
    data: T,
    meta: Option<PageMeta>,
) -> Response {
    let body = Envelope {
        success: true,
        message: message.into(),
        data,
        meta,
    };
    (status, Json(body)).into_response()
}

/// 200 with `data`.
pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> Response {
    respond(StatusCode::OK, message, data, None)
}

/// 201 with the created resource.
pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> Response {
    respond(StatusCode::CREATED, message, data, None)
}

/// 200 with one page of rows and its `meta`.
pub fn page<T: Serialize>(message: impl Into<String>, page: PageResponse<T>) -> Response {
    respond(StatusCode::OK, message, page.data, Some(page.meta))
}

/// 200 with `data: null`.
pub fn deleted(message: impl Into<String>) -> Response {
    respond(StatusCode::OK, message, (), None)
}
