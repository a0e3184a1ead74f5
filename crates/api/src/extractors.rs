//! Request extractors.
//!
//! Body and query parsing failures are held back until the handler asks for
//! the value, so the role policy is always checked first and a forbidden
//! caller never learns whether their payload would have parsed.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use zakat_shared::AppError;
use zakat_shared::types::PageRequest;

/// JSON body whose parse result is read with [`Payload::into_inner`].
#[derive(Debug)]
pub struct Payload<T>(Result<T, AppError>);

impl<T> Payload<T> {
    /// Returns the body or a validation error describing why it did not parse.
    pub fn into_inner(self) -> Result<T, AppError> {
        self.0
    }
}

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = std::convert::Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            Json::<T>::from_request(req, state)
                .await
                .map(|Json(value)| value)
                .map_err(|e| AppError::invalid_field("body", "json", e.body_text())),
        ))
    }
}

/// Query string whose parse result is read with [`Params::into_inner`].
#[derive(Debug)]
pub struct Params<T>(Result<T, AppError>);

impl<T> Params<T> {
    /// Returns the parameters or a validation error.
    pub fn into_inner(self) -> Result<T, AppError> {
        self.0
    }
}

impl<S, T> FromRequestParts<S> for Params<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            Query::<T>::from_request_parts(parts, state)
                .await
                .map(|Query(value)| value)
                .map_err(|e| AppError::invalid_field("query", "format", e.body_text())),
        ))
    }
}

/// The `{id}` path segment.
#[derive(Debug)]
pub struct IdPath(Result<Uuid, AppError>);

impl IdPath {
    /// Returns the id or a validation error for a malformed one.
    pub fn into_inner(self) -> Result<Uuid, AppError> {
        self.0
    }
}

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            Path::<Uuid>::from_request_parts(parts, state)
                .await
                .map(|Path(id)| id)
                .map_err(|e| AppError::invalid_field("id", "format", e.body_text())),
        ))
    }
}

/// Builds a normalized page request from optional `page`/`per_page` values.
///
/// Query structs carry these two fields inline; `serde(flatten)` would route
/// them through an untyped buffer where numbers no longer parse.
#[must_use]
pub fn page_request(page: Option<u32>, per_page: Option<u32>) -> PageRequest {
    let defaults = PageRequest::default();
    PageRequest::new(
        page.unwrap_or(defaults.page),
        per_page.unwrap_or(defaults.per_page),
    )
}
