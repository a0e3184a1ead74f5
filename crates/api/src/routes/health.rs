//! Liveness and readiness checks. Both are public.

use axum::{Router, extract::State, response::Response, routing::get};
use serde::Serialize;
use zakat_db::RepositoryError;

use crate::{AppState, error::ApiError, response};

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

/// GET /health - The process is up.
async fn live() -> Response {
    response::ok(
        "Service is running",
        HealthStatus {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

/// GET /health/ready - The database answers a ping.
async fn ready(State(state): State<AppState>) -> Result<Response, ApiError> {
    state.db.ping().await.map_err(RepositoryError::from)?;
    Ok(response::ok(
        "Service is ready",
        HealthStatus {
            status: "ready",
            version: env!("CARGO_PKG_VERSION"),
        },
    ))
}

/// Health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(live))
        .route("/health/ready", get(ready))
}
