//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - Authentication middleware and the role policy gate
//! - Request extractors that report failures in the JSON envelope
//! - Response types

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod routes;

pub use error::ApiError;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::HeaderValue;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use zakat_db::{
    BeneficiaryRepository, CategoryRepository, DEFAULT_STATEMENT_TIMEOUT, DistributionRepository,
    DonorRepository, ProgramRepository, ReceiptRepository, ReportRepository, UserRepository,
};
use zakat_shared::JwtService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Deadline applied to every storage operation.
    pub storage_timeout: Duration,
}

impl AppState {
    /// Creates state with the default storage deadline.
    #[must_use]
    pub fn new(db: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service),
            storage_timeout: DEFAULT_STATEMENT_TIMEOUT,
        }
    }

    /// Overrides the storage deadline.
    #[must_use]
    pub const fn with_storage_timeout(mut self, timeout: Duration) -> Self {
        self.storage_timeout = timeout;
        self
    }

    fn conn(&self) -> DatabaseConnection {
        (*self.db).clone()
    }

    pub(crate) fn donors(&self) -> DonorRepository {
        DonorRepository::new(self.conn()).with_timeout(self.storage_timeout)
    }

    pub(crate) fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.conn()).with_timeout(self.storage_timeout)
    }

    pub(crate) fn beneficiaries(&self) -> BeneficiaryRepository {
        BeneficiaryRepository::new(self.conn()).with_timeout(self.storage_timeout)
    }

    pub(crate) fn programs(&self) -> ProgramRepository {
        ProgramRepository::new(self.conn()).with_timeout(self.storage_timeout)
    }

    pub(crate) fn receipts(&self) -> ReceiptRepository {
        ReceiptRepository::new(self.conn()).with_timeout(self.storage_timeout)
    }

    pub(crate) fn distributions(&self) -> DistributionRepository {
        DistributionRepository::new(self.conn()).with_timeout(self.storage_timeout)
    }

    pub(crate) fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.conn()).with_timeout(self.storage_timeout)
    }

    pub(crate) fn users(&self) -> UserRepository {
        UserRepository::new(self.conn()).with_timeout(self.storage_timeout)
    }
}

/// Creates the main application router.
///
/// An empty `cors_origins` list allows any origin.
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}
