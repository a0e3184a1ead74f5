//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for donors, beneficiaries, receipts and the rest
//! - Repositories that translate storage failures into [`RepositoryError`]
//! - The schema migration

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    BeneficiaryRepository, CategoryRepository, DistributionRepository, DonorRepository,
    ProgramRepository, ReceiptRepository, ReportRepository, RepositoryError, UserRepository,
};

use std::future::Future;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use zakat_shared::config::DatabaseConfig;

/// Statement budget used when a repository is built without an explicit one.
pub const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Establishes a pooled connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout())
        .acquire_timeout(config.connect_timeout())
        .sqlx_logging(false);

    Database::connect(options).await
}

/// Runs a storage operation under a deadline.
///
/// An elapsed deadline drops the future, which rolls back any open
/// transaction it owned.
pub(crate) async fn bounded<T, F>(timeout: Duration, operation: F) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    tokio::time::timeout(timeout, operation)
        .await
        .map_err(|_| RepositoryError::Timeout(timeout))?
}
