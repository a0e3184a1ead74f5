//! Existence checks for the foreign rows a write depends on.

use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};
use zakat_core::references::Reference;

use super::RepositoryError;
use crate::entities::{beneficiaries, categories, donors, programs};

/// Fails with the first reference that does not resolve.
///
/// Run inside the write's transaction, before its first mutating statement.
pub(crate) async fn ensure_exist<C: ConnectionTrait>(
    conn: &C,
    references: &[Reference],
) -> Result<(), RepositoryError> {
    for reference in references {
        let found = match *reference {
            Reference::Donor(id) => donors::Entity::find_by_id(id).count(conn).await?,
            Reference::Beneficiary(id) => beneficiaries::Entity::find_by_id(id).count(conn).await?,
            Reference::Program(id) => programs::Entity::find_by_id(id).count(conn).await?,
            Reference::Category(id) => categories::Entity::find_by_id(id).count(conn).await?,
        };
        if found == 0 {
            tracing::warn!(%reference, "write rejected: missing reference");
            return Err(RepositoryError::ReferenceNotFound(*reference));
        }
    }
    Ok(())
}
