//! Donor (muzakki) repository.

use std::time::Duration;

use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use uuid::Uuid;
use zakat_core::validation::DonorDraft;
use zakat_shared::types::{PageRequest, PageResponse};

use super::RepositoryError;
use super::search::{col, contains_any, fetch_page};
use crate::entities::donors;
use crate::{DEFAULT_STATEMENT_TIMEOUT, bounded};

const ENTITY: &str = "donor";

/// Filter options for listing donors.
#[derive(Debug, Clone, Default)]
pub struct DonorFilter {
    /// Matches name, phone or address, case-insensitively.
    pub q: Option<String>,
}

/// Donor repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct DonorRepository {
    db: DatabaseConnection,
    timeout: Duration,
}

impl DonorRepository {
    /// Creates a new donor repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            timeout: DEFAULT_STATEMENT_TIMEOUT,
        }
    }

    /// Overrides the per-operation deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn list_query(filter: &DonorFilter) -> Select<donors::Entity> {
        let mut query = donors::Entity::find()
            .order_by_asc(donors::Column::Name)
            .order_by_asc(donors::Column::Id);

        if let Some(search) = contains_any(
            filter.q.as_deref(),
            vec![
                col(donors::Entity, donors::Column::Name),
                col(donors::Entity, donors::Column::Phone),
                col(donors::Entity, donors::Column::Address),
            ],
        ) {
            query = query.filter(search);
        }
        query
    }

    /// Lists donors one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or times out.
    pub async fn list(
        &self,
        filter: &DonorFilter,
        page: PageRequest,
    ) -> Result<PageResponse<donors::Model>, RepositoryError> {
        let query = Self::list_query(filter);
        let (rows, total) = bounded(self.timeout, async {
            Ok(fetch_page(query, page, &self.db).await?)
        })
        .await?;
        Ok(PageResponse::new(rows, page, total))
    }

    /// Finds a donor by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no donor has this id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<donors::Model, RepositoryError> {
        bounded(self.timeout, async {
            donors::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .ok_or(RepositoryError::NotFound { entity: ENTITY, id })
        })
        .await
    }

    /// Creates a donor.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the phone number is taken.
    pub async fn create(&self, draft: DonorDraft) -> Result<donors::Model, RepositoryError> {
        let now = chrono::Utc::now().into();
        let donor = donors::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(draft.name),
            phone: Set(draft.phone),
            address: Set(draft.address),
            notes: Set(draft.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        bounded(self.timeout, async {
            donor
                .insert(&self.db)
                .await
                .map_err(|e| RepositoryError::on_write(e, ENTITY, "phone"))
        })
        .await
    }

    /// Replaces a donor's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id and
    /// `RepositoryError::Duplicate` if the phone number is taken.
    pub async fn update(&self, id: Uuid, draft: DonorDraft) -> Result<donors::Model, RepositoryError> {
        let donor = donors::ActiveModel {
            id: Unchanged(id),
            name: Set(draft.name),
            phone: Set(draft.phone),
            address: Set(draft.address),
            notes: Set(draft.notes),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        bounded(self.timeout, async {
            donor
                .update(&self.db)
                .await
                .map_err(|e| RepositoryError::on_update(e, ENTITY, id, "phone"))
        })
        .await
    }

    /// Deletes a donor that has no receipts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id and
    /// `RepositoryError::InUse` while receipts still reference the donor.
    pub async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        bounded(self.timeout, async {
            let result = donors::Entity::delete_by_id(id)
                .exec(&self.db)
                .await
                .map_err(|e| RepositoryError::on_delete(e, ENTITY, id))?;
            if result.rows_affected == 0 {
                return Err(RepositoryError::NotFound { entity: ENTITY, id });
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, QueryTrait};

    use super::*;

    #[test]
    fn test_unfiltered_list_orders_by_name() {
        let sql = DonorRepository::list_query(&DonorFilter::default())
            .build(DbBackend::Postgres)
            .sql;

        assert!(!sql.contains("WHERE"));
        assert!(sql.contains(r#"ORDER BY "donors"."name" ASC, "donors"."id" ASC"#));
    }

    #[test]
    fn test_search_covers_name_phone_and_address() {
        let filter = DonorFilter {
            q: Some("Bandung".to_string()),
        };
        let sql = DonorRepository::list_query(&filter)
            .build(DbBackend::Postgres)
            .sql;

        for column in ["name", "phone", "address"] {
            assert!(sql.contains(&format!(r#"LOWER("donors"."{column}")"#)), "{sql}");
        }
    }
}
