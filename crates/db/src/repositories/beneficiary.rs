//! Beneficiary (mustahiq) repository.

use std::time::Duration;

use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SelectTwo, Set,
};
use serde::Serialize;
use uuid::Uuid;
use zakat_core::fund::BeneficiaryStatus;
use zakat_core::references::Reference;
use zakat_core::validation::BeneficiaryDraft;
use zakat_shared::types::{PageRequest, PageResponse};

use super::RepositoryError;
use super::references::ensure_exist;
use super::search::{col, contains_any};
use crate::entities::{beneficiaries, categories, sea_orm_active_enums};
use crate::{DEFAULT_STATEMENT_TIMEOUT, bounded};

const ENTITY: &str = "beneficiary";

/// Filter options for listing beneficiaries.
#[derive(Debug, Clone, Default)]
pub struct BeneficiaryFilter {
    /// Matches name, phone or address, case-insensitively.
    pub q: Option<String>,
    /// Exact status.
    pub status: Option<BeneficiaryStatus>,
    /// Exact category.
    pub category_id: Option<Uuid>,
}

/// A beneficiary with its category name.
#[derive(Debug, Clone, Serialize)]
pub struct BeneficiaryView {
    /// The beneficiary record.
    #[serde(flatten)]
    pub beneficiary: beneficiaries::Model,
    /// Name of the category it belongs to.
    pub category_name: Option<String>,
}

impl From<(beneficiaries::Model, Option<categories::Model>)> for BeneficiaryView {
    fn from((beneficiary, category): (beneficiaries::Model, Option<categories::Model>)) -> Self {
        Self {
            beneficiary,
            category_name: category.map(|c| c.name),
        }
    }
}

/// Beneficiary repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct BeneficiaryRepository {
    db: DatabaseConnection,
    timeout: Duration,
}

impl BeneficiaryRepository {
    /// Creates a new beneficiary repository.
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

    pub(crate) fn list_query(
        filter: &BeneficiaryFilter,
    ) -> SelectTwo<beneficiaries::Entity, categories::Entity> {
        let mut query = beneficiaries::Entity::find()
            .find_also_related(categories::Entity)
            .order_by_asc(beneficiaries::Column::Name)
            .order_by_asc(beneficiaries::Column::Id);

        if let Some(search) = contains_any(
            filter.q.as_deref(),
            vec![
                col(beneficiaries::Entity, beneficiaries::Column::Name),
                col(beneficiaries::Entity, beneficiaries::Column::Phone),
                col(beneficiaries::Entity, beneficiaries::Column::Address),
            ],
        ) {
            query = query.filter(search);
        }
        if let Some(status) = filter.status {
            query = query.filter(
                beneficiaries::Column::Status.eq(sea_orm_active_enums::BeneficiaryStatus::from(status)),
            );
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(beneficiaries::Column::CategoryId.eq(category_id));
        }
        query
    }

    /// Lists beneficiaries one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or times out.
    pub async fn list(
        &self,
        filter: &BeneficiaryFilter,
        page: PageRequest,
    ) -> Result<PageResponse<BeneficiaryView>, RepositoryError> {
        let query = Self::list_query(filter);
        let (rows, total) = bounded(self.timeout, async {
            let total = query.clone().count(&self.db).await?;
            let rows = query
                .offset(page.offset())
                .limit(page.limit())
                .all(&self.db)
                .await?;
            Ok((rows, total))
        })
        .await?;

        let rows = rows.into_iter().map(BeneficiaryView::from).collect();
        Ok(PageResponse::new(rows, page, total))
    }

    /// Finds a beneficiary by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no beneficiary has this id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<BeneficiaryView, RepositoryError> {
        bounded(self.timeout, async {
            beneficiaries::Entity::find_by_id(id)
                .find_also_related(categories::Entity)
                .one(&self.db)
                .await?
                .map(BeneficiaryView::from)
                .ok_or(RepositoryError::NotFound { entity: ENTITY, id })
        })
        .await
    }

    /// Creates a beneficiary in an existing category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ReferenceNotFound` for an unknown category and
    /// `RepositoryError::Duplicate` if the phone number is taken.
    pub async fn create(&self, draft: BeneficiaryDraft) -> Result<BeneficiaryView, RepositoryError> {
        let category = [Reference::Category(draft.category_id)];
        let now = chrono::Utc::now().into();
        let id = Uuid::now_v7();
        let beneficiary = beneficiaries::ActiveModel {
            id: Set(id),
            name: Set(draft.name),
            phone: Set(draft.phone),
            address: Set(draft.address),
            category_id: Set(draft.category_id),
            status: Set(draft.status.into()),
            description: Set(draft.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        bounded(self.timeout, async {
            ensure_exist(&self.db, &category).await?;
            beneficiary
                .insert(&self.db)
                .await
                .map_err(|e| RepositoryError::on_write(e, ENTITY, "phone"))
        })
        .await?;

        self.find_by_id(id).await
    }

    /// Replaces a beneficiary's fields, including its status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id,
    /// `RepositoryError::ReferenceNotFound` for an unknown category and
    /// `RepositoryError::Duplicate` if the phone number is taken.
    pub async fn update(
        &self,
        id: Uuid,
        draft: BeneficiaryDraft,
    ) -> Result<BeneficiaryView, RepositoryError> {
        let category = [Reference::Category(draft.category_id)];
        let beneficiary = beneficiaries::ActiveModel {
            id: Unchanged(id),
            name: Set(draft.name),
            phone: Set(draft.phone),
            address: Set(draft.address),
            category_id: Set(draft.category_id),
            status: Set(draft.status.into()),
            description: Set(draft.description),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        bounded(self.timeout, async {
            ensure_exist(&self.db, &category).await?;
            beneficiary
                .update(&self.db)
                .await
                .map_err(|e| RepositoryError::on_update(e, ENTITY, id, "phone"))
        })
        .await?;

        self.find_by_id(id).await
    }

    /// Deletes a beneficiary that never received a distribution.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id and
    /// `RepositoryError::InUse` while distribution items still reference it.
    pub async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        bounded(self.timeout, async {
            let result = beneficiaries::Entity::delete_by_id(id)
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
    fn test_list_joins_category() {
        let sql = BeneficiaryRepository::list_query(&BeneficiaryFilter::default())
            .build(DbBackend::Postgres)
            .sql;

        assert!(sql.contains(r#"LEFT JOIN "categories""#), "{sql}");
    }

    #[test]
    fn test_status_filter_casts_to_enum() {
        let filter = BeneficiaryFilter {
            status: Some(BeneficiaryStatus::Active),
            ..BeneficiaryFilter::default()
        };
        let stmt = BeneficiaryRepository::list_query(&filter).build(DbBackend::Postgres);

        assert!(stmt.sql.contains("beneficiary_status"), "{}", stmt.sql);
    }
}
