//! Beneficiary category (asnaf) repository.

use std::time::Duration;

use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use uuid::Uuid;
use zakat_core::validation::CategoryDraft;
use zakat_shared::types::{PageRequest, PageResponse};

use super::RepositoryError;
use super::search::{col, contains_any, fetch_page};
use crate::entities::categories;
use crate::{DEFAULT_STATEMENT_TIMEOUT, bounded};

const ENTITY: &str = "category";

/// Filter options for listing categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    /// Matches the name, case-insensitively.
    pub q: Option<String>,
}

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
    timeout: Duration,
}

impl CategoryRepository {
    /// Creates a new category repository.
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

    pub(crate) fn list_query(filter: &CategoryFilter) -> Select<categories::Entity> {
        let mut query = categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .order_by_asc(categories::Column::Id);

        if let Some(search) = contains_any(
            filter.q.as_deref(),
            vec![col(categories::Entity, categories::Column::Name)],
        ) {
            query = query.filter(search);
        }
        query
    }

    /// Lists categories one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or times out.
    pub async fn list(
        &self,
        filter: &CategoryFilter,
        page: PageRequest,
    ) -> Result<PageResponse<categories::Model>, RepositoryError> {
        let query = Self::list_query(filter);
        let (rows, total) = bounded(self.timeout, async {
            Ok(fetch_page(query, page, &self.db).await?)
        })
        .await?;
        Ok(PageResponse::new(rows, page, total))
    }

    /// Finds a category by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no category has this id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<categories::Model, RepositoryError> {
        bounded(self.timeout, async {
            categories::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .ok_or(RepositoryError::NotFound { entity: ENTITY, id })
        })
        .await
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the name is taken.
    pub async fn create(&self, draft: CategoryDraft) -> Result<categories::Model, RepositoryError> {
        let now = chrono::Utc::now().into();
        let category = categories::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(draft.name),
            description: Set(draft.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        bounded(self.timeout, async {
            category
                .insert(&self.db)
                .await
                .map_err(|e| RepositoryError::on_write(e, ENTITY, "name"))
        })
        .await
    }

    /// Replaces a category's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id and
    /// `RepositoryError::Duplicate` if the name is taken.
    pub async fn update(
        &self,
        id: Uuid,
        draft: CategoryDraft,
    ) -> Result<categories::Model, RepositoryError> {
        let category = categories::ActiveModel {
            id: Unchanged(id),
            name: Set(draft.name),
            description: Set(draft.description),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        bounded(self.timeout, async {
            category
                .update(&self.db)
                .await
                .map_err(|e| RepositoryError::on_update(e, ENTITY, id, "name"))
        })
        .await
    }

    /// Deletes a category no beneficiary belongs to.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id and
    /// `RepositoryError::InUse` while beneficiaries still reference it.
    pub async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        bounded(self.timeout, async {
            let result = categories::Entity::delete_by_id(id)
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
