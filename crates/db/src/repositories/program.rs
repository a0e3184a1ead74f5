//! Distribution program repository.

use std::time::Duration;

use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Select, Set,
};
use uuid::Uuid;
use zakat_core::validation::ProgramDraft;
use zakat_shared::types::{PageRequest, PageResponse};

use super::RepositoryError;
use super::search::{col, contains_any, fetch_page};
use crate::entities::programs;
use crate::{DEFAULT_STATEMENT_TIMEOUT, bounded};

const ENTITY: &str = "program";

/// Filter options for listing programs.
#[derive(Debug, Clone, Default)]
pub struct ProgramFilter {
    /// Matches name or description, case-insensitively.
    pub q: Option<String>,
    /// Exact program type.
    pub program_type: Option<String>,
    /// Active flag.
    pub active: Option<bool>,
}

/// Program repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProgramRepository {
    db: DatabaseConnection,
    timeout: Duration,
}

impl ProgramRepository {
    /// Creates a new program repository.
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

    pub(crate) fn list_query(filter: &ProgramFilter) -> Select<programs::Entity> {
        let mut query = programs::Entity::find()
            .order_by_asc(programs::Column::Name)
            .order_by_asc(programs::Column::Id);

        if let Some(search) = contains_any(
            filter.q.as_deref(),
            vec![
                col(programs::Entity, programs::Column::Name),
                col(programs::Entity, programs::Column::Description),
            ],
        ) {
            query = query.filter(search);
        }
        if let Some(program_type) = filter
            .program_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            query = query.filter(programs::Column::ProgramType.eq(program_type));
        }
        if let Some(active) = filter.active {
            query = query.filter(programs::Column::Active.eq(active));
        }
        query
    }

    /// Lists programs one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or times out.
    pub async fn list(
        &self,
        filter: &ProgramFilter,
        page: PageRequest,
    ) -> Result<PageResponse<programs::Model>, RepositoryError> {
        let query = Self::list_query(filter);
        let (rows, total) = bounded(self.timeout, async {
            Ok(fetch_page(query, page, &self.db).await?)
        })
        .await?;
        Ok(PageResponse::new(rows, page, total))
    }

    /// Finds a program by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no program has this id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<programs::Model, RepositoryError> {
        bounded(self.timeout, async {
            programs::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .ok_or(RepositoryError::NotFound { entity: ENTITY, id })
        })
        .await
    }

    /// Creates a program.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails or times out.
    pub async fn create(&self, draft: ProgramDraft) -> Result<programs::Model, RepositoryError> {
        let now = chrono::Utc::now().into();
        let program = programs::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(draft.name),
            program_type: Set(draft.program_type),
            description: Set(draft.description),
            active: Set(draft.active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        bounded(self.timeout, async {
            program
                .insert(&self.db)
                .await
                .map_err(|e| RepositoryError::on_write(e, ENTITY, "name"))
        })
        .await
    }

    /// Replaces a program's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id.
    pub async fn update(
        &self,
        id: Uuid,
        draft: ProgramDraft,
    ) -> Result<programs::Model, RepositoryError> {
        let program = programs::ActiveModel {
            id: Unchanged(id),
            name: Set(draft.name),
            program_type: Set(draft.program_type),
            description: Set(draft.description),
            active: Set(draft.active),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        bounded(self.timeout, async {
            program
                .update(&self.db)
                .await
                .map_err(|e| RepositoryError::on_update(e, ENTITY, id, "name"))
        })
        .await
    }

    /// Deletes a program no distribution refers to.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id and
    /// `RepositoryError::InUse` while distributions still reference it.
    pub async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        bounded(self.timeout, async {
            let result = programs::Entity::delete_by_id(id)
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
