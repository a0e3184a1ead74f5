//! User repository for database operations.

use std::time::Duration;

use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Select, Set,
};
use uuid::Uuid;
use zakat_shared::Role;
use zakat_shared::types::{PageRequest, PageResponse};

use super::RepositoryError;
use super::search::{col, contains_any, fetch_page};
use crate::entities::{sea_orm_active_enums::UserRole, users};
use crate::{DEFAULT_STATEMENT_TIMEOUT, bounded};

const ENTITY: &str = "user";

/// Filter options for listing users.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Matches email or full name, case-insensitively.
    pub q: Option<String>,
    /// Exact role.
    pub role: Option<Role>,
}

/// User repository for account operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
    timeout: Duration,
}

impl UserRepository {
    /// Creates a new user repository.
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

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, RepositoryError> {
        bounded(self.timeout, async {
            Ok(users::Entity::find()
                .filter(users::Column::Email.eq(email))
                .one(&self.db)
                .await?)
        })
        .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<users::Model, RepositoryError> {
        bounded(self.timeout, async {
            users::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .ok_or(RepositoryError::NotFound { entity: ENTITY, id })
        })
        .await
    }

    /// Creates a new active user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the email is already registered.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        full_name: &str,
        role: Role,
    ) -> Result<users::Model, RepositoryError> {
        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            full_name: Set(full_name.to_string()),
            role: Set(role.into()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        bounded(self.timeout, async {
            user.insert(&self.db)
                .await
                .map_err(|e| RepositoryError::on_write(e, ENTITY, "email"))
        })
        .await
    }

    pub(crate) fn list_query(filter: &UserFilter) -> Select<users::Entity> {
        let mut query = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id);

        if let Some(search) = contains_any(
            filter.q.as_deref(),
            vec![
                col(users::Entity, users::Column::Email),
                col(users::Entity, users::Column::FullName),
            ],
        ) {
            query = query.filter(search);
        }
        if let Some(role) = filter.role {
            query = query.filter(users::Column::Role.eq(UserRole::from(role)));
        }
        query
    }

    /// Lists users one page at a time, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or times out.
    pub async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<PageResponse<users::Model>, RepositoryError> {
        let query = Self::list_query(filter);
        let (rows, total) = bounded(self.timeout, async {
            Ok(fetch_page(query, page, &self.db).await?)
        })
        .await?;
        Ok(PageResponse::new(rows, page, total))
    }

    /// Changes a user's role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has this id.
    pub async fn update_role(&self, id: Uuid, role: Role) -> Result<users::Model, RepositoryError> {
        let user = users::ActiveModel {
            id: Unchanged(id),
            role: Set(role.into()),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        bounded(self.timeout, async {
            user.update(&self.db)
                .await
                .map_err(|e| RepositoryError::on_update(e, ENTITY, id, "email"))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, QueryTrait};

    use super::*;

    #[test]
    fn test_role_filter() {
        let filter = UserFilter {
            role: Some(Role::Staff),
            ..UserFilter::default()
        };
        let stmt = UserRepository::list_query(&filter).build(DbBackend::Postgres);

        assert!(stmt.sql.contains(r#""users"."role" = "#), "{}", stmt.sql);
        assert!(stmt.sql.contains(r#"ORDER BY "users"."created_at" DESC"#));
    }
}
