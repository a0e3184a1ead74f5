//! Distribution repository.
//!
//! Like receipts, a distribution and its items are written in a single
//! transaction after every program and beneficiary reference resolves.

use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SelectTwo, Set,
    TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;
use zakat_core::fund::FundBucket;
use zakat_core::validation::{DistributionDraft, DistributionItemDraft};
use zakat_shared::types::{PageRequest, PageResponse};

use super::RepositoryError;
use super::references::ensure_exist;
use super::search::{col, contains_any};
use crate::entities::{
    beneficiaries, distribution_items, distributions, programs, sea_orm_active_enums, users,
};
use crate::{DEFAULT_STATEMENT_TIMEOUT, bounded};

const ENTITY: &str = "distribution";

/// Filter options for listing distributions.
#[derive(Debug, Clone, Default)]
pub struct DistributionFilter {
    /// Matches the program name or the distribution notes, case-insensitively.
    pub q: Option<String>,
    /// Earliest distribution date, inclusive.
    pub date_from: Option<NaiveDate>,
    /// Latest distribution date, inclusive.
    pub date_to: Option<NaiveDate>,
    /// Bucket the money was drawn from.
    pub source_fund_type: Option<FundBucket>,
    /// Distributions under this program.
    pub program_id: Option<Uuid>,
}

/// Distribution list row.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionSummary {
    /// The distribution header.
    #[serde(flatten)]
    pub distribution: distributions::Model,
    /// Program name, if the distribution belongs to one.
    pub program_name: Option<String>,
    /// Distinct beneficiaries served.
    pub beneficiary_count: i64,
}

/// A distribution item with the beneficiary's name.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionItemView {
    /// The item record.
    #[serde(flatten)]
    pub item: distribution_items::Model,
    /// Beneficiary name.
    pub beneficiary_name: Option<String>,
}

/// A distribution with its program, creator and items in line order.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionDetail {
    /// The distribution header.
    #[serde(flatten)]
    pub distribution: distributions::Model,
    /// Program name, if any.
    pub program_name: Option<String>,
    /// Name of the user who recorded the distribution.
    pub created_by_name: Option<String>,
    /// Items ordered by `line_no`.
    pub items: Vec<DistributionItemView>,
}

#[derive(Debug, FromQueryResult)]
struct BeneficiaryCount {
    distribution_id: Uuid,
    beneficiary_count: i64,
}

/// Distribution repository.
#[derive(Debug, Clone)]
pub struct DistributionRepository {
    db: DatabaseConnection,
    timeout: Duration,
}

impl DistributionRepository {
    /// Creates a new distribution repository.
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

    /// Newest first; ties broken by creation time, then id.
    pub(crate) fn list_query(
        filter: &DistributionFilter,
    ) -> SelectTwo<distributions::Entity, programs::Entity> {
        let mut query = distributions::Entity::find()
            .find_also_related(programs::Entity)
            .order_by_desc(distributions::Column::DistributionDate)
            .order_by_desc(distributions::Column::CreatedAt)
            .order_by_desc(distributions::Column::Id);

        if let Some(search) = contains_any(
            filter.q.as_deref(),
            vec![
                col(programs::Entity, programs::Column::Name),
                col(distributions::Entity, distributions::Column::Notes),
            ],
        ) {
            query = query.filter(search);
        }
        if let Some(from) = filter.date_from {
            query = query.filter(distributions::Column::DistributionDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(distributions::Column::DistributionDate.lte(to));
        }
        if let Some(bucket) = filter.source_fund_type {
            query = query.filter(
                distributions::Column::SourceFundType
                    .eq(sea_orm_active_enums::SourceFundType::from(bucket)),
            );
        }
        if let Some(program_id) = filter.program_id {
            query = query.filter(distributions::Column::ProgramId.eq(program_id));
        }
        query
    }

    /// Lists distributions one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or times out.
    pub async fn list(
        &self,
        filter: &DistributionFilter,
        page: PageRequest,
    ) -> Result<PageResponse<DistributionSummary>, RepositoryError> {
        let query = Self::list_query(filter);
        let (rows, counts, total) = bounded(self.timeout, async {
            let total = query.clone().count(&self.db).await?;
            let rows = query
                .offset(page.offset())
                .limit(page.limit())
                .all(&self.db)
                .await?;

            let ids: Vec<Uuid> = rows.iter().map(|(d, _)| d.id).collect();
            let counts: HashMap<Uuid, i64> = distribution_items::Entity::find()
                .select_only()
                .column(distribution_items::Column::DistributionId)
                .column_as(
                    Expr::cust(r#"COUNT(DISTINCT "distribution_items"."beneficiary_id")"#),
                    "beneficiary_count",
                )
                .filter(distribution_items::Column::DistributionId.is_in(ids))
                .group_by(distribution_items::Column::DistributionId)
                .into_model::<BeneficiaryCount>()
                .all(&self.db)
                .await?
                .into_iter()
                .map(|c| (c.distribution_id, c.beneficiary_count))
                .collect();
            Ok((rows, counts, total))
        })
        .await?;

        let rows = rows
            .into_iter()
            .map(|(distribution, program)| DistributionSummary {
                beneficiary_count: counts.get(&distribution.id).copied().unwrap_or(0),
                program_name: program.map(|p| p.name),
                distribution,
            })
            .collect();
        Ok(PageResponse::new(rows, page, total))
    }

    /// Loads a distribution with its items in line order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no distribution has this id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<DistributionDetail, RepositoryError> {
        bounded(self.timeout, async {
            let (distribution, program) = distributions::Entity::find_by_id(id)
                .find_also_related(programs::Entity)
                .one(&self.db)
                .await?
                .ok_or(RepositoryError::NotFound { entity: ENTITY, id })?;

            let creator = users::Entity::find_by_id(distribution.created_by)
                .one(&self.db)
                .await?;
            let items = distribution_items::Entity::find()
                .find_also_related(beneficiaries::Entity)
                .filter(distribution_items::Column::DistributionId.eq(id))
                .order_by_asc(distribution_items::Column::LineNo)
                .all(&self.db)
                .await?
                .into_iter()
                .map(|(item, beneficiary)| DistributionItemView {
                    item,
                    beneficiary_name: beneficiary.map(|b| b.name),
                })
                .collect();

            Ok(DistributionDetail {
                distribution,
                program_name: program.map(|p| p.name),
                created_by_name: creator.map(|u| u.full_name),
                items,
            })
        })
        .await
    }

    /// Records a distribution and its items atomically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ReferenceNotFound` naming the first program
    /// or beneficiary that does not exist; nothing is persisted then.
    pub async fn create(
        &self,
        draft: DistributionDraft,
        created_by: Uuid,
    ) -> Result<DistributionDetail, RepositoryError> {
        let id = Uuid::now_v7();
        bounded(self.timeout, async {
            let txn = self.db.begin().await?;
            ensure_exist(&txn, &draft.references()).await?;

            let now = chrono::Utc::now().into();
            distributions::ActiveModel {
                id: Set(id),
                distribution_date: Set(draft.distribution_date),
                program_id: Set(draft.program_id),
                source_fund_type: Set(draft.source_fund_type.into()),
                total_amount: Set(draft.total_amount),
                notes: Set(draft.notes.clone()),
                created_by: Set(created_by),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(|e| RepositoryError::on_write(e, ENTITY, "id"))?;

            insert_items(&txn, id, &draft.items).await?;
            txn.commit().await?;
            Ok(())
        })
        .await?;

        self.find_by_id(id).await
    }

    /// Replaces a distribution's header and its whole item set atomically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id and
    /// `RepositoryError::ReferenceNotFound` for an unknown program or beneficiary.
    pub async fn update(
        &self,
        id: Uuid,
        draft: DistributionDraft,
    ) -> Result<DistributionDetail, RepositoryError> {
        bounded(self.timeout, async {
            let txn = self.db.begin().await?;
            let existing = distributions::Entity::find_by_id(id)
                .one(&txn)
                .await?
                .ok_or(RepositoryError::NotFound { entity: ENTITY, id })?;
            ensure_exist(&txn, &draft.references()).await?;

            let mut distribution: distributions::ActiveModel = existing.into();
            distribution.distribution_date = Set(draft.distribution_date);
            distribution.program_id = Set(draft.program_id);
            distribution.source_fund_type = Set(draft.source_fund_type.into());
            distribution.total_amount = Set(draft.total_amount);
            distribution.notes = Set(draft.notes.clone());
            distribution.updated_at = Set(chrono::Utc::now().into());
            distribution
                .update(&txn)
                .await
                .map_err(|e| RepositoryError::on_update(e, ENTITY, id, "id"))?;

            distribution_items::Entity::delete_many()
                .filter(distribution_items::Column::DistributionId.eq(id))
                .exec(&txn)
                .await?;
            insert_items(&txn, id, &draft.items).await?;

            txn.commit().await?;
            Ok(())
        })
        .await?;

        self.find_by_id(id).await
    }

    /// Deletes a distribution; its items go with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id.
    pub async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        bounded(self.timeout, async {
            let result = distributions::Entity::delete_by_id(id)
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

/// Inserts items numbered from 1 in submitted order.
async fn insert_items(
    txn: &DatabaseTransaction,
    distribution_id: Uuid,
    items: &[DistributionItemDraft],
) -> Result<(), RepositoryError> {
    let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
    for (line_no, item) in (1..).zip(items) {
        distribution_items::ActiveModel {
            id: Set(Uuid::now_v7()),
            distribution_id: Set(distribution_id),
            line_no: Set(line_no),
            beneficiary_id: Set(item.beneficiary_id),
            amount: Set(item.amount),
            notes: Set(item.notes.clone()),
            created_at: Set(now),
        }
        .insert(txn)
        .await
        .map_err(|e| RepositoryError::on_write(e, ENTITY, "line_no"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, QueryTrait};

    use super::*;

    fn sql(filter: &DistributionFilter) -> String {
        DistributionRepository::list_query(filter)
            .build(DbBackend::Postgres)
            .sql
    }

    #[test]
    fn test_list_is_newest_first() {
        let sql = sql(&DistributionFilter::default());
        assert!(
            sql.contains(
                r#"ORDER BY "distributions"."distribution_date" DESC, "distributions"."created_at" DESC"#
            ),
            "{sql}"
        );
    }

    #[test]
    fn test_program_join_is_optional() {
        let sql = sql(&DistributionFilter::default());
        assert!(sql.contains(r#"LEFT JOIN "programs""#), "{sql}");
    }

    #[test]
    fn test_source_fund_filter() {
        let sql = sql(&DistributionFilter {
            source_fund_type: Some(FundBucket::Infaq),
            ..DistributionFilter::default()
        });
        assert!(sql.contains(r#""distributions"."source_fund_type" = "#), "{sql}");
    }
}
