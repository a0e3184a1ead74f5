//! Donation receipt repository.
//!
//! A receipt and its items are always written together: reference checks,
//! the header and every item share one database transaction, so a failed
//! write leaves nothing behind.

use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait,
    SelectTwo, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;
use zakat_core::fund::{FundType, ZakatType};
use zakat_core::validation::{ReceiptDraft, ReceiptItemDraft};
use zakat_shared::types::{PageRequest, PageResponse};

use super::RepositoryError;
use super::references::ensure_exist;
use super::search::{col, contains_any};
use crate::entities::{donors, receipt_items, receipts, sea_orm_active_enums, users};
use crate::{DEFAULT_STATEMENT_TIMEOUT, bounded};

const ENTITY: &str = "receipt";

/// Filter options for listing receipts.
#[derive(Debug, Clone, Default)]
pub struct ReceiptFilter {
    /// Matches the donor name or the receipt notes, case-insensitively.
    pub q: Option<String>,
    /// Earliest receipt date, inclusive.
    pub date_from: Option<NaiveDate>,
    /// Latest receipt date, inclusive.
    pub date_to: Option<NaiveDate>,
    /// Receipts with at least one item of this fund type.
    pub fund_type: Option<FundType>,
    /// Receipts with at least one item of this zakat type.
    pub zakat_type: Option<ZakatType>,
    /// Exact payment method.
    pub payment_method: Option<String>,
    /// Receipts issued to this donor.
    pub donor_id: Option<Uuid>,
}

/// Receipt list row.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptSummary {
    /// The receipt header.
    #[serde(flatten)]
    pub receipt: receipts::Model,
    /// Donor name.
    pub donor_name: Option<String>,
    /// Number of items on the receipt.
    pub item_count: i64,
}

/// A receipt with its donor, creator and items in line order.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptDetail {
    /// The receipt header.
    #[serde(flatten)]
    pub receipt: receipts::Model,
    /// Donor name.
    pub donor_name: Option<String>,
    /// Name of the user who recorded the receipt.
    pub created_by_name: Option<String>,
    /// Items ordered by `line_no`.
    pub items: Vec<receipt_items::Model>,
}

#[derive(Debug, FromQueryResult)]
struct ItemCount {
    receipt_id: Uuid,
    item_count: i64,
}

/// Receipt repository.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    db: DatabaseConnection,
    timeout: Duration,
}

impl ReceiptRepository {
    /// Creates a new receipt repository.
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
    pub(crate) fn list_query(filter: &ReceiptFilter) -> SelectTwo<receipts::Entity, donors::Entity> {
        let mut query = receipts::Entity::find()
            .find_also_related(donors::Entity)
            .order_by_desc(receipts::Column::ReceiptDate)
            .order_by_desc(receipts::Column::CreatedAt)
            .order_by_desc(receipts::Column::Id);

        if let Some(search) = contains_any(
            filter.q.as_deref(),
            vec![
                col(donors::Entity, donors::Column::Name),
                col(receipts::Entity, receipts::Column::Notes),
            ],
        ) {
            query = query.filter(search);
        }
        if let Some(from) = filter.date_from {
            query = query.filter(receipts::Column::ReceiptDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(receipts::Column::ReceiptDate.lte(to));
        }
        if let Some(method) = filter
            .payment_method
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
        {
            query = query.filter(receipts::Column::PaymentMethod.eq(method));
        }
        if let Some(donor_id) = filter.donor_id {
            query = query.filter(receipts::Column::DonorId.eq(donor_id));
        }

        if filter.fund_type.is_some() || filter.zakat_type.is_some() {
            let mut items = receipt_items::Entity::find()
                .select_only()
                .column(receipt_items::Column::ReceiptId);
            if let Some(fund_type) = filter.fund_type {
                items = items.filter(
                    receipt_items::Column::FundType.eq(sea_orm_active_enums::FundType::from(fund_type)),
                );
            }
            if let Some(zakat_type) = filter.zakat_type {
                items = items.filter(
                    receipt_items::Column::ZakatType
                        .eq(sea_orm_active_enums::ZakatType::from(zakat_type)),
                );
            }
            query = query.filter(receipts::Column::Id.in_subquery(items.into_query()));
        }
        query
    }

    /// Lists receipts one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails or times out.
    pub async fn list(
        &self,
        filter: &ReceiptFilter,
        page: PageRequest,
    ) -> Result<PageResponse<ReceiptSummary>, RepositoryError> {
        let query = Self::list_query(filter);
        let (rows, counts, total) = bounded(self.timeout, async {
            let total = query.clone().count(&self.db).await?;
            let rows = query
                .offset(page.offset())
                .limit(page.limit())
                .all(&self.db)
                .await?;

            let ids: Vec<Uuid> = rows.iter().map(|(r, _)| r.id).collect();
            let counts: HashMap<Uuid, i64> = receipt_items::Entity::find()
                .select_only()
                .column(receipt_items::Column::ReceiptId)
                .column_as(Expr::col(receipt_items::Column::Id).count(), "item_count")
                .filter(receipt_items::Column::ReceiptId.is_in(ids))
                .group_by(receipt_items::Column::ReceiptId)
                .into_model::<ItemCount>()
                .all(&self.db)
                .await?
                .into_iter()
                .map(|c| (c.receipt_id, c.item_count))
                .collect();
            Ok((rows, counts, total))
        })
        .await?;

        let rows = rows
            .into_iter()
            .map(|(receipt, donor)| ReceiptSummary {
                item_count: counts.get(&receipt.id).copied().unwrap_or(0),
                donor_name: donor.map(|d| d.name),
                receipt,
            })
            .collect();
        Ok(PageResponse::new(rows, page, total))
    }

    /// Loads a receipt with its items in line order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no receipt has this id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<ReceiptDetail, RepositoryError> {
        bounded(self.timeout, async {
            let (receipt, donor) = receipts::Entity::find_by_id(id)
                .find_also_related(donors::Entity)
                .one(&self.db)
                .await?
                .ok_or(RepositoryError::NotFound { entity: ENTITY, id })?;

            let creator = users::Entity::find_by_id(receipt.created_by)
                .one(&self.db)
                .await?;
            let items = receipt_items::Entity::find()
                .filter(receipt_items::Column::ReceiptId.eq(id))
                .order_by_asc(receipt_items::Column::LineNo)
                .all(&self.db)
                .await?;

            Ok(ReceiptDetail {
                receipt,
                donor_name: donor.map(|d| d.name),
                created_by_name: creator.map(|u| u.full_name),
                items,
            })
        })
        .await
    }

    /// Records a receipt and its items atomically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ReferenceNotFound` for an unknown donor and
    /// `RepositoryError::Duplicate` if the receipt number is taken; nothing
    /// is persisted in either case.
    pub async fn create(
        &self,
        draft: ReceiptDraft,
        created_by: Uuid,
    ) -> Result<ReceiptDetail, RepositoryError> {
        let id = Uuid::now_v7();
        bounded(self.timeout, async {
            let txn = self.db.begin().await?;
            ensure_exist(&txn, &draft.references()).await?;

            let now = chrono::Utc::now().into();
            receipts::ActiveModel {
                id: Set(id),
                donor_id: Set(draft.donor_id),
                receipt_number: Set(draft.receipt_number.clone()),
                receipt_date: Set(draft.receipt_date),
                payment_method: Set(draft.payment_method.clone()),
                total_amount: Set(draft.total_amount),
                notes: Set(draft.notes.clone()),
                created_by: Set(created_by),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(|e| RepositoryError::on_write(e, ENTITY, "receipt_number"))?;

            insert_items(&txn, id, &draft.items).await?;
            txn.commit().await?;
            Ok(())
        })
        .await?;

        self.find_by_id(id).await
    }

    /// Replaces a receipt's header and its whole item set atomically.
    ///
    /// The old items are deleted and the submitted ones inserted in their
    /// place; the stored total is recomputed from the new items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id,
    /// `RepositoryError::ReferenceNotFound` for an unknown donor and
    /// `RepositoryError::Duplicate` if the receipt number is taken.
    pub async fn update(&self, id: Uuid, draft: ReceiptDraft) -> Result<ReceiptDetail, RepositoryError> {
        bounded(self.timeout, async {
            let txn = self.db.begin().await?;
            let existing = receipts::Entity::find_by_id(id)
                .one(&txn)
                .await?
                .ok_or(RepositoryError::NotFound { entity: ENTITY, id })?;
            ensure_exist(&txn, &draft.references()).await?;

            let mut receipt: receipts::ActiveModel = existing.into();
            receipt.donor_id = Set(draft.donor_id);
            receipt.receipt_number = Set(draft.receipt_number.clone());
            receipt.receipt_date = Set(draft.receipt_date);
            receipt.payment_method = Set(draft.payment_method.clone());
            receipt.total_amount = Set(draft.total_amount);
            receipt.notes = Set(draft.notes.clone());
            receipt.updated_at = Set(chrono::Utc::now().into());
            receipt
                .update(&txn)
                .await
                .map_err(|e| RepositoryError::on_update(e, ENTITY, id, "receipt_number"))?;

            receipt_items::Entity::delete_many()
                .filter(receipt_items::Column::ReceiptId.eq(id))
                .exec(&txn)
                .await?;
            insert_items(&txn, id, &draft.items).await?;

            txn.commit().await?;
            Ok(())
        })
        .await?;

        self.find_by_id(id).await
    }

    /// Deletes a receipt; its items go with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for an unknown id.
    pub async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        bounded(self.timeout, async {
            let result = receipts::Entity::delete_by_id(id)
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
    receipt_id: Uuid,
    items: &[ReceiptItemDraft],
) -> Result<(), RepositoryError> {
    let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
    for (line_no, item) in (1..).zip(items) {
        receipt_items::ActiveModel {
            id: Set(Uuid::now_v7()),
            receipt_id: Set(receipt_id),
            line_no: Set(line_no),
            fund_type: Set(item.fund_type.into()),
            zakat_type: Set(item.zakat_type.map(Into::into)),
            person_count: Set(item.person_count),
            amount: Set(item.amount),
            rice_kg: Set(item.rice_kg),
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
    use sea_orm::DbBackend;

    use super::*;

    fn sql(filter: &ReceiptFilter) -> String {
        ReceiptRepository::list_query(filter)
            .build(DbBackend::Postgres)
            .sql
    }

    #[test]
    fn test_list_is_newest_first() {
        let sql = sql(&ReceiptFilter::default());
        assert!(
            sql.contains(
                r#"ORDER BY "receipts"."receipt_date" DESC, "receipts"."created_at" DESC, "receipts"."id" DESC"#
            ),
            "{sql}"
        );
    }

    #[test]
    fn test_search_spans_donor_name_and_notes() {
        let sql = sql(&ReceiptFilter {
            q: Some("ahmad".to_string()),
            ..ReceiptFilter::default()
        });
        assert!(sql.contains(r#"LOWER("donors"."name")"#), "{sql}");
        assert!(sql.contains(r#"LOWER("receipts"."notes")"#), "{sql}");
    }

    #[test]
    fn test_fund_type_filter_uses_item_subquery() {
        let sql = sql(&ReceiptFilter {
            fund_type: Some(FundType::Zakat),
            zakat_type: Some(ZakatType::Fitrah),
            ..ReceiptFilter::default()
        });
        assert!(sql.contains(r#""receipts"."id" IN (SELECT"#), "{sql}");
        assert!(sql.contains(r#"FROM "receipt_items""#), "{sql}");
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let sql = sql(&ReceiptFilter {
            date_from: NaiveDate::from_ymd_opt(2026, 3, 1),
            date_to: NaiveDate::from_ymd_opt(2026, 3, 31),
            ..ReceiptFilter::default()
        });
        assert!(sql.contains(r#""receipts"."receipt_date" >= "#), "{sql}");
        assert!(sql.contains(r#""receipts"."receipt_date" <= "#), "{sql}");
    }
}
