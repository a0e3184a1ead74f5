//! Integration tests for distribution persistence and delete restrictions.

mod common;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use uuid::Uuid;
use zakat_core::fund::FundBucket;
use zakat_core::references::Reference;
use zakat_core::totals::calculate_total;
use zakat_core::validation::{DistributionDraft, DistributionItemDraft};
use zakat_db::repositories::DistributionFilter;
use zakat_db::{BeneficiaryRepository, CategoryRepository, DistributionRepository, RepositoryError};
use zakat_shared::types::PageRequest;

fn draft(program_id: Option<Uuid>, items: Vec<DistributionItemDraft>) -> DistributionDraft {
    DistributionDraft {
        distribution_date: NaiveDate::from_ymd_opt(2026, 4, 1).expect("valid date"),
        program_id,
        source_fund_type: FundBucket::ZakatMaal,
        notes: Some("Ramadan".to_string()),
        total_amount: calculate_total(&items),
        items,
    }
}

#[tokio::test]
async fn test_create_distribution_with_items() {
    let Some(db) = common::connect().await else {
        return;
    };
    let created_by = common::user(&db).await;
    let category = common::category(&db).await;
    let first = common::beneficiary(&db, category).await;
    let second = common::beneficiary(&db, category).await;

    let detail = DistributionRepository::new(db.clone())
        .create(
            draft(
                None,
                vec![common::item(first, dec!(300000)), common::item(second, dec!(200000))],
            ),
            created_by,
        )
        .await
        .unwrap();

    assert_eq!(detail.distribution.total_amount, dec!(500000));
    assert!(detail.program_name.is_none());
    assert_eq!(detail.items.len(), 2);
    assert_eq!(detail.items[1].item.beneficiary_id, second);
    assert!(detail.items.iter().all(|i| i.beneficiary_name.is_some()));
}

#[tokio::test]
async fn test_missing_beneficiary_persists_nothing() {
    let Some(db) = common::connect().await else {
        return;
    };
    let created_by = common::user(&db).await;
    let category = common::category(&db).await;
    let known = common::beneficiary(&db, category).await;
    let missing = Uuid::new_v4();

    let err = DistributionRepository::new(db.clone())
        .create(
            draft(
                None,
                vec![common::item(known, dec!(10)), common::item(missing, dec!(20))],
            ),
            created_by,
        )
        .await
        .unwrap_err();

    assert!(
        matches!(err, RepositoryError::ReferenceNotFound(Reference::Beneficiary(id)) if id == missing)
    );
    let listed = DistributionRepository::new(db.clone())
        .list(
            &DistributionFilter {
                q: Some("Ramadan".to_string()),
                ..Default::default()
            },
            PageRequest::new(1, 100),
        )
        .await
        .unwrap();
    assert!(listed.data.iter().all(|d| d.distribution.created_by != created_by));
}

#[tokio::test]
async fn test_missing_program_is_reported_first() {
    let Some(db) = common::connect().await else {
        return;
    };
    let created_by = common::user(&db).await;
    let program = Uuid::new_v4();

    let err = DistributionRepository::new(db.clone())
        .create(
            draft(Some(program), vec![common::item(Uuid::new_v4(), dec!(10))]),
            created_by,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::ReferenceNotFound(Reference::Program(id)) if id == program));
}

#[tokio::test]
async fn test_beneficiary_with_distributions_cannot_be_deleted() {
    let Some(db) = common::connect().await else {
        return;
    };
    let created_by = common::user(&db).await;
    let category = common::category(&db).await;
    let beneficiary = common::beneficiary(&db, category).await;
    DistributionRepository::new(db.clone())
        .create(draft(None, vec![common::item(beneficiary, dec!(75000))]), created_by)
        .await
        .unwrap();

    let repo = BeneficiaryRepository::new(db.clone());
    let err = repo.delete(beneficiary).await.unwrap_err();

    assert!(matches!(err, RepositoryError::InUse { entity: "beneficiary", .. }));
    assert!(repo.find_by_id(beneficiary).await.is_ok());

    let err = CategoryRepository::new(db.clone())
        .delete(category)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::InUse { entity: "category", .. }));
}

#[tokio::test]
async fn test_update_reassigns_items() {
    let Some(db) = common::connect().await else {
        return;
    };
    let created_by = common::user(&db).await;
    let category = common::category(&db).await;
    let first = common::beneficiary(&db, category).await;
    let second = common::beneficiary(&db, category).await;
    let repo = DistributionRepository::new(db.clone());

    let created = repo
        .create(draft(None, vec![common::item(first, dec!(100))]), created_by)
        .await
        .unwrap();
    let updated = repo
        .update(
            created.distribution.id,
            draft(
                None,
                vec![common::item(second, dec!(40)), common::item(second, dec!(60))],
            ),
        )
        .await
        .unwrap();

    assert_eq!(updated.distribution.total_amount, dec!(100));
    let beneficiaries: Vec<Uuid> = updated.items.iter().map(|i| i.item.beneficiary_id).collect();
    assert_eq!(beneficiaries, vec![second, second]);

    // the first beneficiary is free again
    BeneficiaryRepository::new(db.clone())
        .delete(first)
        .await
        .unwrap();
}
