//! Integration tests for receipt persistence.

mod common;

use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;
use zakat_core::references::Reference;
use zakat_db::entities::{receipt_items, receipts};
use zakat_db::repositories::ReceiptFilter;
use zakat_db::{ReceiptRepository, RepositoryError};
use zakat_shared::types::PageRequest;

#[tokio::test]
async fn test_receipt_total_is_sum_of_items() {
    let Some(db) = common::connect().await else {
        return;
    };
    let created_by = common::user(&db).await;
    let donor_id = common::donor(&db, "Ahmad").await;

    let draft = common::receipt(
        donor_id,
        vec![common::maal(dec!(250000.00)), common::infaq(dec!(150000.00))],
    );
    let detail = ReceiptRepository::new(db.clone())
        .create(draft, created_by)
        .await
        .expect("create receipt");

    assert_eq!(detail.receipt.total_amount, dec!(400000.00));
    assert_eq!(detail.donor_name.as_deref(), Some("Ahmad"));
    assert_eq!(detail.created_by_name.as_deref(), Some("Amil Test"));
    let lines: Vec<i32> = detail.items.iter().map(|i| i.line_no).collect();
    assert_eq!(lines, vec![1, 2]);
    assert_eq!(detail.items[0].amount, dec!(250000.00));
}

#[tokio::test]
async fn test_unknown_donor_persists_nothing() {
    let Some(db) = common::connect().await else {
        return;
    };
    let created_by = common::user(&db).await;
    let missing = Uuid::new_v4();
    let draft = common::receipt(missing, vec![common::infaq(dec!(10000))]);
    let number = draft.receipt_number.clone();

    let err = ReceiptRepository::new(db.clone())
        .create(draft, created_by)
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::ReferenceNotFound(Reference::Donor(id)) if id == missing));
    let stored = receipts::Entity::find()
        .filter(receipts::Column::ReceiptNumber.eq(number))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn test_duplicate_receipt_number_is_rejected() {
    let Some(db) = common::connect().await else {
        return;
    };
    let created_by = common::user(&db).await;
    let donor_id = common::donor(&db, "Budi").await;
    let repo = ReceiptRepository::new(db.clone());

    let first = common::receipt(donor_id, vec![common::infaq(dec!(5000))]);
    let mut second = common::receipt(donor_id, vec![common::infaq(dec!(7000))]);
    second.receipt_number = first.receipt_number.clone();

    repo.create(first, created_by).await.unwrap();
    let err = repo.create(second, created_by).await.unwrap_err();

    assert!(matches!(
        err,
        RepositoryError::Duplicate {
            field: "receipt_number",
            ..
        }
    ));
}

#[tokio::test]
async fn test_update_replaces_item_set() {
    let Some(db) = common::connect().await else {
        return;
    };
    let created_by = common::user(&db).await;
    let donor_id = common::donor(&db, "Citra").await;
    let repo = ReceiptRepository::new(db.clone());

    let created = repo
        .create(
            common::receipt(
                donor_id,
                vec![
                    common::infaq(dec!(1000)),
                    common::infaq(dec!(2000)),
                    common::maal(dec!(3000)),
                ],
            ),
            created_by,
        )
        .await
        .unwrap();
    assert_eq!(created.items.len(), 3);

    let mut replacement = common::receipt(donor_id, vec![common::maal(dec!(500))]);
    replacement.receipt_number = created.receipt.receipt_number.clone();
    let updated = repo.update(created.receipt.id, replacement).await.unwrap();

    assert_eq!(updated.items.len(), 1);
    assert_eq!(updated.items[0].line_no, 1);
    assert_eq!(updated.receipt.total_amount, dec!(500));

    let stored_items = receipt_items::Entity::find()
        .filter(receipt_items::Column::ReceiptId.eq(created.receipt.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(stored_items, 1);
}

#[tokio::test]
async fn test_update_of_missing_receipt_is_not_found() {
    let Some(db) = common::connect().await else {
        return;
    };
    let donor_id = common::donor(&db, "Dewi").await;
    let err = ReceiptRepository::new(db.clone())
        .update(
            Uuid::new_v4(),
            common::receipt(donor_id, vec![common::infaq(dec!(1))]),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::NotFound { entity: "receipt", .. }));
}

#[tokio::test]
async fn test_delete_cascades_to_items() {
    let Some(db) = common::connect().await else {
        return;
    };
    let created_by = common::user(&db).await;
    let donor_id = common::donor(&db, "Eko").await;
    let repo = ReceiptRepository::new(db.clone());
    let created = repo
        .create(
            common::receipt(donor_id, vec![common::infaq(dec!(1)), common::infaq(dec!(2))]),
            created_by,
        )
        .await
        .unwrap();

    repo.delete(created.receipt.id).await.unwrap();

    let orphans = receipt_items::Entity::find()
        .filter(receipt_items::Column::ReceiptId.eq(created.receipt.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(orphans, 0);
    assert!(matches!(
        repo.delete(created.receipt.id).await,
        Err(RepositoryError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_list_by_donor_is_repeatable() {
    let Some(db) = common::connect().await else {
        return;
    };
    let created_by = common::user(&db).await;
    let donor_id = common::donor(&db, "Fajar").await;
    let repo = ReceiptRepository::new(db.clone());
    for _ in 0..3 {
        repo.create(common::receipt(donor_id, vec![common::infaq(dec!(100))]), created_by)
            .await
            .unwrap();
    }

    let filter = ReceiptFilter {
        donor_id: Some(donor_id),
        ..ReceiptFilter::default()
    };
    let first = repo.list(&filter, PageRequest::new(1, 10)).await.unwrap();
    let second = repo.list(&filter, PageRequest::new(1, 10)).await.unwrap();

    let ids = |page: &zakat_shared::types::PageResponse<zakat_db::repositories::ReceiptSummary>| {
        page.data.iter().map(|r| r.receipt.id).collect::<Vec<_>>()
    };
    assert_eq!(first.meta.total, 3);
    assert_eq!(ids(&first), ids(&second));
    assert!(first.data.iter().all(|r| r.item_count == 1));
}

#[tokio::test]
async fn test_racing_duplicates_leave_one_receipt() {
    let Some(db) = common::connect().await else {
        return;
    };
    let created_by = common::user(&db).await;
    let donor_id = common::donor(&db, "Gita").await;
    let repo = ReceiptRepository::new(db.clone());

    let first = common::receipt(donor_id, vec![common::infaq(dec!(10)), common::infaq(dec!(20))]);
    let mut second = common::receipt(donor_id, vec![common::maal(dec!(30))]);
    second.receipt_number = first.receipt_number.clone();
    let number = first.receipt_number.clone();

    let (a, b) = futures::join!(repo.create(first, created_by), repo.create(second, created_by));

    assert_eq!(usize::from(a.is_ok()) + usize::from(b.is_ok()), 1);
    let winner = a.or(b).unwrap();
    let headers = receipts::Entity::find()
        .filter(receipts::Column::ReceiptNumber.eq(number))
        .count(&db)
        .await
        .unwrap();
    let items = receipt_items::Entity::find()
        .filter(receipt_items::Column::ReceiptId.eq(winner.receipt.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(headers, 1);
    assert_eq!(items, u64::try_from(winner.items.len()).unwrap());
}
