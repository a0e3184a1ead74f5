//! Integration tests for master-data CRUD and pagination.

mod common;

use uuid::Uuid;
use zakat_core::validation::{DonorDraft, ProgramDraft};
use zakat_db::repositories::{DonorFilter, ProgramFilter};
use zakat_db::{DonorRepository, ProgramRepository, RepositoryError};
use zakat_shared::types::PageRequest;

#[tokio::test]
async fn test_pagination_over_twenty_five_donors() {
    let Some(db) = common::connect().await else {
        return;
    };
    let tag = common::unique();
    for n in 0..25 {
        common::donor(&db, &format!("Donor {tag} {n:02}")).await;
    }
    let repo = DonorRepository::new(db.clone());
    let filter = DonorFilter { q: Some(tag) };

    let page3 = repo.list(&filter, PageRequest::new(3, 10)).await.unwrap();
    assert_eq!(page3.data.len(), 5);
    assert_eq!(page3.meta.total, 25);
    assert_eq!(page3.meta.total_pages, 3);

    let page4 = repo.list(&filter, PageRequest::new(4, 10)).await.unwrap();
    assert!(page4.data.is_empty());
    assert_eq!(page4.meta.total, 25);
}

#[tokio::test]
async fn test_search_is_case_insensitive_and_repeatable() {
    let Some(db) = common::connect().await else {
        return;
    };
    let tag = common::unique();
    common::donor(&db, &format!("Siti {tag}")).await;
    let repo = DonorRepository::new(db.clone());
    let filter = DonorFilter {
        q: Some(format!("SITI {}", tag.to_uppercase())),
    };

    let first = repo.list(&filter, PageRequest::default()).await.unwrap();
    let second = repo.list(&filter, PageRequest::default()).await.unwrap();

    assert_eq!(first.meta.total, 1);
    assert_eq!(
        first.data.iter().map(|d| d.id).collect::<Vec<_>>(),
        second.data.iter().map(|d| d.id).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_duplicate_donor_phone() {
    let Some(db) = common::connect().await else {
        return;
    };
    let repo = DonorRepository::new(db.clone());
    let phone = common::phone();
    let draft = DonorDraft {
        name: "Hasan".to_string(),
        phone: phone.clone(),
        address: "Jl. Pemuda".to_string(),
        notes: None,
    };

    repo.create(draft.clone()).await.unwrap();
    let err = repo.create(draft).await.unwrap_err();

    assert!(matches!(err, RepositoryError::Duplicate { field: "phone", .. }));
}

#[tokio::test]
async fn test_update_and_delete_unknown_donor() {
    let Some(db) = common::connect().await else {
        return;
    };
    let repo = DonorRepository::new(db.clone());
    let id = Uuid::new_v4();
    let draft = DonorDraft {
        name: "Nobody".to_string(),
        phone: common::phone(),
        address: "-".to_string(),
        notes: None,
    };

    assert!(matches!(
        repo.update(id, draft).await,
        Err(RepositoryError::NotFound { entity: "donor", .. })
    ));
    assert!(matches!(
        repo.delete(id).await,
        Err(RepositoryError::NotFound { entity: "donor", .. })
    ));
}

#[tokio::test]
async fn test_program_active_filter() {
    let Some(db) = common::connect().await else {
        return;
    };
    let repo = ProgramRepository::new(db.clone());
    let tag = common::unique();
    for active in [true, false] {
        repo.create(ProgramDraft {
            name: format!("Beasiswa {tag} {active}"),
            program_type: "education".to_string(),
            description: None,
            active,
        })
        .await
        .unwrap();
    }

    let inactive = repo
        .list(
            &ProgramFilter {
                q: Some(tag),
                active: Some(false),
                ..ProgramFilter::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();

    assert_eq!(inactive.meta.total, 1);
    assert!(!inactive.data[0].active);
}
