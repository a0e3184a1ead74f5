//! Shared fixtures for the database integration tests.
//!
//! Tests need a Postgres reachable through `DATABASE_URL`; without it they
//! return early so the rest of the suite still runs.

#![allow(dead_code)]

use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tokio::sync::OnceCell;
use uuid::Uuid;
use zakat_core::fund::{BeneficiaryStatus, FundType, ZakatType};
use zakat_core::totals::calculate_total;
use zakat_core::validation::{
    BeneficiaryDraft, CategoryDraft, DistributionItemDraft, DonorDraft, ReceiptDraft,
    ReceiptItemDraft,
};
use zakat_db::migration::Migrator;
use zakat_db::{BeneficiaryRepository, CategoryRepository, DonorRepository, UserRepository};
use zakat_shared::Role;

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connects and makes sure the schema is current, or `None` without a database.
pub async fn connect() -> Option<DatabaseConnection> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return None;
    };

    MIGRATED
        .get_or_init(|| async {
            let db = Database::connect(&url).await.expect("connect for migration");
            Migrator::up(&db, None).await.expect("run migrations");
        })
        .await;

    Some(Database::connect(&url).await.expect("connect to database"))
}

/// A short unique token for names, phones and receipt numbers.
pub fn unique() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

pub fn phone() -> String {
    format!("08{}", unique())
}

pub async fn user(db: &DatabaseConnection) -> Uuid {
    UserRepository::new(db.clone())
        .create(
            &format!("amil-{}@example.org", unique()),
            "$argon2id$test_hash",
            "Amil Test",
            Role::Staff,
        )
        .await
        .expect("create user")
        .id
}

pub async fn donor(db: &DatabaseConnection, name: &str) -> Uuid {
    DonorRepository::new(db.clone())
        .create(DonorDraft {
            name: name.to_string(),
            phone: phone(),
            address: "Jl. Merdeka 1".to_string(),
            notes: None,
        })
        .await
        .expect("create donor")
        .id
}

pub async fn category(db: &DatabaseConnection) -> Uuid {
    CategoryRepository::new(db.clone())
        .create(CategoryDraft {
            name: format!("Fakir {}", unique()),
            description: None,
        })
        .await
        .expect("create category")
        .id
}

pub async fn beneficiary(db: &DatabaseConnection, category_id: Uuid) -> Uuid {
    BeneficiaryRepository::new(db.clone())
        .create(BeneficiaryDraft {
            name: format!("Mustahiq {}", unique()),
            phone: phone(),
            address: "Jl. Sudirman 2".to_string(),
            category_id,
            status: BeneficiaryStatus::Active,
            description: None,
        })
        .await
        .expect("create beneficiary")
        .beneficiary
        .id
}

pub fn maal(amount: Decimal) -> ReceiptItemDraft {
    ReceiptItemDraft {
        fund_type: FundType::Zakat,
        zakat_type: Some(ZakatType::Maal),
        person_count: None,
        amount,
        rice_kg: None,
        notes: None,
    }
}

pub fn infaq(amount: Decimal) -> ReceiptItemDraft {
    ReceiptItemDraft {
        fund_type: FundType::Infaq,
        zakat_type: None,
        person_count: None,
        amount,
        rice_kg: None,
        notes: None,
    }
}

pub fn receipt(donor_id: Uuid, items: Vec<ReceiptItemDraft>) -> ReceiptDraft {
    ReceiptDraft {
        donor_id,
        receipt_number: format!("RCP-{}", unique()),
        receipt_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 15).expect("valid date"),
        payment_method: "cash".to_string(),
        notes: None,
        total_amount: calculate_total(&items),
        items,
    }
}

pub fn item(beneficiary_id: Uuid, amount: Decimal) -> DistributionItemDraft {
    DistributionItemDraft {
        beneficiary_id,
        amount,
        notes: None,
    }
}
