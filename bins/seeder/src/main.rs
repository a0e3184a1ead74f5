//! Database seeder.
//!
//! Seeds the eight asnaf (beneficiary categories) and an admin account.
//! Safe to run repeatedly: rows that already exist are left alone.
//!
//! Environment:
//! - `DATABASE_URL` (required)
//! - `SEED_ADMIN_EMAIL`, `SEED_ADMIN_PASSWORD` (admin is skipped when unset)
//!
//! Usage: cargo run --bin seeder

use anyhow::{Context, bail};
use zakat_core::auth::hash_password;
use zakat_core::validation::CategoryDraft;
use zakat_db::{CategoryRepository, RepositoryError, UserRepository};
use zakat_shared::Role;
use zakat_shared::config::DatabaseConfig;

/// The eight groups entitled to zakat.
const ASNAF: [(&str, &str); 8] = [
    ("Fakir", "Those with neither property nor income to meet basic needs"),
    ("Miskin", "Those whose income does not cover basic needs"),
    ("Amil", "Officers who collect and distribute zakat"),
    ("Mualaf", "New converts whose faith is being strengthened"),
    ("Riqab", "Those in bondage seeking freedom"),
    ("Gharimin", "Debtors unable to repay debts taken for permissible needs"),
    ("Fisabilillah", "Those striving in the way of Allah"),
    ("Ibnu Sabil", "Stranded travellers"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;
    let config = DatabaseConfig {
        url,
        max_connections: 2,
        min_connections: 1,
        connect_timeout_secs: 10,
        statement_timeout_secs: 10,
    };

    println!("Connecting to database...");
    let db = zakat_db::connect(&config)
        .await
        .context("failed to connect to database")?;

    println!("Seeding asnaf categories...");
    seed_categories(CategoryRepository::new(db.clone())).await?;

    println!("Seeding admin user...");
    seed_admin(UserRepository::new(db)).await?;

    println!("Seeding complete!");
    Ok(())
}

async fn seed_categories(repo: CategoryRepository) -> anyhow::Result<()> {
    let mut inserted = 0;
    for (name, description) in ASNAF {
        let draft = CategoryDraft {
            name: name.to_string(),
            description: Some(description.to_string()),
        };
        match repo.create(draft).await {
            Ok(_) => inserted += 1,
            Err(RepositoryError::Duplicate { .. }) => {
                println!("  {name} already exists, skipping...");
            }
            Err(e) => return Err(e).with_context(|| format!("failed to insert category {name}")),
        }
    }
    println!("  Inserted {inserted} categories");
    Ok(())
}

async fn seed_admin(repo: UserRepository) -> anyhow::Result<()> {
    let (Ok(email), Ok(password)) = (
        std::env::var("SEED_ADMIN_EMAIL"),
        std::env::var("SEED_ADMIN_PASSWORD"),
    ) else {
        println!("  SEED_ADMIN_EMAIL/SEED_ADMIN_PASSWORD not set, skipping...");
        return Ok(());
    };
    let email = email.trim().to_lowercase();
    if password.len() < 8 {
        bail!("SEED_ADMIN_PASSWORD must be at least 8 characters");
    }

    if repo.find_by_email(&email).await?.is_some() {
        println!("  {email} already exists, skipping...");
        return Ok(());
    }

    let hash = hash_password(&password)?;
    repo.create(&email, &hash, "Administrator", Role::Admin)
        .await
        .context("failed to insert admin user")?;
    println!("  Created admin user: {email}");
    Ok(())
}
