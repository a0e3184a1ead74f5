//! Schema migration runner.
//!
//! Reads `DATABASE_URL` (a `.env` file is honoured).
//!
//! Usage:
//!   migrator up      - Apply pending migrations
//!   migrator down    - Roll back the last migration
//!   migrator status  - List applied and pending migrations
//!   migrator fresh   - Drop everything and re-apply

use sea_orm_migration::prelude::*;
use zakat_db::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // the CLI installs its own tracing subscriber
    cli::run_cli(Migrator).await;
}
