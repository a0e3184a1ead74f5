//! Zakat administration API server.
//!
//! Main entry point for the backend service.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use zakat_api::{AppState, create_router};
use zakat_db::connect;
use zakat_shared::{AppConfig, JwtConfig, JwtService};

const DEFAULT_LOG_FILTER: &str = "zakat=debug,zakat_api=debug,zakat_db=debug,tower_http=debug";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    // `Option<Layer>` lets one registry carry either formatter
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::load().context("failed to load configuration")?;

    let db = connect(&config.database)
        .await
        .context("failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        statement_timeout_secs = config.database.statement_timeout_secs,
        "Connected to database"
    );

    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));
    let state = AppState::new(db, jwt_service)
        .with_storage_timeout(config.database.statement_timeout());

    let app = create_router(state, &config.server.cors_allowed_origins);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
