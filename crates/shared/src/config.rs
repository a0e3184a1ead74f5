//! Application configuration management.

use std::time::Duration;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Seconds to wait for a new connection.
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Upper bound for any single storage operation, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub statement_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Deadline applied to every repository call.
    #[must_use]
    pub const fn statement_timeout(&self) -> Duration {
        Duration::from_secs(self.statement_timeout_secs)
    }

    /// Deadline for establishing or acquiring a pooled connection.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_timeout_secs() -> u64 {
    5
}

/// JWT settings as loaded from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
    /// Refresh token expiration in seconds.
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> u64 {
    604_800 // 7 days
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `ZAKAT__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("ZAKAT")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment_with_defaults() {
        temp_env::with_vars(
            [
                ("ZAKAT__DATABASE__URL", Some("postgres://localhost/zakat_test")),
                ("ZAKAT__JWT__SECRET", Some("test-secret")),
                ("ZAKAT__SERVER__PORT", None),
                ("ZAKAT__DATABASE__STATEMENT_TIMEOUT_SECS", None),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/zakat_test");
                assert_eq!(config.jwt.secret, "test-secret");
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.database.statement_timeout(), Duration::from_secs(5));
                assert_eq!(config.jwt.access_token_expiry_secs, 900);
                assert!(config.server.cors_allowed_origins.is_empty());
            },
        );
    }

    #[test]
    fn test_environment_overrides() {
        temp_env::with_vars(
            [
                ("ZAKAT__DATABASE__URL", Some("postgres://localhost/zakat_test")),
                ("ZAKAT__JWT__SECRET", Some("test-secret")),
                ("ZAKAT__SERVER__PORT", Some("9090")),
                ("ZAKAT__DATABASE__STATEMENT_TIMEOUT_SECS", Some("2")),
                (
                    "ZAKAT__SERVER__CORS_ALLOWED_ORIGINS",
                    Some("http://localhost:3000,https://admin.example.org"),
                ),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.database.statement_timeout(), Duration::from_secs(2));
                assert_eq!(
                    config.server.cors_allowed_origins,
                    vec![
                        "http://localhost:3000".to_string(),
                        "https://admin.example.org".to_string()
                    ]
                );
            },
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        temp_env::with_vars(
            [
                ("ZAKAT__DATABASE__URL", None::<&str>),
                ("ZAKAT__JWT__SECRET", Some("test-secret")),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }
}
