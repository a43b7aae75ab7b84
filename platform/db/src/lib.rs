//! Connection settings and pool construction shared by the server and tools.

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Shared connection pool handle. Cloning is cheap.
pub type DbPool = DatabaseConnection;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing (set {0})")]
    MissingUrl(String),
    #[error("invalid value for {key}: {value}")]
    InvalidSetting { key: &'static str, value: String },
    #[error("failed to connect to database: {0}")]
    Connect(#[from] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 8;

/// Environment-driven pool settings.
#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_url_key")]
    env_key: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default = "default_max_connections")]
    max_connections: u32,
    #[serde(default = "default_connect_timeout")]
    connect_timeout_secs: u64,
}

fn default_url_key() -> String {
    "DATABASE_URL".to_string()
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            env_key: default_url_key(),
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl DatabaseSettings {
    /// Settings pointing at an explicit url, bypassing the environment.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Reads `DB_MAX_CONNECTIONS` and `DB_CONNECT_TIMEOUT_SECS`; the url itself
    /// is resolved lazily from `DATABASE_URL`.
    pub fn from_env() -> DbResult<Self> {
        let mut settings = Self::default();
        if let Some(raw) = env_non_empty("DB_MAX_CONNECTIONS") {
            settings.max_connections = parse_setting("DB_MAX_CONNECTIONS", &raw)?;
        }
        if let Some(raw) = env_non_empty("DB_CONNECT_TIMEOUT_SECS") {
            settings.connect_timeout_secs = parse_setting("DB_CONNECT_TIMEOUT_SECS", &raw)?;
        }
        Ok(settings)
    }

    pub fn database_url(&self) -> DbResult<String> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }
        env_non_empty(&self.env_key).ok_or_else(|| DbError::MissingUrl(self.env_key.clone()))
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }

    fn connect_options(&self) -> DbResult<ConnectOptions> {
        let url = self.database_url()?;
        // Every pooled connection to an in-memory sqlite url opens its own
        // empty database, so those pools are pinned to a single connection.
        let max_connections = if is_in_memory_sqlite(&url) {
            1
        } else {
            self.max_connections
        };
        let mut options = ConnectOptions::new(url);
        options
            .max_connections(max_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs));
        Ok(options)
    }
}

/// Open a pool according to `settings`.
pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    let options = settings.connect_options()?;
    let pool = Database::connect(options).await?;
    info!(
        backend = ?pool.get_database_backend(),
        max_connections = settings.max_connections,
        "database pool ready"
    );
    Ok(pool)
}

fn is_in_memory_sqlite(url: &str) -> bool {
    url.starts_with("sqlite::memory:") || (url.starts_with("sqlite:") && url.contains("mode=memory"))
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_setting<T: std::str::FromStr>(key: &'static str, raw: &str) -> DbResult<T> {
    raw.parse().map_err(|_| DbError::InvalidSetting {
        key,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_url_wins_over_environment() {
        let settings = DatabaseSettings::with_url("sqlite::memory:");
        assert_eq!(settings.database_url().unwrap(), "sqlite::memory:");
        assert_eq!(settings.max_connections(), DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn rejects_non_numeric_settings() {
        let err = parse_setting::<u32>("DB_MAX_CONNECTIONS", "many").unwrap_err();
        assert!(matches!(
            err,
            DbError::InvalidSetting {
                key: "DB_MAX_CONNECTIONS",
                ..
            }
        ));
    }

    #[test]
    fn in_memory_sqlite_is_detected() {
        assert!(is_in_memory_sqlite("sqlite::memory:"));
        assert!(is_in_memory_sqlite("sqlite://hr.db?mode=memory&cache=shared"));
        assert!(!is_in_memory_sqlite("sqlite://hr.db?mode=rwc"));
        assert!(!is_in_memory_sqlite("postgres://localhost/hr"));
    }

    #[tokio::test]
    async fn connects_to_in_memory_sqlite() {
        let pool = connect(&DatabaseSettings::with_url("sqlite::memory:"))
            .await
            .unwrap();
        pool.ping().await.unwrap();
    }
}
