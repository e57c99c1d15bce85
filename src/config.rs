//! Environment-driven configuration
//!
//! `.env` is loaded with dotenvy (existing variables win), then each
//! setting is read with a fallback default. Database credentials are fed to
//! sqlx as discrete options so passwords never need URL escaping.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use sea_orm::sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sea_orm::{DatabaseConnection, SqlxPostgresConnector};
use tracing::{info, warn};

pub const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DB_DRIVER no soportado '{0}' (se esperaba pgsql)")]
    UnsupportedDriver(String),
    #[error("Valor inválido para {0}: '{1}'")]
    InvalidNumber(&'static str, String),
    #[error("DATABASE_URL inválida: {0}")]
    InvalidUrl(sea_orm::sqlx::Error),
    #[error("Error al conectar a la base de datos: {0}")]
    Connect(sea_orm::sqlx::Error),
    #[error("HOST/PORT inválidos: {0}")]
    InvalidAddr(String),
}

/// Load `ENV_FILE` (default `.env`) into the process environment.
///
/// Returns the path when a file was read. A missing file is not an error.
pub fn load_env_file() -> Option<PathBuf> {
    let path = std::env::var("ENV_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_ENV_FILE));

    match dotenvy::from_path(&path) {
        Ok(()) => {
            info!(path = %path.display(), "Loaded environment file");
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to parse environment file");
            None
        }
    }
}

/// Database settings resolved from `DB_*` variables or `DATABASE_URL`.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub driver: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    /// Full URL; takes precedence over the discrete fields when present
    pub url: Option<String>,
    pub max_connections: u32,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let driver = get("DB_DRIVER", "pgsql");
        if !matches!(driver.as_str(), "pgsql" | "postgres" | "postgresql") {
            return Err(ConfigError::UnsupportedDriver(driver));
        }

        let port_raw = get("DB_PORT", "5432");
        let port = port_raw
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber("DB_PORT", port_raw.clone()))?;

        let pool_raw = get("DB_MAX_CONNECTIONS", "10");
        let max_connections = pool_raw
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ConfigError::InvalidNumber("DB_MAX_CONNECTIONS", pool_raw.clone()))?;

        Ok(Self {
            driver,
            host: get("DB_HOST", "localhost"),
            port,
            name: get("DB_NAME", "product_system"),
            user: get("DB_USER", "postgres"),
            password: get("DB_PASSWORD", ""),
            url: lookup("DATABASE_URL").filter(|v| !v.is_empty()),
            max_connections,
        })
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url).map_err(ConfigError::InvalidUrl);
        }

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.name);
        if !self.password.is_empty() {
            options = options.password(&self.password);
        }
        Ok(options)
    }

    /// Open the shared connection pool.
    pub async fn connect(&self) -> Result<DatabaseConnection, ConfigError> {
        let options = self.connect_options()?;
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(options)
            .await
            .map_err(ConfigError::Connect)?;

        Ok(SqlxPostgresConnector::from_sqlx_postgres_pool(pool))
    }
}

// Keeps the password out of logs and panics
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.url.is_some() {
            return write!(f, "DATABASE_URL=***");
        }
        let password = if self.password.is_empty() {
            "(empty)"
        } else {
            "***"
        };
        write!(
            f,
            "{}://{}:{}@{}:{}/{}",
            self.driver, self.user, password, self.host, self.port, self.name
        )
    }
}

/// HTTP listener address from `HOST`/`PORT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let addr = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(format!("{}:{}", host, port)))?;
        Ok(Self { addr })
    }
}
