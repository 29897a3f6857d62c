//! Environment-driven configuration.
//!
//! Every setting is optional and falls back to a local-development default.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use sqlx::mysql::MySqlConnectOptions;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// Upper bound on open connections; further requests wait for a free one.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            name: "todo_app".to_string(),
            max_connections: 10,
        }
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.name);

        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub database: DatabaseConfig,
    pub static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            database: DatabaseConfig::default(),
            static_dir: PathBuf::from("frontend/dist"),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let db = defaults.database;

        Self {
            port: parsed(&lookup, "PORT", defaults.port),
            database: DatabaseConfig {
                host: lookup("DB_HOST").unwrap_or(db.host),
                port: parsed(&lookup, "DB_PORT", db.port),
                user: lookup("DB_USER").unwrap_or(db.user),
                password: lookup("DB_PASSWORD").unwrap_or(db.password),
                name: lookup("DB_NAME").unwrap_or(db.name),
                max_connections: parsed(&lookup, "DB_POOL_SIZE", db.max_connections),
            },
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        None => default,
    }
}
