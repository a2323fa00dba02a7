use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

const MAX_SESSION_TTL_HOURS: i64 = 8760;

/// Which `Store` implementation backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow!("STORE_BACKEND must be 'postgres' or 'memory', got '{other}'")),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    /// Required for the postgres backend only.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub port: u16,
    pub rust_log: String,
    pub session_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let store_backend: StoreBackend = optional_env("STORE_BACKEND", "postgres").parse()?;
        let database_url = match store_backend {
            StoreBackend::Postgres => Some(require_env("DATABASE_URL")?),
            StoreBackend::Memory => std::env::var("DATABASE_URL").ok(),
        };

        Ok(Config {
            store_backend,
            database_url,
            db_max_connections: optional_env("DB_MAX_CONNECTIONS", "10")
                .parse()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            port: optional_env("PORT", "5000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
            session_ttl_hours: parse_session_ttl(&optional_env("SESSION_TTL_HOURS", "24"))?,
        })
    }

    /// In-memory configuration used by router tests.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Config {
            store_backend: StoreBackend::Memory,
            database_url: None,
            db_max_connections: 1,
            port: 0,
            rust_log: "info".to_string(),
            session_ttl_hours: 24,
        }
    }
}

/// Session lifetime in hours, at most one year.
fn parse_session_ttl(raw: &str) -> Result<i64> {
    let hours: i64 = raw
        .trim()
        .parse()
        .context("SESSION_TTL_HOURS must be an integer")?;
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        return Err(anyhow!(
            "SESSION_TTL_HOURS must be between 1 and {MAX_SESSION_TTL_HOURS}, got {hours}"
        ));
    }
    Ok(hours)
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parses_case_insensitively() {
        assert_eq!("Memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert_eq!(
            "postgres".parse::<StoreBackend>().unwrap(),
            StoreBackend::Postgres
        );
        assert!("mongo".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_session_ttl_must_be_within_a_year() {
        assert_eq!(parse_session_ttl("24").unwrap(), 24);
        assert_eq!(parse_session_ttl("1").unwrap(), 1);
        assert_eq!(parse_session_ttl("8760").unwrap(), 8760);
        for raw in ["0", "-5", "8761", "9223372036854775807", "day"] {
            assert!(parse_session_ttl(raw).is_err(), "{raw}");
        }
    }
}
