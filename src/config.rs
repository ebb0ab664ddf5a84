use std::env;

use anyhow::{Context, Result};
use crate::db::DEFAULT_MAX_POOL_SIZE;

pub const DEFAULT_DATABASE_URL: &str = "companies.db";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_pool_size: u32,
    pub server_host: String,
    pub server_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map(|raw| normalize_database_url(&raw))
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let database_max_pool_size = match env::var("DATABASE_MAX_POOL_SIZE") {
            Ok(value) => value
                .parse()
                .context("DATABASE_MAX_POOL_SIZE must be a valid u32")?,
            Err(_) => DEFAULT_MAX_POOL_SIZE,
        };
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .context("SERVER_PORT must be a valid u16")?;

        Ok(Self {
            database_url,
            database_max_pool_size,
            server_host,
            server_port,
        })
    }
}

/// SQLite wants a file path; accept the `sqlite://` URL form as well.
pub fn normalize_database_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_DATABASE_URL.to_string();
    }
    match trimmed
        .strip_prefix("sqlite:///")
        .or_else(|| trimmed.strip_prefix("sqlite://"))
        .or_else(|| trimmed.strip_prefix("sqlite:"))
    {
        Some("") => DEFAULT_DATABASE_URL.to_string(),
        Some(path) => path.to_string(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_database_url, DEFAULT_DATABASE_URL};

    #[test]
    fn strips_sqlite_scheme() {
        assert_eq!(normalize_database_url("sqlite:///companies.db"), "companies.db");
        assert_eq!(normalize_database_url("sqlite://companies.db"), "companies.db");
        assert_eq!(
            normalize_database_url("sqlite:////tmp/companies.db"),
            "/tmp/companies.db"
        );
        assert_eq!(normalize_database_url("sqlite:data.db"), "data.db");
    }

    #[test]
    fn falls_back_to_default_when_empty() {
        assert_eq!(normalize_database_url("   "), DEFAULT_DATABASE_URL);
        assert_eq!(normalize_database_url("sqlite://"), DEFAULT_DATABASE_URL);
    }
}
