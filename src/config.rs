use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::fmt;

use crate::services::csv_export::CsvTimeZone;
use crate::services::seed::{DEFAULT_ORDER_COUNT, DEFAULT_TRANSACTION_COUNT};

pub const DEFAULT_SERVER_PORT: u16 = 5000;
pub const DEFAULT_UPSTREAM_URL: &str = "http://localhost:3001";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub upstream_url: String,
    pub environment: Environment,
    pub csv_timezone: CsvTimeZone,
    pub seed_transactions: usize,
    pub seed_orders: usize,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub log_request_body: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_port: DEFAULT_SERVER_PORT,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            environment: Environment::Development,
            csv_timezone: CsvTimeZone::Local,
            seed_transactions: DEFAULT_TRANSACTION_COUNT,
            seed_orders: DEFAULT_ORDER_COUNT,
            cors_allowed_origins: None,
            log_request_body: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or blank keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_port = match get("SERVER_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("SERVER_PORT must be a port number, got '{}'", raw))?,
            None => DEFAULT_SERVER_PORT,
        };

        let upstream_url = get("UPSTREAM_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());

        let csv_timezone = match get("CSV_TIMEZONE") {
            Some(raw) => raw
                .parse::<CsvTimeZone>()
                .map_err(|e| anyhow::anyhow!("CSV_TIMEZONE: {}", e))?,
            None => CsvTimeZone::Local,
        };

        Ok(Config {
            server_port,
            upstream_url,
            environment: get("APP_ENV")
                .map(|raw| Environment::parse(&raw))
                .unwrap_or_default(),
            csv_timezone,
            seed_transactions: parse_count(get("SEED_TRANSACTIONS"), "SEED_TRANSACTIONS", DEFAULT_TRANSACTION_COUNT)?,
            seed_orders: parse_count(get("SEED_ORDERS"), "SEED_ORDERS", DEFAULT_ORDER_COUNT)?,
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS").map(|raw| parse_origins(&raw)),
            log_request_body: get("LOG_REQUEST_BODY")
                .map(|raw| raw.trim().eq_ignore_ascii_case("true") || raw.trim() == "1")
                .unwrap_or(false),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Unauthenticated checkouts fall back to a guest identity outside production.
    pub fn allows_guest_checkout(&self) -> bool {
        !self.is_production()
    }
}

fn parse_count(raw: Option<String>, key: &str, default: usize) -> Result<usize> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a non-negative integer, got '{}'", key, raw)),
        None => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
