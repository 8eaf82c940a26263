// src/config.rs

use std::{env, str::FromStr};

use dotenvy::dotenv;
use rust_decimal::Decimal;

/// Which [`crate::store::DashboardStore`] the server runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown store kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreKind,
    pub database_url: Option<String>,
    pub rust_log: String,
    pub bind_addr: String,
    pub db_max_connections: u32,

    /// Leaderboard size when the request does not give one.
    pub default_limit: i64,
    /// Upper bound applied to any requested leaderboard size.
    pub max_limit: i64,
    /// Passing threshold when the request does not give one.
    pub default_min_score: Decimal,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreKind::Postgres,
            database_url: None,
            rust_log: "info".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            db_max_connections: 5,
            default_limit: 10,
            max_limit: 100,
            default_min_score: Decimal::from(60),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Config::default();

        let store = parse_or("DASHBOARD_STORE", defaults.store);

        let database_url = env::var("DATABASE_URL").ok();
        if store == StoreKind::Postgres && database_url.is_none() {
            panic!("DATABASE_URL must be set");
        }

        let rust_log = env::var("RUST_LOG").unwrap_or(defaults.rust_log);
        let bind_addr = env::var("BIND_ADDR").unwrap_or(defaults.bind_addr);

        Self {
            store,
            database_url,
            rust_log,
            bind_addr,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", defaults.db_max_connections),
            default_limit: parse_or("DASHBOARD_DEFAULT_LIMIT", defaults.default_limit),
            max_limit: parse_or("DASHBOARD_MAX_LIMIT", defaults.max_limit),
            default_min_score: parse_or("DASHBOARD_PASS_SCORE", defaults.default_min_score),
        }
    }
}

/// Reads and parses `key`, keeping `default` when unset or malformed.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            // Subscriber is not up yet, so this goes to stderr.
            eprintln!("Ignoring invalid {}='{}', using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}
