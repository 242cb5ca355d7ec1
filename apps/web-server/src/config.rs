//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use yatube_infra::{DatabaseConfig, JwtConfig};

const DEFAULT_POSTS_PER_PAGE: u64 = 10;
const DEFAULT_POST_PREVIEW_CHARS: usize = 15;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Posts per feed page.
    pub posts_per_page: u64,
    /// Characters of post text used in logs and page titles.
    pub post_preview_chars: usize,
    pub jwt: JwtConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: None,
            posts_per_page: DEFAULT_POSTS_PER_PAGE,
            post_preview_chars: DEFAULT_POST_PREVIEW_CHARS,
            jwt: JwtConfig::default(),
        }
    }
}

fn parsed<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Invalid {key} value {raw:?}, using default");
            None
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut db = DatabaseConfig::new(url);
            if let Some(max) = parsed("DB_MAX_CONNECTIONS") {
                db.max_connections = max;
            }
            if let Some(min) = parsed("DB_MIN_CONNECTIONS") {
                db.min_connections = min;
            }
            db.sqlx_logging = env::var("DB_LOG_STATEMENTS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false);
            db
        });

        let posts_per_page = match parsed::<u64>("POSTS_PER_PAGE") {
            Some(0) => {
                tracing::warn!("POSTS_PER_PAGE must be positive, using {DEFAULT_POSTS_PER_PAGE}");
                DEFAULT_POSTS_PER_PAGE
            }
            Some(n) => n,
            None => defaults.posts_per_page,
        };

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parsed("PORT").unwrap_or(defaults.port),
            database,
            posts_per_page,
            post_preview_chars: parsed("POST_PREVIEW_CHARS").unwrap_or(defaults.post_preview_chars),
            jwt: JwtConfig::from_env(),
        }
    }
}
