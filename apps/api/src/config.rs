use std::time::Duration;

use anyhow::{Context, Result};

use crate::retry::RetryPolicy;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub rust_log: String,
    /// Comma-separated origin list, or `*` for any origin.
    pub cors_origins: Vec<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub s3: S3Settings,
    pub skip_seeding: bool,
    pub db_connect: RetryPolicy,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for MinIO or other S3-compatible stores.
    pub endpoint: Option<String>,
    /// Base used to build public URLs. Defaults to the virtual-hosted AWS URL.
    pub public_base_url: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl S3Settings {
    pub fn public_url(&self, key: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{key}", base.trim_end_matches('/')),
            None => format!("https://{}.s3.{}.amazonaws.com/{key}", self.bucket, self.region),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret: require_env("JWT_SECRET")?,
            port: parse_env("PORT", 8001)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            cors_origins: split_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            ),
            admin_email: optional_env("ADMIN_EMAIL"),
            admin_password: optional_env("ADMIN_PASSWORD"),
            s3: S3Settings {
                bucket: std::env::var("S3_BUCKET").unwrap_or_else(|_| "coaching-uploads".to_string()),
                region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                endpoint: optional_env("S3_ENDPOINT"),
                public_base_url: optional_env("S3_PUBLIC_BASE_URL"),
                access_key_id: optional_env("AWS_ACCESS_KEY_ID"),
                secret_access_key: optional_env("AWS_SECRET_ACCESS_KEY"),
            },
            skip_seeding: parse_flag(optional_env("SKIP_SEEDING").as_deref()),
            db_connect: RetryPolicy {
                initial_delay: Duration::from_millis(parse_env(
                    "DB_CONNECT_INITIAL_DELAY_MS",
                    2000,
                )?),
                max_attempts: parse_env("DB_CONNECT_ATTEMPTS", 5)?,
            },
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 50 * 1024 * 1024)?,
        })
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/coaching_test".to_string(),
            jwt_secret: "test-secret-that-is-at-least-32-characters-long".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            cors_origins: vec!["*".to_string()],
            admin_email: Some("admin@example.com".to_string()),
            admin_password: Some("admin-pass".to_string()),
            s3: S3Settings {
                bucket: "test-bucket".to_string(),
                region: "us-east-1".to_string(),
                endpoint: None,
                public_base_url: Some("https://cdn.test".to_string()),
                access_key_id: None,
                secret_access_key: None,
            },
            skip_seeding: true,
            db_connect: RetryPolicy::default(),
            max_upload_bytes: 1024 * 1024,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "1" | "yes")
    )
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}
