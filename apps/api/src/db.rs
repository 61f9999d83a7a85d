use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::retry::RetryPolicy;

/// Whether the database answered during startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    Ready,
    /// Unreachable after every retry. The pool still connects lazily on first
    /// use; schema setup and reconciliation wait for [`wait_until_ready`].
    Degraded,
}

/// Creates a PostgreSQL pool without opening a connection.
pub fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect_lazy(database_url)?;
    Ok(pool)
}

/// Pings the database with exponential backoff.
pub async fn wait_for_database(pool: &PgPool, policy: &RetryPolicy) -> StoreStatus {
    info!("Connecting to PostgreSQL...");
    let ping = policy
        .run("PostgreSQL connection", || async {
            sqlx::query("SELECT 1").execute(pool).await
        })
        .await;

    match ping {
        Ok(_) => {
            info!("PostgreSQL connection pool established");
            StoreStatus::Ready
        }
        Err(e) => {
            warn!(
                "PostgreSQL unreachable after {} attempts: {e}. Starting in degraded mode",
                policy.max_attempts
            );
            StoreStatus::Degraded
        }
    }
}

/// Keeps pinging until the database answers. Used after a degraded start.
pub async fn wait_until_ready(pool: &PgPool, policy: &RetryPolicy) {
    policy
        .run_until_ok("PostgreSQL reconnect", || async {
            sqlx::query("SELECT 1").execute(pool).await
        })
        .await;
    info!("PostgreSQL reachable again");
}

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id              TEXT PRIMARY KEY,
        email           TEXT NOT NULL UNIQUE,
        name            TEXT NOT NULL,
        password_hash   TEXT NOT NULL,
        membership_tier TEXT NOT NULL DEFAULT 'free',
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS users_membership_tier_idx ON users (membership_tier)",
    r#"
    CREATE TABLE IF NOT EXISTS documents (
        collection TEXT NOT NULL,
        id         TEXT NOT NULL,
        body       JSONB NOT NULL,
        PRIMARY KEY (collection, id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS documents_body_idx ON documents USING GIN (body jsonb_path_ops)",
];

/// Idempotent schema setup.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ready");
    Ok(())
}
