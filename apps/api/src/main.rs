mod admin;
mod auth;
mod config;
mod content;
mod db;
mod errors;
mod membership;
mod models;
mod reconcile;
mod retry;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use axum::http::HeaderValue;
use chrono::Utc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use sqlx::PgPool;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, ensure_schema, wait_for_database, wait_until_ready, StoreStatus};
use crate::reconcile::{ContentManifest, Reconciler};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{PgDocumentStore, PgUserStore, S3ObjectStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast on missing required env vars
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http=info",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Coaching API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let pool = create_pool(&config.database_url)?;
    let status = wait_for_database(&pool, &config.db_connect).await;

    let documents = Arc::new(PgDocumentStore::new(pool.clone()));
    let users = Arc::new(PgUserStore::new(pool.clone()));

    if status == StoreStatus::Ready {
        prepare_store(&pool, documents.clone(), config.skip_seeding).await?;
    } else {
        warn!("Database unavailable at startup; schema setup and reconciliation deferred");
        let pool = pool.clone();
        let documents = documents.clone();
        let policy = config.db_connect;
        let skip_seeding = config.skip_seeding;
        tokio::spawn(async move {
            wait_until_ready(&pool, &policy).await;
            if let Err(e) = prepare_store(&pool, documents, skip_seeding).await {
                error!("Deferred database setup failed: {e:#}");
            }
        });
    }

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    let objects = Arc::new(S3ObjectStore::new(s3, config.s3.clone()));
    info!("S3 client initialized (bucket: {})", config.s3.bucket);

    let state = AppState::new(config.clone(), documents, users, objects);
    if state.admin.is_enabled() {
        info!("Admin login enabled");
    }

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(&config.cors_origins)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Shutdown complete");
    Ok(())
}

/// Creates the schema, then reconciles content unless seeding is disabled.
async fn prepare_store(
    pool: &PgPool,
    documents: Arc<PgDocumentStore>,
    skip_seeding: bool,
) -> Result<()> {
    ensure_schema(pool)
        .await
        .context("Failed to create database schema")?;

    if skip_seeding {
        info!("Skipping content reconciliation (SKIP_SEEDING=true)");
    } else {
        let reconciler = Reconciler::new(documents, ContentManifest::canonical(Utc::now()));
        reconciler.run().await.log();
    }
    Ok(())
}

/// `*` allows any origin; otherwise only the listed origins.
fn build_cors(origins: &[String]) -> Result<CorsLayer> {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return Ok(CorsLayer::permissive());
    }
    let allowed = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {o}"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Constructs an S3 client for MinIO (custom endpoint) or AWS.
/// Static credentials are used when both keys are configured; otherwise the
/// default provider chain applies.
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let s3 = &config.s3;
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(s3.region.clone()));

    if let (Some(key_id), Some(secret)) = (&s3.access_key_id, &s3.secret_access_key) {
        loader = loader.credentials_provider(Credentials::new(
            key_id,
            secret,
            None,
            None,
            "coaching-static",
        ));
    }
    if let Some(endpoint) = &s3.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    let shared = loader.load().await;
    let s3_config = aws_sdk_s3::config::Builder::from(&shared)
        .force_path_style(s3.endpoint.is_some())
        .build();
    aws_sdk_s3::Client::from_conf(s3_config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
