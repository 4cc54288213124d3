mod catalog;
mod config;
mod db;
mod errors;
mod missions;
mod profile;
mod reports;
mod routes;
mod salary;
mod skills;
mod state;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::{Config, S3Config};
use crate::db::create_pool;
use crate::profile::store::ProfileStore;
use crate::reports::proofs::{InMemoryProofStorage, ProofStorage, S3ProofStorage};
use crate::reports::store::{InMemoryReportStore, PgReportStore, ReportStore};
use crate::routes::{build_router, cors_layer};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed or partial settings)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Unsan API v{}", env!("CARGO_PKG_VERSION"));

    // Bundled catalog; a broken bundle is fatal
    let catalog = Arc::new(Catalog::load_embedded()?);

    // Salary reports: PostgreSQL when configured
    let reports: Arc<dyn ReportStore> = match &config.database_url {
        Some(url) => Arc::new(PgReportStore::new(create_pool(url).await?)),
        None => {
            info!("DATABASE_URL not set, keeping salary reports in memory");
            Arc::new(InMemoryReportStore::new())
        }
    };

    // Salary proofs: S3 / MinIO when configured
    let proofs: Arc<dyn ProofStorage> = match &config.s3 {
        Some(s3) => {
            let client = build_s3_client(s3).await;
            info!("S3 client initialized (bucket: {})", s3.bucket);
            Arc::new(S3ProofStorage::new(client, s3.bucket.clone()))
        }
        None => {
            info!("S3 not configured, keeping salary proofs in memory");
            Arc::new(InMemoryProofStorage::new())
        }
    };

    let state = AppState {
        catalog,
        profiles: Arc::new(ProfileStore::seeded()),
        reports,
        proofs,
        config: config.clone(),
    };

    if config.cors_allowed_origins.is_empty() {
        info!("CORS_ALLOWED_ORIGINS not set, allowing any origin");
    }
    let cors = cors_layer(&config.cors_allowed_origins)?;

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(s3: &S3Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &s3.access_key_id,
        &s3.secret_access_key,
        None,
        None,
        "unsan-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(s3.region.clone()))
        .credentials_provider(credentials)
        .endpoint_url(&s3.endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
