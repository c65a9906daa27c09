use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobboard::assist::client::{AssistClient, MODEL};
use jobboard::auth::TokenKeys;
use jobboard::config::{Config, S3Settings, StorageConfig};
use jobboard::db::create_pool;
use jobboard::jobs::memory_store::MemoryJobStore;
use jobboard::jobs::pg_store::PgJobStore;
use jobboard::jobs::store::JobStore;
use jobboard::resumes::storage::{DiskResumeStore, ResumeStore, S3ResumeStore};
use jobboard::routes::{build_router, cors_layer};
use jobboard::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job board API v{}", env!("CARGO_PKG_VERSION"));

    let jobs: Arc<dyn JobStore> = match &config.database_url {
        Some(url) => Arc::new(PgJobStore::new(
            create_pool(url, config.database_max_connections).await?,
        )),
        None => {
            warn!("DATABASE_URL not set; job postings are kept in memory and lost on restart");
            Arc::new(MemoryJobStore::new())
        }
    };

    let resumes: Arc<dyn ResumeStore> = match &config.storage {
        StorageConfig::S3(s3) => {
            let client = build_s3_client(s3).await;
            info!("Résumé storage: s3://{}", s3.bucket);
            Arc::new(S3ResumeStore::new(client, s3.bucket.clone()))
        }
        StorageConfig::Disk { dir } => {
            info!("Résumé storage: {}", dir.display());
            Arc::new(DiskResumeStore::open(dir.clone()).await?)
        }
    };

    let assist = match &config.mistral_api_key {
        Some(key) => {
            info!("AI chat enabled (model: {MODEL})");
            Some(AssistClient::new(key.clone())?)
        }
        None => {
            info!("MISTRAL_API_KEY not set; AI chat disabled");
            None
        }
    };

    let state = AppState {
        jobs,
        resumes,
        auth: TokenKeys::new(&config.jwt_secret),
        assist,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client for MinIO (explicit endpoint and keys) or AWS (default chain).
async fn build_s3_client(s3: &S3Settings) -> aws_sdk_s3::Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(s3.region.clone()));
    if let (Some(key), Some(secret)) = (&s3.access_key_id, &s3.secret_access_key) {
        loader = loader.credentials_provider(Credentials::new(
            key,
            secret,
            None,
            None,
            "jobboard-static",
        ));
    }
    if let Some(endpoint) = &s3.endpoint {
        loader = loader.endpoint_url(endpoint);
    }
    let sdk_config = loader.load().await;

    // MinIO and most self-hosted stores need path-style addressing.
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(s3.endpoint.is_some())
        .build();
    aws_sdk_s3::Client::from_conf(s3_config)
}
