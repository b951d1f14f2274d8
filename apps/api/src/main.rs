mod config;
mod db;
mod delivery;
mod errors;
mod i18n;
mod llm_client;
mod models;
mod render;
mod repository;
mod resumes;
mod routes;
mod state;
mod tailoring;
#[cfg(test)]
mod testing;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::create_pool;
use crate::delivery::{DocumentService, HttpPdfRasterizer, S3BlobStore};
use crate::llm_client::LlmClient;
use crate::repository::{PgContentLibrary, PgResumeRepository};
use crate::resumes::{HttpJobPostingFetcher, ResumeService};
use crate::routes::build_router;
use crate::state::AppState;
use crate::tailoring::{
    KeywordMatchScorer, LlmMatchScorer, LlmResumeAi, MatchScorer, RedisTailorLock,
    TailoringService, TailoringSettings,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // PostgreSQL: resumes + read-only content library
    let db = create_pool(&config.database_url).await?;
    let resume_repo = Arc::new(PgResumeRepository::new(db.clone()));
    let library = Arc::new(PgContentLibrary::new(db));

    // Redis: per-resume tailoring lock
    let redis = redis::Client::open(config.redis_url.clone())?;
    let lock = Arc::new(RedisTailorLock::new(
        redis,
        Duration::from_secs(config.tailor_lock_ttl_secs),
    ));
    info!("Redis client initialized");

    // S3 / MinIO: PDF cache
    let s3 = build_s3_client(&config).await;
    let blobs = Arc::new(S3BlobStore::new(s3, config.s3_bucket.clone()));
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    // LLM-backed capabilities
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let ai = Arc::new(LlmResumeAi::new(llm.clone()));

    // Match scorer (KeywordMatchScorer by default; swap via ENABLE_LLM_MATCH_SCORING)
    let scorer: Arc<dyn MatchScorer> = if config.enable_llm_match_scoring {
        info!("Using LLM match scorer");
        Arc::new(LlmMatchScorer::new(llm.clone()))
    } else {
        Arc::new(KeywordMatchScorer)
    };

    let pdf = Arc::new(HttpPdfRasterizer::new(
        &config.pdf_service_url,
        Duration::from_secs(config.pdf_timeout_secs),
    )?);
    let jobs = Arc::new(HttpJobPostingFetcher::new(llm)?);

    // Services
    let documents = Arc::new(DocumentService::new(
        resume_repo.clone(),
        library.clone(),
        pdf,
        blobs.clone(),
    ));
    let tailoring = Arc::new(TailoringService::new(
        resume_repo.clone(),
        library.clone(),
        ai,
        scorer,
        lock,
        blobs,
        TailoringSettings {
            default_max_bullets: config.default_max_bullets,
            concurrency: config.tailor_concurrency,
        },
    ));
    info!(
        "Tailoring: default {} bullets, {} concurrent rewrites",
        config.default_max_bullets, config.tailor_concurrency
    );
    let resumes = Arc::new(ResumeService::new(
        resume_repo,
        library,
        documents.clone(),
        jobs,
    ));

    let state = AppState {
        resumes,
        tailoring,
        documents,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "tailor-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO serves buckets by path, not by subdomain.
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
