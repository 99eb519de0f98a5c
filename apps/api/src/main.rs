mod config;
mod enrichment;
mod errors;
mod export;
mod generation;
mod images;
mod llm_client;
mod models;
mod routes;
mod session;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, S3Config};
use crate::export::ExportService;
use crate::images::{BriaBackend, ImageBackend, ImageService, StabilityBackend, UnsplashBackend};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::{MemorySessionStore, RedisSessionStore, SessionStore};
use crate::state::AppState;
use crate::storage::FileStorage;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values, never on missing keys)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Booster API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    if config.llm_api_key.is_none() {
        warn!("LLM_API_KEY not set; generated content will use fallback text");
    }
    let llm = LlmClient::new(
        config.llm_api_key.clone(),
        config.llm_base_url.clone(),
        config.llm_model.clone(),
    );
    info!("LLM client initialized (model: {})", llm.model());

    // Initialize image backends
    let stock: Option<Arc<dyn ImageBackend>> = match &config.unsplash_access_key {
        Some(key) => Some(Arc::new(UnsplashBackend::new(
            key.clone(),
            config.unsplash_api_url.clone(),
        ))),
        None => {
            info!("UNSPLASH_ACCESS_KEY not set; stock photo fallback disabled");
            None
        }
    };
    let images = ImageService::new(
        Arc::new(StabilityBackend::new(
            config.stability_api_key.clone(),
            config.stability_api_url.clone(),
        )),
        Arc::new(BriaBackend::new(
            config.bria_api_key.clone(),
            config.bria_api_url.clone(),
        )),
        stock,
    );

    // Initialize exports
    let exports = ExportService::new(config.export_dir.clone(), config.social_font_path.clone())?;
    info!("Export directory: {}", exports.export_dir().display());

    // Initialize S3 / MinIO
    let storage = match &config.s3 {
        Some(s3_config) => {
            let client = build_s3_client(s3_config).await;
            info!("S3 client initialized (bucket: {})", s3_config.bucket);
            FileStorage::new(
                Some((client, s3_config.bucket.clone())),
                config.storage_dir.clone(),
            )?
        }
        None => {
            info!("S3 not configured; uploads stored locally");
            FileStorage::local_only(config.storage_dir.clone())?
        }
    };

    // Initialize sessions (Redis when configured)
    let sessions: Arc<dyn SessionStore> = match &config.redis_url {
        Some(url) => {
            let redis = redis::Client::open(url.as_str())?;
            info!("Redis session store initialized");
            Arc::new(RedisSessionStore::new(redis, config.session_ttl))
        }
        None => {
            info!("REDIS_URL not set; using in-memory sessions");
            Arc::new(MemorySessionStore::new(config.session_ttl))
        }
    };

    // Build app state
    let state = AppState {
        config: config.clone(),
        llm: Arc::new(llm),
        images,
        exports,
        storage,
        sessions,
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

/// Constructs an S3 client for MinIO (local) or AWS. Without explicit keys the
/// default credential chain is used.
async fn build_s3_client(config: &S3Config) -> aws_sdk_s3::Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .endpoint_url(&config.endpoint);

    if let (Some(key_id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
        loader = loader.credentials_provider(Credentials::new(
            key_id,
            secret,
            None,
            None,
            "booster-static",
        ));
    }

    let s3_config = loader.load().await;
    aws_sdk_s3::Client::new(&s3_config)
}
