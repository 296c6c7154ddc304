mod admin;
mod ai;
mod auth;
mod config;
mod db;
mod email;
mod errors;
mod intake;
mod jobs;
mod llm_client;
mod models;
mod portal;
mod question_bank;
mod routes;
mod seo;
mod state;
mod storage;
mod upload;
mod validation;

use anyhow::Result;
use axum::http::{header, HeaderValue, Method};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::ensure_bootstrap_admin;
use crate::config::Config;
use crate::db::create_pool;
use crate::email::build_mailer;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::ResumeStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http=info",
                env!("CARGO_PKG_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting agency API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    if let Some(creds) = &config.bootstrap_admin {
        ensure_bootstrap_admin(&db, creds).await?;
    }

    // Initialize S3 / MinIO
    let resumes = ResumeStore::from_config(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let mailer = build_mailer(&config.email, &config.site.name)?;
    if config.email.sendgrid_api_key.is_none() {
        info!("SENDGRID_API_KEY not set; outgoing email will be logged only");
    }

    // Session cookies are sent cross-origin only to the marketing site itself.
    let cors = CorsLayer::new()
        .allow_origin(config.site_url.parse::<HeaderValue>()?)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE]);

    let state = AppState {
        db,
        resumes,
        llm,
        mailer,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
