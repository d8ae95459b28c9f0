mod auth;
mod campaign;
mod config;
mod db;
mod errors;
mod generator;
mod models;
mod routes;
mod social;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::identity::GoogleIdentityVerifier;
use crate::auth::password::Argon2Credentials;
use crate::auth::service::AuthService;
use crate::auth::token::TokenService;
use crate::campaign::service::CampaignService;
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::generator::{CopyGenerator, HttpCopyGenerator, TemplateCopyGenerator};
use crate::routes::{build_router, cors_layer};
use crate::social::TwitterClient;
use crate::state::AppState;
use crate::store::postgres::{PgCampaignRepository, PgUserRepository};

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

    info!("Starting AdCraft API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    let tokens = TokenService::from_base64_secret(&config.jwt_secret)
        .context("JWT_SECRET must be a non-empty base64 string")?;

    // One HTTP client shared by all outbound collaborators
    let http = reqwest::Client::builder()
        .user_agent(concat!("adcraft/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let generator: Arc<dyn CopyGenerator> = match &config.generator_url {
        Some(url) => {
            let generator = HttpCopyGenerator::new(http.clone(), url);
            info!("Copy generator: {}", generator.endpoint());
            Arc::new(generator)
        }
        None => {
            info!("GENERATOR_URL not set, using built-in template generator");
            Arc::new(TemplateCopyGenerator)
        }
    };

    let analytics = Arc::new(TwitterClient::new(
        http.clone(),
        &config.twitter_api_url,
        config.twitter_bearer_token.clone(),
    ));
    let identity = Arc::new(GoogleIdentityVerifier::new(
        http,
        config.google_client_id.clone(),
    ));

    let users = Arc::new(PgUserRepository::new(db.clone()));
    let campaigns = Arc::new(PgCampaignRepository::new(db));

    // Build app state
    let state = AppState {
        auth: AuthService::new(
            users.clone(),
            Arc::new(Argon2Credentials::default()),
            identity,
            tokens,
        ),
        campaigns: CampaignService::new(users, campaigns, generator, analytics),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
