pub mod health;

use anyhow::{Context, Result};
use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::auth::handlers as auth;
use crate::campaign::handlers as dashboard;
use crate::config::Config;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/google", post(auth::handle_identity_login))
        // Dashboard
        .route("/api/dashboard/post", post(dashboard::handle_generate))
        .route("/api/dashboard/get", get(dashboard::handle_list))
        .route(
            "/api/dashboard/twitter/save",
            post(dashboard::handle_save_social_post),
        )
        .route(
            "/api/dashboard/getid/:version_id",
            get(dashboard::handle_get_social_post_id),
        )
        .route(
            "/api/dashboard/analytics/:post_id",
            get(dashboard::handle_analytics),
        )
        .with_state(state)
}

/// Permissive when no origins are configured; otherwise restricted to the
/// listed origins with credentials allowed.
pub fn cors_layer(config: &Config) -> Result<CorsLayer> {
    if config.cors_origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin '{o}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true))
}
