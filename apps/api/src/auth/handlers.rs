use axum::{extract::State, Json};
use serde::Serialize;

use crate::auth::service::{AuthResponse, IdentityLoginRequest, LoginRequest, RegisterRequest};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(state.auth.login(request).await?))
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.auth.register(request).await?;
    Ok(Json(MessageResponse {
        message: "User registered".to_string(),
    }))
}

/// POST /api/auth/google
///
/// Exchanges a Google ID token for a local session token.
pub async fn handle_identity_login(
    State(state): State<AppState>,
    Json(request): Json<IdentityLoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(state.auth.login_with_identity_token(request).await?))
}
