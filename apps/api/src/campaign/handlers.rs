//! Axum route handlers for the dashboard API.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::handlers::MessageResponse;
use crate::campaign::models::{
    CampaignRequest, CampaignResponse, CampaignSummary, SocialPostIdResponse, SocialPostRequest,
};
use crate::errors::AppError;
use crate::social::TweetAnalytics;
use crate::state::AppState;

/// POST /api/dashboard/post
///
/// Generates an A/B copy pair for the caller and stores it.
pub async fn handle_generate(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CampaignRequest>,
) -> Result<Json<CampaignResponse>, AppError> {
    Ok(Json(state.campaigns.generate(request, &user.email).await?))
}

/// GET /api/dashboard/get
pub async fn handle_list(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<CampaignSummary>>, AppError> {
    Ok(Json(state.campaigns.list_for_user(&user.email).await?))
}

/// POST /api/dashboard/twitter/save
pub async fn handle_save_social_post(
    State(state): State<AppState>,
    Json(request): Json<SocialPostRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state.campaigns.attach_social_post(request).await?;
    Ok(Json(MessageResponse {
        message: "Twitter post saved successfully".to_string(),
    }))
}

/// GET /api/dashboard/getid/:version_id
pub async fn handle_get_social_post_id(
    State(state): State<AppState>,
    Path(version_id): Path<Uuid>,
) -> Result<Json<SocialPostIdResponse>, AppError> {
    let twitter_id = state.campaigns.social_post_id(version_id).await?;
    Ok(Json(SocialPostIdResponse { twitter_id }))
}

/// GET /api/dashboard/analytics/:post_id
pub async fn handle_analytics(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<TweetAnalytics>, AppError> {
    Ok(Json(state.campaigns.fetch_analytics(&post_id).await?))
}
