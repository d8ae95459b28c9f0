//! Campaign orchestration.
//!
//! Flow for `generate`: validate → resolve owner → copy generator (one call) →
//! map variants into versions → persist campaign + versions → respond.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::campaign::models::{
    CampaignRequest, CampaignResponse, CampaignSummary, SocialPostRequest, VersionResponse,
};
use crate::errors::AppError;
use crate::generator::{CopyGenerator, GeneratedCopy};
use crate::models::campaign::NewCampaign;
use crate::models::user::User;
use crate::social::{SocialAnalytics, TweetAnalytics};
use crate::store::{CampaignRepository, UserRepository};

#[derive(Clone)]
pub struct CampaignService {
    users: Arc<dyn UserRepository>,
    campaigns: Arc<dyn CampaignRepository>,
    generator: Arc<dyn CopyGenerator>,
    analytics: Arc<dyn SocialAnalytics>,
}

impl CampaignService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        campaigns: Arc<dyn CampaignRepository>,
        generator: Arc<dyn CopyGenerator>,
        analytics: Arc<dyn SocialAnalytics>,
    ) -> Self {
        Self {
            users,
            campaigns,
            generator,
            analytics,
        }
    }

    pub async fn generate(
        &self,
        request: CampaignRequest,
        owner_email: &str,
    ) -> Result<CampaignResponse, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let owner = self.owner(owner_email).await?;

        info!(
            "Generating campaign for {} via {} generator",
            owner.email,
            self.generator.backend()
        );
        let copy = self
            .generator
            .generate(&request)
            .await
            .map_err(|e| AppError::Upstream(format!("Copy generation failed: {e}")))?;

        let record = self
            .campaigns
            .insert(new_campaign(owner.id, request, copy))
            .await?;

        info!("Campaign {} saved for {}", record.campaign.id, owner.email);
        Ok(record.into())
    }

    pub async fn list_for_user(&self, email: &str) -> Result<Vec<CampaignSummary>, AppError> {
        let owner = self.owner(email).await?;
        let records = self.campaigns.list_by_owner(owner.id).await?;
        Ok(records.into_iter().map(CampaignSummary::from).collect())
    }

    pub async fn attach_social_post(
        &self,
        request: SocialPostRequest,
    ) -> Result<VersionResponse, AppError> {
        let post_id = request.twitter_id.trim();
        if post_id.is_empty() {
            return Err(AppError::Validation("twitterId cannot be empty".to_string()));
        }

        let version = self
            .campaigns
            .attach_social_post(request.version_id, post_id, request.post_url.trim())
            .await?
            .ok_or_else(|| version_not_found(request.version_id))?;

        info!("Attached post {post_id} to version {}", version.id);
        Ok(version.into())
    }

    pub async fn social_post_id(&self, version_id: Uuid) -> Result<String, AppError> {
        self.campaigns
            .find_version(version_id)
            .await?
            .ok_or_else(|| version_not_found(version_id))?
            .social_post_id
            .ok_or_else(|| {
                AppError::NotFound(format!("No Twitter ID found for version ID: {version_id}"))
            })
    }

    pub async fn fetch_analytics(&self, post_id: &str) -> Result<TweetAnalytics, AppError> {
        if !is_tweet_id(post_id) {
            return Err(AppError::Validation(format!(
                "'{post_id}' is not a valid post id"
            )));
        }
        self.analytics
            .tweet_metrics(post_id)
            .await
            .map_err(|e| AppError::Upstream(format!("Analytics lookup failed: {e}")))
    }

    async fn owner(&self, email: &str) -> Result<User, AppError> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {email} not found")))
    }
}

/// Post ids are decimal snowflakes. Anything else would be spliced into the
/// outbound request path.
fn is_tweet_id(post_id: &str) -> bool {
    !post_id.is_empty() && post_id.bytes().all(|b| b.is_ascii_digit())
}

fn version_not_found(version_id: Uuid) -> AppError {
    AppError::NotFound(format!("Version {version_id} not found"))
}

/// Maps a validated request and the generator output into persistable rows.
fn new_campaign(owner_id: Uuid, request: CampaignRequest, copy: GeneratedCopy) -> NewCampaign {
    NewCampaign {
        owner_id,
        tone: request.tone,
        brand_name: request.brand_name,
        audience_category: request.audience_category,
        audience_type: request.audience_type,
        product_name: request
            .product_name
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()),
        min_age: request.min_age,
        max_age: request.max_age,
        version_a: copy.version_a.fit_title(),
        version_b: copy.version_b.fit_title(),
    }
}
