//! Persistence seams. Services hold `Arc<dyn UserRepository>` and
//! `Arc<dyn CampaignRepository>`; Postgres backs them in production.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::campaign::{CampaignRecord, NewCampaign, VersionRow};
use crate::models::user::{NewUser, User};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Fails with `AppError::Conflict` when the email is already taken.
    async fn insert(&self, user: NewUser) -> Result<User, AppError>;
}

#[async_trait]
pub trait CampaignRepository: Send + Sync {
    /// Persists the campaign and both versions atomically.
    async fn insert(&self, campaign: NewCampaign) -> Result<CampaignRecord, AppError>;

    /// All campaigns owned by `owner_id`, oldest first.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<CampaignRecord>, AppError>;

    async fn find_version(&self, version_id: Uuid) -> Result<Option<VersionRow>, AppError>;

    /// Returns `None` when the version does not exist.
    async fn attach_social_post(
        &self,
        version_id: Uuid,
        post_id: &str,
        post_url: &str,
    ) -> Result<Option<VersionRow>, AppError>;
}
