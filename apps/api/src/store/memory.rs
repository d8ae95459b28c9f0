//! In-memory repositories used by unit and router tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::campaign::{CampaignRecord, CampaignRow, NewCampaign, NewVersion, VersionRow};
use crate::models::user::{NewUser, User};
use crate::store::{CampaignRepository, UserRepository};

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(format!(
                "User with email {} already exists",
                user.email
            )));
        }
        let row = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role.as_str().to_string(),
            created_at: Utc::now(),
        };
        users.push(row.clone());
        Ok(row)
    }
}

#[derive(Default)]
pub struct MemoryCampaignRepository {
    campaigns: Mutex<Vec<CampaignRow>>,
    versions: Mutex<Vec<VersionRow>>,
}

impl MemoryCampaignRepository {
    fn store_version(&self, version: NewVersion) -> VersionRow {
        let row = VersionRow {
            id: Uuid::new_v4(),
            title: version.title,
            content: version.content,
            open_rate: version.metrics.open_rate,
            click_through_rate: version.metrics.click_through_rate,
            conversion_rate: version.metrics.conversion_rate,
            social_post_id: None,
            social_post_url: None,
            created_at: Utc::now(),
        };
        self.versions.lock().unwrap().push(row.clone());
        row
    }

    fn version(&self, id: Uuid) -> Option<VersionRow> {
        self.versions
            .lock()
            .unwrap()
            .iter()
            .find(|v| v.id == id)
            .cloned()
    }
}

#[async_trait]
impl CampaignRepository for MemoryCampaignRepository {
    async fn insert(&self, campaign: NewCampaign) -> Result<CampaignRecord, AppError> {
        let version_a = self.store_version(campaign.version_a);
        let version_b = self.store_version(campaign.version_b);
        let row = CampaignRow {
            id: Uuid::new_v4(),
            owner_id: campaign.owner_id,
            tone: campaign.tone,
            brand_name: campaign.brand_name,
            audience_category: campaign.audience_category,
            audience_type: campaign.audience_type,
            product_name: campaign.product_name,
            min_age: campaign.min_age,
            max_age: campaign.max_age,
            version_a_id: version_a.id,
            version_b_id: version_b.id,
            created_at: Utc::now(),
        };
        self.campaigns.lock().unwrap().push(row.clone());
        Ok(CampaignRecord {
            campaign: row,
            version_a,
            version_b,
        })
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<CampaignRecord>, AppError> {
        let campaigns: Vec<CampaignRow> = self
            .campaigns
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect();

        campaigns
            .into_iter()
            .map(|campaign| {
                let version_a = self.version(campaign.version_a_id);
                let version_b = self.version(campaign.version_b_id);
                match (version_a, version_b) {
                    (Some(version_a), Some(version_b)) => Ok(CampaignRecord {
                        campaign,
                        version_a,
                        version_b,
                    }),
                    _ => Err(AppError::Internal(anyhow::anyhow!("missing version row"))),
                }
            })
            .collect()
    }

    async fn find_version(&self, version_id: Uuid) -> Result<Option<VersionRow>, AppError> {
        Ok(self.version(version_id))
    }

    async fn attach_social_post(
        &self,
        version_id: Uuid,
        post_id: &str,
        post_url: &str,
    ) -> Result<Option<VersionRow>, AppError> {
        let mut versions = self.versions.lock().unwrap();
        Ok(versions.iter_mut().find(|v| v.id == version_id).map(|v| {
            v.social_post_id = Some(post_id.to_string());
            v.social_post_url = Some(post_url.to_string());
            v.clone()
        }))
    }
}
