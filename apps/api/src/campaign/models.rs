//! Request and response shapes for the dashboard API, plus the mapping
//! from persisted rows into them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::campaign::{CampaignRecord, Metrics, VersionRow};

/// Parameters for one generation request. Also the body sent to the
/// copy generation service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRequest {
    pub tone: String,
    pub brand_name: String,
    pub audience_category: String,
    pub audience_type: String,
    #[serde(default)]
    pub product_name: Option<String>,
    pub min_age: i32,
    pub max_age: i32,
}

impl CampaignRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.tone.trim().is_empty() {
            return Err("tone cannot be empty".to_string());
        }
        if self.brand_name.trim().is_empty() {
            return Err("brandName cannot be empty".to_string());
        }
        if self.min_age < 0 {
            return Err("minAge cannot be negative".to_string());
        }
        if self.min_age > self.max_age {
            return Err(format!(
                "minAge ({}) must not exceed maxAge ({})",
                self.min_age, self.max_age
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub metrics: Metrics,
    pub social_post_id: Option<String>,
    pub social_post_url: Option<String>,
}

impl From<VersionRow> for VersionResponse {
    fn from(row: VersionRow) -> Self {
        Self {
            id: row.id,
            metrics: row.metrics(),
            title: row.title,
            content: row.content,
            social_post_id: row.social_post_id,
            social_post_url: row.social_post_url,
        }
    }
}

/// A generated campaign with both variants, as returned after generation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignResponse {
    pub id: Uuid,
    pub tone: String,
    pub brand_name: String,
    pub audience_category: String,
    pub audience_type: String,
    pub product_name: Option<String>,
    pub min_age: i32,
    pub max_age: i32,
    pub version_a: VersionResponse,
    pub version_b: VersionResponse,
    pub created_at: DateTime<Utc>,
}

impl From<CampaignRecord> for CampaignResponse {
    fn from(record: CampaignRecord) -> Self {
        let c = record.campaign;
        Self {
            id: c.id,
            tone: c.tone,
            brand_name: c.brand_name,
            audience_category: c.audience_category,
            audience_type: c.audience_type,
            product_name: c.product_name,
            min_age: c.min_age,
            max_age: c.max_age,
            version_a: record.version_a.into(),
            version_b: record.version_b.into(),
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionSummary {
    pub id: Uuid,
    pub title: String,
    pub content: String,
}

impl From<VersionRow> for VersionSummary {
    fn from(row: VersionRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
        }
    }
}

/// History entry for the campaign list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    pub id: Uuid,
    pub tone: String,
    pub brand_name: String,
    pub audience_category: String,
    pub audience_type: String,
    pub product_name: Option<String>,
    pub min_age: i32,
    pub max_age: i32,
    pub version_a: VersionSummary,
    pub version_b: VersionSummary,
}

impl From<CampaignRecord> for CampaignSummary {
    fn from(record: CampaignRecord) -> Self {
        let c = record.campaign;
        Self {
            id: c.id,
            tone: c.tone,
            brand_name: c.brand_name,
            audience_category: c.audience_category,
            audience_type: c.audience_type,
            product_name: c.product_name,
            min_age: c.min_age,
            max_age: c.max_age,
            version_a: record.version_a.into(),
            version_b: record.version_b.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialPostRequest {
    pub twitter_id: String,
    pub post_url: String,
    pub version_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialPostIdResponse {
    pub twitter_id: String,
}
