use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CampaignRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub tone: String,
    pub brand_name: String,
    pub audience_category: String,
    pub audience_type: String,
    pub product_name: Option<String>,
    pub min_age: i32,
    pub max_age: i32,
    pub version_a_id: Uuid,
    pub version_b_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VersionRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub open_rate: i32,
    pub click_through_rate: i32,
    pub conversion_rate: i32,
    pub social_post_id: Option<String>,
    pub social_post_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Predicted engagement for a single copy variant, in whole percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub open_rate: i32,
    pub click_through_rate: i32,
    pub conversion_rate: i32,
}

impl VersionRow {
    pub fn metrics(&self) -> Metrics {
        Metrics {
            open_rate: self.open_rate,
            click_through_rate: self.click_through_rate,
            conversion_rate: self.conversion_rate,
        }
    }
}

/// Width of `versions.title`, in characters.
pub const MAX_TITLE_CHARS: usize = 200;

/// A copy variant ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVersion {
    pub title: String,
    pub content: String,
    pub metrics: Metrics,
}

impl NewVersion {
    /// Cuts the title to `MAX_TITLE_CHARS` on a char boundary.
    pub fn fit_title(mut self) -> Self {
        if let Some((end, _)) = self.title.char_indices().nth(MAX_TITLE_CHARS) {
            self.title.truncate(end);
        }
        self
    }
}

/// A campaign and its two variants ready to be persisted in one transaction.
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub owner_id: Uuid,
    pub tone: String,
    pub brand_name: String,
    pub audience_category: String,
    pub audience_type: String,
    pub product_name: Option<String>,
    pub min_age: i32,
    pub max_age: i32,
    pub version_a: NewVersion,
    pub version_b: NewVersion,
}

/// A persisted campaign joined with both of its versions.
#[derive(Debug, Clone)]
pub struct CampaignRecord {
    pub campaign: CampaignRow,
    pub version_a: VersionRow,
    pub version_b: VersionRow,
}
