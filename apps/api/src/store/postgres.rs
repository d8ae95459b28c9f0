use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::campaign::{CampaignRecord, CampaignRow, NewCampaign, NewVersion, VersionRow};
use crate::models::user::{NewUser, User};
use crate::store::{CampaignRepository, UserRepository};

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, last_name, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(UNIQUE_VIOLATION) => Err(
                AppError::Conflict(format!("User with email {} already exists", user.email)),
            ),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Clone)]
pub struct PgCampaignRepository {
    pool: PgPool,
}

impl PgCampaignRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_version(
    tx: &mut Transaction<'_, Postgres>,
    version: &NewVersion,
) -> Result<VersionRow, sqlx::Error> {
    sqlx::query_as::<_, VersionRow>(
        r#"
        INSERT INTO versions (id, title, content, open_rate, click_through_rate, conversion_rate)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&version.title)
    .bind(&version.content)
    .bind(version.metrics.open_rate)
    .bind(version.metrics.click_through_rate)
    .bind(version.metrics.conversion_rate)
    .fetch_one(&mut **tx)
    .await
}

#[async_trait]
impl CampaignRepository for PgCampaignRepository {
    async fn insert(&self, campaign: NewCampaign) -> Result<CampaignRecord, AppError> {
        let mut tx = self.pool.begin().await?;

        let version_a = insert_version(&mut tx, &campaign.version_a).await?;
        let version_b = insert_version(&mut tx, &campaign.version_b).await?;

        let row = sqlx::query_as::<_, CampaignRow>(
            r#"
            INSERT INTO campaigns
                (id, owner_id, tone, brand_name, audience_category, audience_type,
                 product_name, min_age, max_age, version_a_id, version_b_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(campaign.owner_id)
        .bind(&campaign.tone)
        .bind(&campaign.brand_name)
        .bind(&campaign.audience_category)
        .bind(&campaign.audience_type)
        .bind(&campaign.product_name)
        .bind(campaign.min_age)
        .bind(campaign.max_age)
        .bind(version_a.id)
        .bind(version_b.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Inserted campaign {} for owner {}", row.id, row.owner_id);

        Ok(CampaignRecord {
            campaign: row,
            version_a,
            version_b,
        })
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<CampaignRecord>, AppError> {
        let campaigns = sqlx::query_as::<_, CampaignRow>(
            "SELECT * FROM campaigns WHERE owner_id = $1 ORDER BY created_at, id",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        if campaigns.is_empty() {
            return Ok(Vec::new());
        }

        let version_ids: Vec<Uuid> = campaigns
            .iter()
            .flat_map(|c| [c.version_a_id, c.version_b_id])
            .collect();

        let mut versions: HashMap<Uuid, VersionRow> =
            sqlx::query_as::<_, VersionRow>("SELECT * FROM versions WHERE id = ANY($1)")
                .bind(&version_ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|v| (v.id, v))
                .collect();

        campaigns
            .into_iter()
            .map(|campaign| {
                let version_a = versions.remove(&campaign.version_a_id);
                let version_b = versions.remove(&campaign.version_b_id);
                match (version_a, version_b) {
                    (Some(version_a), Some(version_b)) => Ok(CampaignRecord {
                        campaign,
                        version_a,
                        version_b,
                    }),
                    _ => Err(AppError::Internal(anyhow::anyhow!(
                        "Campaign {} is missing a version row",
                        campaign.id
                    ))),
                }
            })
            .collect()
    }

    async fn find_version(&self, version_id: Uuid) -> Result<Option<VersionRow>, AppError> {
        Ok(
            sqlx::query_as::<_, VersionRow>("SELECT * FROM versions WHERE id = $1")
                .bind(version_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn attach_social_post(
        &self,
        version_id: Uuid,
        post_id: &str,
        post_url: &str,
    ) -> Result<Option<VersionRow>, AppError> {
        Ok(sqlx::query_as::<_, VersionRow>(
            r#"
            UPDATE versions
            SET social_post_id = $1, social_post_url = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(post_id)
        .bind(post_url)
        .bind(version_id)
        .fetch_optional(&self.pool)
        .await?)
    }
}
