//! Stub collaborators and wiring helpers shared by unit and router tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::identity::{IdentityError, IdentityVerifier, VerifiedIdentity};
use crate::auth::password::Argon2Credentials;
use crate::auth::service::AuthService;
use crate::auth::token::TokenService;
use crate::campaign::models::CampaignRequest;
use crate::campaign::service::CampaignService;
use crate::config::Config;
use crate::generator::{CopyGenerator, GeneratedCopy, GeneratorError};
use crate::models::user::{NewUser, Role, User};
use crate::social::{SocialAnalytics, SocialError, TweetAnalytics};
use crate::state::AppState;
use crate::store::memory::{MemoryCampaignRepository, MemoryUserRepository};
use crate::store::UserRepository;

const TEST_SECRET: &[u8] = b"adcraft-test-signing-secret-0123456789";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/adcraft_test".to_string(),
        jwt_secret: String::new(),
        google_client_id: "test-client".to_string(),
        twitter_bearer_token: "test-bearer".to_string(),
        twitter_api_url: "http://127.0.0.1:9".to_string(),
        generator_url: None,
        cors_origins: Vec::new(),
        port: 0,
        rust_log: "debug".to_string(),
    }
}

pub fn token_service() -> TokenService {
    TokenService::from_secret(TEST_SECRET).expect("test secret is non-empty")
}

/// Identity verifier that either accepts every token as one identity or
/// rejects everything.
pub struct StubIdentity(Option<VerifiedIdentity>);

impl StubIdentity {
    pub fn accepting(identity: VerifiedIdentity) -> Arc<Self> {
        Arc::new(Self(Some(identity)))
    }

    pub fn rejecting() -> Arc<Self> {
        Arc::new(Self(None))
    }
}

#[async_trait]
impl IdentityVerifier for StubIdentity {
    async fn verify(&self, _token: &str) -> Result<VerifiedIdentity, IdentityError> {
        self.0.clone().ok_or(IdentityError::UnverifiedEmail)
    }
}

/// Analytics stub that knows about at most one post.
pub struct StubAnalytics(Option<TweetAnalytics>);

impl StubAnalytics {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self(None))
    }

    pub fn with(tweet: TweetAnalytics) -> Arc<Self> {
        Arc::new(Self(Some(tweet)))
    }
}

#[async_trait]
impl SocialAnalytics for StubAnalytics {
    async fn tweet_metrics(&self, post_id: &str) -> Result<TweetAnalytics, SocialError> {
        match &self.0 {
            Some(tweet) if tweet.id == post_id => Ok(tweet.clone()),
            _ => Err(SocialError::MissingData(post_id.to_string())),
        }
    }
}

/// Generator that always fails as an unreachable upstream would.
pub struct FailingGenerator;

#[async_trait]
impl CopyGenerator for FailingGenerator {
    async fn generate(&self, _request: &CampaignRequest) -> Result<GeneratedCopy, GeneratorError> {
        Err(GeneratorError::Api {
            status: 503,
            message: "generator unavailable".to_string(),
        })
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

pub fn auth_service(identity: Arc<dyn IdentityVerifier>) -> (AuthService, Arc<MemoryUserRepository>) {
    let users = Arc::new(MemoryUserRepository::default());
    let auth = AuthService::new(
        users.clone(),
        Arc::new(Argon2Credentials::fast()),
        identity,
        token_service(),
    );
    (auth, users)
}

pub fn campaign_service(
    generator: Arc<dyn CopyGenerator>,
    analytics: Arc<dyn SocialAnalytics>,
) -> (CampaignService, Arc<MemoryUserRepository>) {
    let users = Arc::new(MemoryUserRepository::default());
    let service = CampaignService::new(
        users.clone(),
        Arc::new(MemoryCampaignRepository::default()),
        generator,
        analytics,
    );
    (service, users)
}

/// Full application state over in-memory stores, sharing one user store
/// between auth and campaigns.
pub fn app_state(
    generator: Arc<dyn CopyGenerator>,
    analytics: Arc<dyn SocialAnalytics>,
    identity: Arc<dyn IdentityVerifier>,
) -> AppState {
    let users = Arc::new(MemoryUserRepository::default());
    AppState {
        auth: AuthService::new(
            users.clone(),
            Arc::new(Argon2Credentials::fast()),
            identity,
            token_service(),
        ),
        campaigns: CampaignService::new(
            users,
            Arc::new(MemoryCampaignRepository::default()),
            generator,
            analytics,
        ),
    }
}

pub async fn seed_user(users: &dyn UserRepository, email: &str) -> User {
    users
        .insert(NewUser {
            email: email.to_string(),
            password_hash: None,
            first_name: "Test".to_string(),
            last_name: None,
            role: Role::User,
        })
        .await
        .expect("seed user")
}
