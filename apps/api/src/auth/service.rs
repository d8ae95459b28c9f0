//! Authentication flows: password login, registration, identity-token login.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::auth::identity::{IdentityVerifier, VerifiedIdentity};
use crate::auth::password::CredentialCheck;
use crate::auth::token::TokenService;
use crate::errors::AppError;
use crate::models::user::{NewUser, Role, User};
use crate::store::UserRepository;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdentityLoginRequest {
    pub token: String,
}

/// Returned on every successful login.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub email: String,
    pub first_name: String,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    credentials: Arc<dyn CredentialCheck>,
    identity: Arc<dyn IdentityVerifier>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        credentials: Arc<dyn CredentialCheck>,
        identity: Arc<dyn IdentityVerifier>,
        tokens: TokenService,
    ) -> Self {
        Self {
            users,
            credentials,
            identity,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Unknown email, wrong password and identity-provider accounts without a
    /// password all yield `Unauthorized`. Internal failures are logged and
    /// also reported as `Unauthorized`.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&request.email);
        match self.try_login(&email, &request.password).await {
            Ok(response) => {
                info!("User {email} logged in");
                Ok(response)
            }
            Err(AppError::Unauthorized) => {
                warn!("Rejected login for {email}");
                Err(AppError::Unauthorized)
            }
            Err(e) => {
                error!("Login failed for {email}: {e}");
                Err(AppError::Unauthorized)
            }
        }
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let stored_hash = user
            .password_hash
            .as_deref()
            .ok_or(AppError::Unauthorized)?;

        if !self.credentials.verify(password, stored_hash) {
            return Err(AppError::Unauthorized);
        }

        self.session_for(&user)
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<User, AppError> {
        let email = normalize_email(&request.email);
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation("A valid email is required".to_string()));
        }
        if request.password.is_empty() {
            return Err(AppError::Validation("Password cannot be empty".to_string()));
        }
        if request.first_name.trim().is_empty() {
            return Err(AppError::Validation(
                "firstName cannot be empty".to_string(),
            ));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let password_hash = self
            .credentials
            .hash(&request.password)
            .map_err(|e| AppError::Internal(e.into()))?;

        let user = self
            .users
            .insert(NewUser {
                email,
                password_hash: Some(password_hash),
                first_name: request.first_name.trim().to_string(),
                last_name: request
                    .last_name
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty()),
                role: Role::User,
            })
            .await?;

        info!("Registered user {}", user.email);
        Ok(user)
    }

    /// Verifies a third-party identity token, provisioning a local user on
    /// first sight of the verified email. Store failures are logged and
    /// reported as `Unauthorized`, as in `login`.
    pub async fn login_with_identity_token(
        &self,
        request: IdentityLoginRequest,
    ) -> Result<AuthResponse, AppError> {
        let identity = self.identity.verify(&request.token).await.map_err(|e| {
            warn!("Identity token rejected: {e}");
            AppError::Unauthorized
        })?;

        self.find_or_provision(&identity)
            .await
            .and_then(|user| self.session_for(&user))
            .map_err(|e| {
                error!("Identity login failed for {}: {e}", identity.email);
                AppError::Unauthorized
            })
    }

    /// A concurrent first sign-in for the same email loses the insert race
    /// with `Conflict`; the winner's row is then read back.
    async fn find_or_provision(&self, identity: &VerifiedIdentity) -> Result<User, AppError> {
        if let Some(user) = self.users.find_by_email(&identity.email).await? {
            return Ok(user);
        }

        let first_name = identity
            .name
            .clone()
            .unwrap_or_else(|| local_part(&identity.email));
        let inserted = self
            .users
            .insert(NewUser {
                email: identity.email.clone(),
                password_hash: None,
                first_name,
                last_name: None,
                role: Role::User,
            })
            .await;

        match inserted {
            Ok(user) => {
                info!("Provisioned user {} from identity provider", user.email);
                Ok(user)
            }
            Err(AppError::Conflict(_)) => {
                debug!("User {} provisioned concurrently", identity.email);
                self.users
                    .find_by_email(&identity.email)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal(anyhow::anyhow!(
                            "user {} conflicted on insert but was not found",
                            identity.email
                        ))
                    })
            }
            Err(e) => Err(e),
        }
    }

    fn session_for(&self, user: &User) -> Result<AuthResponse, AppError> {
        let token = self
            .tokens
            .issue(&user.email)
            .map_err(|e| AppError::Internal(e.into()))?;
        Ok(AuthResponse {
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            token,
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn local_part(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
