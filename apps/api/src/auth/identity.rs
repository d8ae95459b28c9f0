//! Third-party identity tokens (Google Sign-In).
//!
//! The ID token is an RS256 JWT signed by one of the issuer's published keys.
//! Keys are fetched per verification; there is no key cache.

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Key fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Token rejected: {0}")]
    Rejected(#[from] jsonwebtoken::errors::Error),

    #[error("No signing key matches kid {0:?}")]
    UnknownKey(Option<String>),

    #[error("Email is missing or unverified")]
    UnverifiedEmail,
}

/// The identity asserted by a verified third-party token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub email: String,
    pub name: Option<String>,
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError>;
}

#[derive(Debug, Deserialize)]
struct GoogleClaims {
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    name: Option<String>,
}

#[derive(Clone)]
pub struct GoogleIdentityVerifier {
    client: Client,
    client_id: String,
    certs_url: String,
}

impl GoogleIdentityVerifier {
    pub fn new(client: Client, client_id: String) -> Self {
        Self {
            client,
            client_id,
            certs_url: GOOGLE_CERTS_URL.to_string(),
        }
    }

    async fn fetch_keys(&self) -> Result<JwkSet, IdentityError> {
        Ok(self
            .client
            .get(&self.certs_url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.client_id.as_str()]);
        validation.set_issuer(&GOOGLE_ISSUERS);
        validation
    }
}

#[async_trait]
impl IdentityVerifier for GoogleIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let header = decode_header(token)?;
        let keys = self.fetch_keys().await?;
        let jwk = header
            .kid
            .as_deref()
            .and_then(|kid| keys.find(kid))
            .ok_or_else(|| IdentityError::UnknownKey(header.kid.clone()))?;
        let key = DecodingKey::from_jwk(jwk)?;

        let claims = decode::<GoogleClaims>(token, &key, &self.validation())?.claims;
        debug!("Identity token verified for {:?}", claims.email);

        identity_from_claims(claims)
    }
}

fn identity_from_claims(claims: GoogleClaims) -> Result<VerifiedIdentity, IdentityError> {
    match claims.email {
        Some(email) if claims.email_verified && !email.trim().is_empty() => Ok(VerifiedIdentity {
            email: email.trim().to_ascii_lowercase(),
            name: claims.name.filter(|n| !n.trim().is_empty()),
        }),
        _ => Err(IdentityError::UnverifiedEmail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verified_email_is_normalized() {
        let identity = identity_from_claims(GoogleClaims {
            email: Some(" Ada@Example.com ".to_string()),
            email_verified: true,
            name: Some("Ada".to_string()),
        })
        .unwrap();
        assert_eq!(identity.email, "ada@example.com");
        assert_eq!(identity.name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_unverified_email_rejected() {
        let result = identity_from_claims(GoogleClaims {
            email: Some("ada@example.com".to_string()),
            email_verified: false,
            name: None,
        });
        assert!(matches!(result, Err(IdentityError::UnverifiedEmail)));
    }

    #[test]
    fn test_missing_email_rejected() {
        let result = identity_from_claims(GoogleClaims {
            email: None,
            email_verified: true,
            name: None,
        });
        assert!(matches!(result, Err(IdentityError::UnverifiedEmail)));
    }

    #[tokio::test]
    async fn test_malformed_token_rejected_before_key_fetch() {
        let verifier = GoogleIdentityVerifier {
            client: Client::new(),
            client_id: "client".to_string(),
            certs_url: "http://127.0.0.1:9/certs".to_string(),
        };
        let result = verifier.verify("garbage").await;
        assert!(matches!(result, Err(IdentityError::Rejected(_))));
    }

    const TEST_KEY_PEM: &str = include_str!("../../testdata/identity_rsa.pem");
    const TEST_KEY_ID: &str = "test-key";
    const TEST_KEY_N: &str = "0HED4w2MVi4ZNEVuGK8q2u8_mygTc256ednqDNJy9FPXwPK18oHhBeBfTOZCnjyBpfv9QYfMey5zn0WAK2-rh5_O7El9zi--XaOG8XFOJbI_4MwLObLVlREEK2w2PV729WNjj7IYKoBJMy7Ka1feKm5BlvTeb7loquDYhrVq9cGqUC3uh_zSkZLxu_bXWSO7FTIyxZEqVKZT2m0jO8m_iEIMrbpsIbs6vw7uaLb1GwZCjQf4qmYwFtXS41iM1x2cJRvMW-cDItVwl2jflSbN7naFudqZNolmxRpPv2P3InOFjWwRjksDJFKzgjFtIaZMw4aecnuzgEPU6hOz0akTRQ";

    /// Serves a key set holding the test key and returns its URL.
    async fn serve_test_keys() -> String {
        let jwks = serde_json::json!({
            "keys": [{
                "kty": "RSA",
                "kid": TEST_KEY_ID,
                "alg": "RS256",
                "use": "sig",
                "n": TEST_KEY_N,
                "e": "AQAB"
            }]
        });
        let app = axum::Router::new().route(
            "/certs",
            axum::routing::get(move || {
                let jwks = jwks.clone();
                async move { axum::Json(jwks) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/certs")
    }

    fn sign(audience: &str, issuer: &str) -> String {
        let claims = serde_json::json!({
            "iss": issuer,
            "aud": audience,
            "sub": "1234567890",
            "email": "Ada@Example.com",
            "email_verified": true,
            "name": "Ada",
            "iat": chrono::Utc::now().timestamp(),
            "exp": chrono::Utc::now().timestamp() + 600,
        });
        let mut header = jsonwebtoken::Header::new(Algorithm::RS256);
        header.kid = Some(TEST_KEY_ID.to_string());
        let key = jsonwebtoken::EncodingKey::from_rsa_pem(TEST_KEY_PEM.as_bytes()).unwrap();
        jsonwebtoken::encode(&header, &claims, &key).unwrap()
    }

    async fn verifier() -> GoogleIdentityVerifier {
        GoogleIdentityVerifier {
            client: Client::new(),
            client_id: "adcraft-web".to_string(),
            certs_url: serve_test_keys().await,
        }
    }

    #[tokio::test]
    async fn test_token_for_configured_client_is_accepted() {
        let verifier = verifier().await;
        let identity = verifier
            .verify(&sign("adcraft-web", "https://accounts.google.com"))
            .await
            .unwrap();
        assert_eq!(identity.email, "ada@example.com");
        assert_eq!(identity.name.as_deref(), Some("Ada"));

        assert!(verifier
            .verify(&sign("adcraft-web", "accounts.google.com"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_token_for_other_client_is_rejected() {
        let verifier = verifier().await;
        let result = verifier
            .verify(&sign("someone-else", "https://accounts.google.com"))
            .await;
        assert!(matches!(result, Err(IdentityError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_token_from_other_issuer_is_rejected() {
        let verifier = verifier().await;
        let result = verifier
            .verify(&sign("adcraft-web", "https://evil.example.com"))
            .await;
        assert!(matches!(result, Err(IdentityError::Rejected(_))));
    }
}
