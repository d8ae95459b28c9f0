//! Password hashing behind a pluggable `CredentialCheck`.
//! Default: Argon2id PHC strings.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Password hashing failed: {0}")]
pub struct CredentialError(String);

pub trait CredentialCheck: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, CredentialError>;

    /// Malformed stored hashes verify as `false`.
    fn verify(&self, password: &str, stored_hash: &str) -> bool;
}

#[derive(Default)]
pub struct Argon2Credentials {
    argon2: Argon2<'static>,
}

impl CredentialCheck for Argon2Credentials {
    fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| CredentialError(e.to_string()))
    }

    fn verify(&self, password: &str, stored_hash: &str) -> bool {
        match PasswordHash::new(stored_hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("Stored password hash could not be parsed: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
impl Argon2Credentials {
    /// Minimum-cost parameters so tests do not pay for production hashing.
    pub fn fast() -> Self {
        let params = argon2::Params::new(8, 1, 1, None).expect("valid argon2 params");
        Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
        }
    }
}
