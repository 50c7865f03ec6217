use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::error;

use crate::error::ApiError;

/// Hashing failures are never shown to clients; both variants surface
/// as a 500 and only the log carries the argon2 detail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("could not hash password")]
    Hash,
    #[error("stored password hash is malformed")]
    MalformedHash,
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(err.into())
    }
}

/// Salted argon2id digest in PHC string format. Each call draws a fresh
/// salt, so equal passwords produce distinct hashes.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "argon2 hash failed");
            PasswordError::Hash
        })
}

/// Checks `plain` against a stored PHC hash. A mismatch is `Ok(false)`;
/// only an unparseable hash is an error.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "stored password hash did not parse");
        PasswordError::MalformedHash
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
