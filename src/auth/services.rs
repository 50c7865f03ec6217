use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::auth::dto::{LoginRequest, RegisterRequest};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo_types::{Role, User};
use crate::error::ApiError;

/// Single message for both unknown-email and wrong-password failures.
/// Distinct messages would let a caller probe which emails are registered.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn register(db: &PgPool, input: RegisterRequest) -> Result<User, ApiError> {
    if User::find_by_email(db, &input.email).await?.is_some() {
        warn!(email = %input.email, "email already registered");
        return Err(ApiError::Conflict("User already exists".into()));
    }

    // Argon2 is CPU-bound by design; keep it off the async workers.
    let password = input.password;
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??;

    let user = match User::create(db, &input.email, &input.username, &hash).await {
        Ok(user) => user,
        // The unique index on email is the authority for concurrent
        // registrations; the pre-check above only covers the common case.
        Err(e) if is_unique_violation(&e) => {
            warn!(email = %input.email, "email already registered (index)");
            return Err(ApiError::Conflict("User already exists".into()));
        }
        Err(e) => return Err(e.into()),
    };
    Ok(user)
}

pub async fn login(
    db: &PgPool,
    keys: &JwtKeys,
    input: LoginRequest,
) -> Result<(User, String), ApiError> {
    let user = match User::find_by_email(db, &input.email).await? {
        Some(user) => user,
        None => {
            warn!(email = %input.email, "login unknown email");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
    };

    let password = input.password;
    let hash = user.password_hash.clone();
    let ok = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ApiError::Internal(e.into()))??;

    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let token = keys.sign(&user)?;
    Ok((user, token))
}

pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, ApiError> {
    User::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))
}

pub async fn update_role(db: &PgPool, user_id: Uuid, role: Role) -> Result<(), ApiError> {
    let updated = User::update_role(db, user_id, role).await?;
    if !updated {
        return Err(ApiError::NotFound("User not found".into()));
    }
    Ok(())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalization_trims_and_lowercases() {
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
        assert_eq!(normalize_email("a@x.com"), "a@x.com");
    }

    #[test]
    fn credential_failures_share_one_message() {
        let unknown = ApiError::Unauthorized(INVALID_CREDENTIALS.into());
        let wrong = ApiError::Unauthorized(INVALID_CREDENTIALS.into());
        assert_eq!(unknown.to_string(), wrong.to_string());
    }
}
