use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use crate::{CoreError, CoreResult};

/// Argon2id PHC string for `password` with a fresh random salt.
pub fn hash_password(password: &str) -> CoreResult<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| CoreError::InternalError(e.to_string()))?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| CoreError::InternalError(e.to_string()))?;

    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CoreError::InternalError(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// An unparseable stored hash never verifies.
pub fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

// Argon2 is deliberately slow; keep it off the async workers.

pub async fn hash_password_async(password: String) -> CoreResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| CoreError::InternalError(format!("Password hashing task failed: {}", e)))?
}

pub async fn verify_password_async(hash: String, password: String) -> CoreResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&hash, &password))
        .await
        .map_err(|e| CoreError::InternalError(format!("Password check task failed: {}", e)))
}
