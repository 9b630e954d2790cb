use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tokio::task;

use crate::error::BootstrapError;

/// Hash a password with Argon2id and a random salt, returning the PHC string.
///
/// Hashing is CPU-bound, so it runs on a blocking thread.
pub async fn hash_password(password: &str) -> Result<String, BootstrapError> {
    let password = password.to_string();

    task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| BootstrapError::PasswordHash(format!("failed to hash password: {e}")))
    })
    .await
    .map_err(|e| BootstrapError::PasswordHash(format!("hashing task failed: {e}")))?
}

/// Check `password` against a stored PHC string.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, BootstrapError> {
    let password = password.to_string();
    let hash = hash.to_string();

    task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash)
            .map_err(|e| BootstrapError::PasswordHash(format!("invalid password hash: {e}")))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(BootstrapError::PasswordHash(format!(
                "password verification failed: {e}"
            ))),
        }
    })
    .await
    .map_err(|e| BootstrapError::PasswordHash(format!("verification task failed: {e}")))?
}
