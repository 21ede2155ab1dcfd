use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::error;

use crate::error::AppError;

/// Hash a plaintext password with argon2 and a fresh random salt.
///
/// The cost parameters are argon2's defaults and are deliberately not
/// configurable; the contract only requires an adaptive salted hash.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "password hashing failed");
            AppError::Internal("password hashing failed".into())
        })?
        .to_string();
    Ok(hash)
}

/// Check a plaintext password against a stored argon2 hash.
///
/// A wrong password is `Ok(false)`; an unparseable stored hash is an error,
/// since it means the row itself is corrupt.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "stored password hash is malformed");
        AppError::Internal("stored password hash is malformed".into())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
