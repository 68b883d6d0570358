//! Argon2id password hashing.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use super::AuthError;
use crate::config::PasswordHashing;

/// Reject passwords the storefront cannot accept.
///
/// The storefront has no strength policy; only an empty password is refused.
pub(crate) fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::Validation("password cannot be empty".to_owned()));
    }
    Ok(())
}

fn hasher(preset: PasswordHashing) -> Result<Argon2<'static>, AuthError> {
    match preset {
        PasswordHashing::Standard => Ok(Argon2::default()),
        PasswordHashing::Minimal => {
            let params = Params::new(
                Params::MIN_M_COST,
                Params::MIN_T_COST,
                Params::MIN_P_COST,
                None,
            )
            .map_err(|_| AuthError::PasswordHash)?;
            Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
        }
    }
}

/// Hash a password using Argon2id with the given cost preset.
pub(crate) fn hash_password(password: &str, preset: PasswordHashing) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    hasher(preset)?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a PHC hash string.
///
/// Cost parameters are read from the hash, so hashes made with either preset
/// verify the same way.
pub(crate) fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
