//! Salted one-way hashing for passwords and security answers.
//!
//! Hashes are Argon2id PHC strings (`$argon2id$v=19$...`), so the salt and
//! parameters travel with the hash and verification needs nothing else.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

/// Hash verified when a login names an unknown account, so that path costs the
/// same as a wrong password.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_secret("not-a-real-account-password").ok());

/// Hash a secret with a fresh random salt
pub fn hash_secret(secret: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(secret.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a secret against a stored PHC hash.
///
/// Digest comparison inside `argon2` is constant time. Malformed hashes verify as false.
pub fn verify_secret(secret: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok()
}

/// Compute the dummy hash up front so the first unknown-email login does no extra work
pub fn prepare_dummy_hash() {
    Lazy::force(&DUMMY_HASH);
}

#[cfg(test)]
pub(crate) fn dummy_hash_ready() -> bool {
    Lazy::get(&DUMMY_HASH).is_some()
}

/// Spend one verification on the dummy hash; always reports failure.
pub fn verify_against_dummy(secret: &str) -> bool {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_secret(secret, hash);
    }
    false
}
