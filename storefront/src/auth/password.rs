//! Password hashing and verification.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::errors::Error;

// Argon2id work factors (RFC 9106 low-memory recommendation).
const MEMORY_KIB: u32 = 19_456; // 19 MB
const ITERATIONS: u32 = 2;
const PARALLELISM: u32 = 1;

fn hasher() -> Result<Argon2<'static>, Error> {
    let params = Params::new(MEMORY_KIB, ITERATIONS, PARALLELISM, None).map_err(|e| Error::Internal {
        operation: format!("create argon2 params: {e}"),
    })?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a secret into an opaque, salted PHC-format digest.
pub fn hash(secret: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let digest = hasher()?.hash_password(secret.as_bytes(), &salt).map_err(|e| Error::Internal {
        operation: format!("hash password: {e}"),
    })?;

    Ok(digest.to_string())
}

/// Verify a secret against a stored digest.
///
/// Verification uses the parameters embedded in the digest itself, so
/// stored hashes survive future work-factor changes.
pub fn matches(secret: &str, digest: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(digest).map_err(|e| Error::Internal {
        operation: format!("parse password hash: {e}"),
    })?;

    Ok(Argon2::default().verify_password(secret.as_bytes(), &parsed).is_ok())
}
