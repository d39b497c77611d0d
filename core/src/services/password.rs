//! Password hashing and comparison.
//!
//! bcrypt is deliberately slow, so both operations run on the blocking thread
//! pool and the calling task is suspended until the work completes.

use crate::errors::{DomainError, DomainResult};

/// Hashes `plain` with bcrypt at the given cost
pub async fn hash_password(plain: &str, cost: u32) -> DomainResult<String> {
    let plain = plain.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost))
        .await
        .map_err(|e| DomainError::internal(format!("password hashing task failed: {}", e)))?
        .map_err(|e| DomainError::internal(format!("password hashing failed: {}", e)))
}

/// Compares `candidate` against a stored bcrypt hash.
///
/// An empty stored hash means no password was ever set and never matches.
pub async fn verify_password(candidate: &str, hash: &str) -> DomainResult<bool> {
    if hash.is_empty() {
        return Ok(false);
    }

    let candidate = candidate.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(candidate, &hash))
        .await
        .map_err(|e| DomainError::internal(format!("password comparison task failed: {}", e)))?
        .map_err(|e| {
            tracing::error!("Stored password hash could not be parsed: {}", e);
            DomainError::internal("stored password hash is malformed")
        })
}
