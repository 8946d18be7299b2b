//! bcrypt password hashing.
//!
//! bcrypt is deliberately slow, so both directions run on the blocking pool
//! instead of stalling a runtime worker.

use std::sync::LazyLock;

use crate::error::AppError;

/// Stand-in hash for logins naming no active account, at the same cost as real hashes.
static DECOY_HASH: LazyLock<String> = LazyLock::new(|| {
    bcrypt::hash("decoy-password-never-issued", bcrypt::DEFAULT_COST).unwrap_or_default()
});

pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await??;
    Ok(hashed)
}

/// Compare a plaintext password with a stored hash.
///
/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    let matches = tokio::task::spawn_blocking(move || {
        bcrypt::verify(password, &password_hash).unwrap_or(false)
    })
    .await?;
    Ok(matches)
}

/// Spend one full bcrypt comparison without an account to compare against, so
/// an unknown username takes as long to reject as a wrong password.
pub async fn verify_decoy(password: &str) -> Result<(), AppError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || {
        let _ = bcrypt::verify(password, DECOY_HASH.as_str());
    })
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoy_hash_uses_default_cost() {
        let prefix = format!("$2b${:02}$", bcrypt::DEFAULT_COST);
        assert!(DECOY_HASH.starts_with(&prefix), "{}", DECOY_HASH.as_str());
    }

    #[tokio::test]
    async fn hash_then_verify() {
        let hash = hash_password("shop123").await.unwrap();
        assert_ne!(hash, "shop123");
        assert!(verify_password("shop123", &hash).await.unwrap());
        assert!(!verify_password("shop124", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn garbage_hash_never_matches() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash").await.unwrap());
    }
}
