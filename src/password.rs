use anyhow::{Context, Result};
use argon2::PasswordVerifier;
use argon2::{password_hash::SaltString, Argon2, PasswordHash};

/// Hashes a plaintext password into a PHC-format argon2 string with a fresh
/// random salt. Argon2 hashing is CPU-heavy, so it runs off the async
/// executor. The write path in `db_helpers` always goes through this before
/// any insert or update touches the password column; there is no direct
/// write path that stores plaintext.
pub async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(rand::thread_rng());
        let hash = PasswordHash::generate(Argon2::default(), password, salt.as_salt())
            .map_err(|_| anyhow::anyhow!("Failed to hash password"))?;
        Ok(hash.to_string())
    })
    .await
    .context("Failed to hash password")?
}

/// One-way check of a plaintext candidate against a stored hash.
pub async fn verify_password(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || {
        let hash = PasswordHash::new(hash.as_str())
            .map_err(|_| anyhow::anyhow!("Failed to verify password"))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok())
    })
    .await
    .context("Failed to verify password")?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stored_value_is_never_the_plaintext() {
        let hash = hash_password("abcd".to_string()).await.unwrap();
        assert_ne!(hash, "abcd");
        assert!(hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn verification_succeeds_only_for_the_original_plaintext() {
        let hash = hash_password("abcd".to_string()).await.unwrap();
        assert!(verify_password("abcd".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("abce".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn hashing_twice_salts_differently() {
        let first = hash_password("abcd".to_string()).await.unwrap();
        let second = hash_password("abcd".to_string()).await.unwrap();
        assert_ne!(first, second);
    }
}
