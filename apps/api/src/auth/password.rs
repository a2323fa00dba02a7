use anyhow::Result;
use rand::RngCore;
use tokio::task;

const SALT_LEN: usize = 16;

/// Hashes a password into an encoded Argon2 string (salt and params included).
/// Runs on the blocking pool: Argon2 is deliberately CPU- and memory-heavy.
pub async fn hash_password(password: &str) -> Result<String> {
    let pwd = password.as_bytes().to_vec();
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    Ok(task::spawn_blocking(move || {
        argon2::hash_encoded(&pwd, &salt, &argon2::Config::default())
    })
    .await??)
}

pub async fn verify_password(encoded: &str, password: &str) -> Result<bool> {
    let encoded = encoded.to_string();
    let pwd = password.as_bytes().to_vec();
    Ok(task::spawn_blocking(move || argon2::verify_encoded(&encoded, &pwd)).await??)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_verifies_only_the_same_password() {
        let encoded = hash_password("hunter22").await.unwrap();
        assert_ne!(encoded, "hunter22");
        assert!(verify_password(&encoded, "hunter22").await.unwrap());
        assert!(!verify_password(&encoded, "hunter23").await.unwrap());
    }

    #[tokio::test]
    async fn test_same_password_gets_distinct_salts() {
        let a = hash_password("secret").await.unwrap();
        let b = hash_password("secret").await.unwrap();
        assert_ne!(a, b);
    }
}
