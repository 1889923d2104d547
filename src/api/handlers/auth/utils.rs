//! Small helpers for credential validation, password hashing and session tokens.

use anyhow::{anyhow, Context, Result};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::Engine;
use rand::{rngs::OsRng, RngCore};
use regex::Regex;
use sha2::{Digest, Sha256};

/// Normalize an email for lookup/uniqueness checks.
pub(super) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub(super) fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

/// Hash a password with Argon2id and a random salt, returning a PHC string.
pub(super) fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| anyhow!("failed to hash password: {err}"))
}

/// Check a password against a stored PHC string.
///
/// Returns `Ok(false)` on mismatch and an error only if the stored hash is malformed.
pub(super) fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|err| anyhow!("invalid password hash: {err}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Argon2 is deliberately slow; keep it off the async workers.
pub(super) async fn hash_password_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .context("password hashing task failed")?
}

pub(super) async fn verify_password_blocking(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .context("password verification task failed")?
}

/// Create a new session token for the auth cookie.
/// The raw value is only returned to set the cookie; the database stores a hash.
pub(crate) fn generate_session_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session token")?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

/// Hash a session token so raw values never touch the database.
pub(crate) fn hash_session_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}

pub(super) fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Ana@Example.COM "), "ana@example.com");
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("ana@example.com"));
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("ana@localhost"));
    }

    #[test]
    fn password_hash_is_salted_and_verifies() -> Result<()> {
        let first = hash_password("correct horse")?;
        let second = hash_password("correct horse")?;
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));

        assert!(verify_password("correct horse", &first)?);
        assert!(!verify_password("battery staple", &first)?);
        Ok(())
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("anything", "plain-text").is_err());
    }

    #[test]
    fn session_tokens_are_random_32_bytes() -> Result<()> {
        let token = generate_session_token()?;
        let decoded = URL_SAFE_NO_PAD.decode(token.as_bytes())?;
        assert_eq!(decoded.len(), 32);
        assert_ne!(token, generate_session_token()?);
        Ok(())
    }

    #[test]
    fn session_token_hash_is_stable() {
        assert_eq!(hash_session_token("abc"), hash_session_token("abc"));
        assert_eq!(hash_session_token("abc").len(), 32);
        assert_ne!(hash_session_token("abc"), hash_session_token("abd"));
    }
}
