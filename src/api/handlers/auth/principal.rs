//! Authenticated principal extraction: the session gate.

use axum::{http::HeaderMap, response::Response};
use sqlx::SqlitePool;

use super::{session::authenticate_session, state::AuthConfig};
use crate::api::handlers::PageError;

/// Authenticated user context derived from the session cookie.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user_id: i64,
    pub name: String,
}

/// Resolve the session cookie into a principal.
///
/// Without a valid session the caller gets a ready-made redirect to `/login`
/// carrying a warning, and must return it without doing any other work.
///
/// # Errors
/// Returns the redirect response when no principal can be resolved.
pub async fn require_auth(
    headers: &HeaderMap,
    pool: &SqlitePool,
    config: &AuthConfig,
) -> Result<Principal, Response> {
    match authenticate_session(headers, pool, config).await {
        Ok(Some(record)) => Ok(Principal {
            user_id: record.user_id,
            name: record.name,
        }),
        Ok(None) => Err(PageError::MissingSessionAuth.redirect("/login")),
        Err(err) => Err(PageError::Internal(err).redirect("/login")),
    }
}
