//! Session cookie handling and logout.

use anyhow::Result;
use axum::{
    extract::Extension,
    http::{
        header::{InvalidHeaderValue, SET_COOKIE},
        HeaderMap, HeaderValue,
    },
    response::Response,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{error, instrument};

use super::{
    state::AuthConfig,
    storage::{delete_session, lookup_session, SessionRecord},
    utils::{hash_session_token, now_unix},
};
use crate::api::{
    cookies::{build_cookie, cookie_value},
    flash::{self, Flash},
};

pub const SESSION_COOKIE_NAME: &str = "gradpath_session";

/// Resolve the session cookie into a session record, if present and still valid.
///
/// Returns `Ok(None)` when the cookie is missing, unknown, expired, or belongs
/// to a user that no longer exists.
pub(crate) async fn authenticate_session(
    headers: &HeaderMap,
    pool: &SqlitePool,
    config: &AuthConfig,
) -> Result<Option<SessionRecord>> {
    let Some(token) = cookie_value(headers, SESSION_COOKIE_NAME) else {
        return Ok(None);
    };
    // Only the hash is stored; never compare raw tokens against the database.
    let token_hash = hash_session_token(&token);
    let not_before = now_unix() - config.session_ttl_seconds();
    lookup_session(pool, &token_hash, not_before).await
}

#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 303, description = "Session cleared, redirect to /login")
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn logout(
    headers: HeaderMap,
    pool: Extension<SqlitePool>,
    config: Extension<Arc<AuthConfig>>,
) -> Response {
    if let Some(token) = cookie_value(&headers, SESSION_COOKIE_NAME) {
        let token_hash = hash_session_token(&token);
        if let Err(err) = delete_session(&pool, &token_hash).await {
            error!("Failed to delete session: {err:#}");
        }
    }

    // Always clear the cookie, even if the session record was missing.
    let mut response = flash::redirect("/login", &Flash::info("You have been logged out."));
    if let Ok(cookie) = clear_session_cookie(&config) {
        response.headers_mut().append(SET_COOKIE, cookie);
    }
    response
}

/// Build the session cookie for a freshly issued token.
pub(super) fn session_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    build_cookie(
        SESSION_COOKIE_NAME,
        token,
        config.session_ttl_seconds(),
        config.session_cookie_secure(),
    )
}

fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    build_cookie(SESSION_COOKIE_NAME, "", 0, config.session_cookie_secure())
}
