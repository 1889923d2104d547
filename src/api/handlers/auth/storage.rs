//! Database helpers for users and sessions.

use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};
use tracing::Instrument;

/// Outcome when attempting to create a new user.
#[derive(Debug)]
pub(super) enum SignupOutcome {
    Created(i64),
    Conflict,
}

/// Fields needed to verify a login attempt.
pub(crate) struct LoginRecord {
    pub(crate) user_id: i64,
    pub(crate) name: String,
    pub(crate) password_hash: String,
}

/// Minimal data returned for a valid session cookie.
pub(crate) struct SessionRecord {
    pub(crate) user_id: i64,
    pub(crate) name: String,
}

pub(super) async fn insert_user(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<SignupOutcome> {
    let query = "INSERT INTO users (name, email, password) VALUES (?1, ?2, ?3)";
    let span = tracing::info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "INSERT",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .execute(pool)
        .instrument(span)
        .await;

    match result {
        Ok(done) => Ok(SignupOutcome::Created(done.last_insert_rowid())),
        Err(err) if is_unique_violation(&err) => Ok(SignupOutcome::Conflict),
        Err(err) => Err(err).context("failed to insert user"),
    }
}

/// Look up login data by normalized email.
pub(crate) async fn lookup_login_record(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<LoginRecord>> {
    let query = "SELECT id, name, password FROM users WHERE email = ?1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup login record")?;

    Ok(row.map(|row| LoginRecord {
        user_id: row.get("id"),
        name: row.get("name"),
        password_hash: row.get("password"),
    }))
}

pub(super) async fn insert_session(
    pool: &SqlitePool,
    user_id: i64,
    token_hash: &[u8],
    created_at: i64,
) -> Result<()> {
    let query = "INSERT INTO sessions (token_hash, user_id, created_at) VALUES (?1, ?2, ?3)";
    let span = tracing::info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(token_hash)
        .bind(user_id)
        .bind(created_at)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to insert session")?;
    Ok(())
}

/// Drop sessions of `user_id` created before `not_before`.
pub(super) async fn delete_expired_sessions(
    pool: &SqlitePool,
    user_id: i64,
    not_before: i64,
) -> Result<u64> {
    let query = "DELETE FROM sessions WHERE user_id = ?1 AND created_at < ?2";
    let span = tracing::info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "DELETE",
        db.statement = query
    );
    let done = sqlx::query(query)
        .bind(user_id)
        .bind(not_before)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete expired sessions")?;
    Ok(done.rows_affected())
}

/// Resolve a session hash created at or after `not_before`.
///
/// The join drops sessions whose user row no longer exists.
pub(super) async fn lookup_session(
    pool: &SqlitePool,
    token_hash: &[u8],
    not_before: i64,
) -> Result<Option<SessionRecord>> {
    let query = r"
        SELECT users.id AS user_id, users.name AS name
        FROM sessions
        JOIN users ON users.id = sessions.user_id
        WHERE sessions.token_hash = ?1 AND sessions.created_at >= ?2
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(token_hash)
        .bind(not_before)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup session")?;

    Ok(row.map(|row| SessionRecord {
        user_id: row.get("user_id"),
        name: row.get("name"),
    }))
}

pub(super) async fn delete_session(pool: &SqlitePool, token_hash: &[u8]) -> Result<()> {
    let query = "DELETE FROM sessions WHERE token_hash = ?1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "DELETE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(token_hash)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete session")?;
    Ok(())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
