//! Database helpers for university applications.
//!
//! Moving the final-choice flag always clears the user's rows first and then
//! sets the target, inside one transaction. The partial unique index in the
//! schema rejects anything that would leave two final rows.

use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};
use tracing::{info_span, Instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniversityApplication {
    pub id: i64,
    pub university_name: String,
    pub program_name: String,
    pub status: String,
    pub is_final_choice: bool,
}

#[derive(Debug)]
pub(super) struct NewApplication {
    pub(super) university_name: String,
    pub(super) program_name: String,
    pub(super) status: String,
    pub(super) is_final_choice: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum MarkFinalOutcome {
    Marked { university_name: String },
    NotFound,
}

/// All applications of `user_id` in insertion order.
pub(super) async fn list_applications(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<UniversityApplication>> {
    let query = r"
        SELECT id, university_name, program_name, status, is_final_choice
        FROM university_applications
        WHERE user_id = ?1
        ORDER BY id
    ";
    let span = info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .bind(user_id)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list applications")?;

    Ok(rows
        .into_iter()
        .map(|row| UniversityApplication {
            id: row.get("id"),
            university_name: row.get("university_name"),
            program_name: row.get("program_name"),
            status: row.get("status"),
            is_final_choice: row.get("is_final_choice"),
        })
        .collect())
}

pub(super) async fn insert_application(
    pool: &SqlitePool,
    user_id: i64,
    application: &NewApplication,
) -> Result<i64> {
    let mut tx = pool.begin().await.context("begin application transaction")?;

    if application.is_final_choice {
        clear_final_choice(&mut tx, user_id).await?;
    }

    let query = r"
        INSERT INTO university_applications
            (user_id, university_name, program_name, status, is_final_choice)
        VALUES (?1, ?2, ?3, ?4, ?5)
    ";
    let span = info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "INSERT",
        db.statement = query
    );
    let done = sqlx::query(query)
        .bind(user_id)
        .bind(&application.university_name)
        .bind(&application.program_name)
        .bind(&application.status)
        .bind(application.is_final_choice)
        .execute(&mut *tx)
        .instrument(span)
        .await
        .context("failed to insert application")?;

    tx.commit().await.context("commit application transaction")?;

    Ok(done.last_insert_rowid())
}

/// Make `application_id` the user's only final choice.
///
/// Applications owned by someone else are reported as `NotFound` and nothing changes.
pub(super) async fn mark_final(
    pool: &SqlitePool,
    user_id: i64,
    application_id: i64,
) -> Result<MarkFinalOutcome> {
    let mut tx = pool.begin().await.context("begin mark-final transaction")?;

    // The first statement writes, so concurrent updates for the same user serialize here.
    let query = r"
        UPDATE university_applications
        SET is_final_choice = 0
        WHERE user_id = ?1
          AND EXISTS (
              SELECT 1 FROM university_applications WHERE id = ?2 AND user_id = ?1
          )
    ";
    let span = info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "UPDATE",
        db.statement = query
    );
    let cleared = sqlx::query(query)
        .bind(user_id)
        .bind(application_id)
        .execute(&mut *tx)
        .instrument(span)
        .await
        .context("failed to clear final choice")?;

    if cleared.rows_affected() == 0 {
        tx.rollback().await.context("rollback mark-final transaction")?;
        return Ok(MarkFinalOutcome::NotFound);
    }

    let query = r"
        UPDATE university_applications
        SET is_final_choice = 1
        WHERE id = ?1 AND user_id = ?2
        RETURNING university_name
    ";
    let span = info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "UPDATE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(application_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .instrument(span)
        .await
        .context("failed to set final choice")?;
    let university_name: String = row.get("university_name");

    tx.commit().await.context("commit mark-final transaction")?;

    Ok(MarkFinalOutcome::Marked { university_name })
}

async fn clear_final_choice(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    user_id: i64,
) -> Result<()> {
    let query = r"
        UPDATE university_applications
        SET is_final_choice = 0
        WHERE user_id = ?1 AND is_final_choice = 1
    ";
    let span = info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "UPDATE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(user_id)
        .execute(&mut **tx)
        .instrument(span)
        .await
        .context("failed to clear final choice")?;
    Ok(())
}
