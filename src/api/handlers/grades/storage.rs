use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};
use tracing::{info_span, Instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectGrade {
    pub id: i64,
    pub semester: String,
    pub subject: String,
    pub grade: String,
}

/// All grade rows of `user_id` in insertion order.
pub(super) async fn list_grades(pool: &SqlitePool, user_id: i64) -> Result<Vec<SubjectGrade>> {
    let query = r"
        SELECT id, semester, subject, grade
        FROM subject_grades
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
        .context("failed to list grades")?;

    Ok(rows
        .into_iter()
        .map(|row| SubjectGrade {
            id: row.get("id"),
            semester: row.get("semester"),
            subject: row.get("subject"),
            grade: row.get("grade"),
        })
        .collect())
}

/// Append a grade row. Duplicates are allowed.
pub(super) async fn insert_grade(
    pool: &SqlitePool,
    user_id: i64,
    semester: &str,
    subject: &str,
    grade: &str,
) -> Result<i64> {
    let query = "INSERT INTO subject_grades (user_id, semester, subject, grade) VALUES (?1, ?2, ?3, ?4)";
    let span = info_span!(
        "db.query",
        db.system = "sqlite",
        db.operation = "INSERT",
        db.statement = query
    );
    let done = sqlx::query(query)
        .bind(user_id)
        .bind(semester)
        .bind(subject)
        .bind(grade)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to insert grade")?;
    Ok(done.last_insert_rowid())
}
