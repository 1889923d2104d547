//! Grade log: the last stop of the arrival checklist.

mod storage;

#[cfg(test)]
mod tests;

pub use storage::SubjectGrade;

use axum::{
    extract::{rejection::FormRejection, Extension, Form},
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

use self::storage::{insert_grade, list_grades};
use super::{
    auth::{require_auth, AuthConfig},
    form_rejected, required, PageError,
};
use crate::{
    api::{
        flash::{self, Flash},
        views::{self, SubjectsTemplate},
    },
    checklist::ChecklistStep,
};

const SUBJECTS_PATH: &str = "/subjects";

#[derive(ToSchema, Deserialize, Debug)]
pub struct GradeForm {
    semester: String,
    subject: String,
    grade: String,
}

#[utoipa::path(
    get,
    path = "/subjects",
    responses(
        (status = 200, description = "The user's grades", body = String, content_type = "text/html"),
        (status = 303, description = "No session, redirect to /login")
    ),
    tag = "grades"
)]
#[instrument(skip_all)]
pub async fn subjects_page(
    headers: HeaderMap,
    pool: Extension<SqlitePool>,
    config: Extension<Arc<AuthConfig>>,
) -> Response {
    let principal = match require_auth(&headers, &pool, &config).await {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    let grades = match list_grades(&pool, principal.user_id).await {
        Ok(grades) => grades,
        Err(err) => return PageError::Internal(err).redirect("/dashboard"),
    };

    views::render(
        &SubjectsTemplate {
            flash: flash::peek(&headers),
            user_name: principal.name,
            grades,
        },
        &headers,
    )
}

#[utoipa::path(
    post,
    path = "/subjects",
    request_body(content = GradeForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Grade appended (or rejected) and redirect back to /subjects")
    ),
    tag = "grades"
)]
#[instrument(skip_all)]
pub async fn add_grade(
    headers: HeaderMap,
    pool: Extension<SqlitePool>,
    config: Extension<Arc<AuthConfig>>,
    payload: Result<Form<GradeForm>, FormRejection>,
) -> Response {
    let principal = match require_auth(&headers, &pool, &config).await {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    let form = match payload {
        Ok(Form(form)) => form,
        Err(rejection) => return form_rejected(&rejection).redirect(SUBJECTS_PATH),
    };

    let fields = required("Semester", &form.semester, 20).and_then(|semester| {
        let subject = required("Subject", &form.subject, 100)?;
        let grade = required("Grade", &form.grade, 10)?;
        Ok((semester, subject, grade))
    });
    let (semester, subject, grade) = match fields {
        Ok(fields) => fields,
        Err(err) => return err.redirect(SUBJECTS_PATH),
    };

    match insert_grade(&pool, principal.user_id, &semester, &subject, &grade).await {
        Ok(grade_id) => {
            info!(user_id = principal.user_id, grade_id, "Grade added");
            flash::redirect(
                SUBJECTS_PATH,
                &Flash::success(ChecklistStep::Subjects.confirmation()),
            )
        }
        Err(err) => PageError::Internal(err).redirect(SUBJECTS_PATH),
    }
}
