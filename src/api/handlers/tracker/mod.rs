//! University application tracker: list, add, and pick a final choice.

mod storage;


pub use storage::UniversityApplication;

use axum::{
    extract::{
        rejection::{FormRejection, PathRejection},
        Extension, Form, Path,
    },
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

use self::storage::{
    insert_application, list_applications, mark_final as mark_final_choice, MarkFinalOutcome,
    NewApplication,
};
use super::{
    auth::{require_auth, AuthConfig},
    form_rejected, required, PageError,
};
use crate::api::{
    flash::{self, Flash},
    views::{self, TrackerTemplate},
};

const TRACKER_PATH: &str = "/university-tracker";

#[derive(ToSchema, Deserialize, Debug)]
pub struct ApplicationForm {
    university: String,
    program: String,
    /// Free text, usually Accepted, Rejected or Pending.
    status: String,
    /// Present (any value) when the final-choice checkbox is ticked.
    final_choice: Option<String>,
}

impl ApplicationForm {
    fn validate(self) -> Result<NewApplication, PageError> {
        Ok(NewApplication {
            university_name: required("University", &self.university, 150)?,
            program_name: required("Program", &self.program, 150)?,
            status: required("Status", &self.status, 50)?,
            is_final_choice: self.final_choice.is_some(),
        })
    }
}

#[utoipa::path(
    get,
    path = "/university-tracker",
    responses(
        (status = 200, description = "The user's applications", body = String, content_type = "text/html"),
        (status = 303, description = "No session, redirect to /login")
    ),
    tag = "tracker"
)]
#[instrument(skip_all)]
pub async fn university_tracker_page(
    headers: HeaderMap,
    pool: Extension<SqlitePool>,
    config: Extension<Arc<AuthConfig>>,
) -> Response {
    let principal = match require_auth(&headers, &pool, &config).await {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    let applications = match list_applications(&pool, principal.user_id).await {
        Ok(applications) => applications,
        Err(err) => return PageError::Internal(err).redirect("/dashboard"),
    };

    views::render(
        &TrackerTemplate {
            flash: flash::peek(&headers),
            user_name: principal.name,
            applications,
        },
        &headers,
    )
}

#[utoipa::path(
    post,
    path = "/university-tracker",
    request_body(content = ApplicationForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Application stored (or rejected) and redirect back to the tracker")
    ),
    tag = "tracker"
)]
#[instrument(skip_all)]
pub async fn add_application(
    headers: HeaderMap,
    pool: Extension<SqlitePool>,
    config: Extension<Arc<AuthConfig>>,
    payload: Result<Form<ApplicationForm>, FormRejection>,
) -> Response {
    let principal = match require_auth(&headers, &pool, &config).await {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    let application = match payload {
        Ok(Form(form)) => match form.validate() {
            Ok(application) => application,
            Err(err) => return err.redirect(TRACKER_PATH),
        },
        Err(rejection) => return form_rejected(&rejection).redirect(TRACKER_PATH),
    };

    match insert_application(&pool, principal.user_id, &application).await {
        Ok(application_id) => {
            info!(
                user_id = principal.user_id,
                application_id,
                final_choice = application.is_final_choice,
                "Application added"
            );
            flash::redirect(TRACKER_PATH, &Flash::success("Application added!"))
        }
        Err(err) => PageError::Internal(err).redirect(TRACKER_PATH),
    }
}

#[utoipa::path(
    post,
    path = "/mark-final/{id}",
    params(
        ("id" = i64, Path, description = "Application id")
    ),
    responses(
        (status = 303, description = "Final choice moved (or application not found) and redirect back to the tracker")
    ),
    tag = "tracker"
)]
#[instrument(skip_all)]
pub async fn mark_final(
    headers: HeaderMap,
    pool: Extension<SqlitePool>,
    config: Extension<Arc<AuthConfig>>,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    let principal = match require_auth(&headers, &pool, &config).await {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    // A non-numeric id cannot name one of the user's applications.
    let Ok(Path(application_id)) = id else {
        return PageError::NotFoundOrUnauthorized.redirect(TRACKER_PATH);
    };

    match mark_final_choice(&pool, principal.user_id, application_id).await {
        Ok(MarkFinalOutcome::Marked { university_name }) => {
            info!(
                user_id = principal.user_id,
                application_id, "Final choice updated"
            );
            flash::redirect(
                TRACKER_PATH,
                &Flash::success(format!("{university_name} marked as your final choice.")),
            )
        }
        Ok(MarkFinalOutcome::NotFound) => PageError::NotFoundOrUnauthorized.redirect(TRACKER_PATH),
        Err(err) => PageError::Internal(err).redirect(TRACKER_PATH),
    }
}
