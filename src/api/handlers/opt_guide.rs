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

use super::{
    auth::{require_auth, AuthConfig},
    form_rejected, PageError,
};
use crate::{
    api::{
        flash::{self, Flash},
        views::{self, OptGuideTemplate},
    },
    opt::check_window,
};

const OPT_GUIDE_PATH: &str = "/opt-guide";

#[derive(ToSchema, Deserialize, Debug)]
pub struct OptDatesForm {
    /// `YYYY-MM-DD`
    graduation_date: Option<String>,
    /// `YYYY-MM-DD`
    preferred_start_date: Option<String>,
}

#[utoipa::path(
    get,
    path = "/opt-guide",
    responses(
        (status = 200, description = "OPT date form", body = String, content_type = "text/html"),
        (status = 303, description = "No session, redirect to /login")
    ),
    tag = "opt"
)]
#[instrument(skip_all)]
pub async fn opt_guide_page(
    headers: HeaderMap,
    pool: Extension<SqlitePool>,
    config: Extension<Arc<AuthConfig>>,
) -> Response {
    let principal = match require_auth(&headers, &pool, &config).await {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    views::render(
        &OptGuideTemplate {
            flash: flash::peek(&headers),
            user_name: principal.name,
        },
        &headers,
    )
}

#[utoipa::path(
    post,
    path = "/opt-guide",
    request_body(content = OptDatesForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Dates valid, redirect to /skills; otherwise redirect back to /opt-guide with a flash message")
    ),
    tag = "opt"
)]
#[instrument(skip_all)]
pub async fn check_opt_dates(
    headers: HeaderMap,
    pool: Extension<SqlitePool>,
    config: Extension<Arc<AuthConfig>>,
    payload: Result<Form<OptDatesForm>, FormRejection>,
) -> Response {
    let principal = match require_auth(&headers, &pool, &config).await {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    let form = match payload {
        Ok(Form(form)) => form,
        Err(rejection) => return form_rejected(&rejection).redirect(OPT_GUIDE_PATH),
    };

    let (Some(graduation), Some(preferred_start)) = (
        form.graduation_date.filter(|value| !value.trim().is_empty()),
        form.preferred_start_date.filter(|value| !value.trim().is_empty()),
    ) else {
        return PageError::MissingDates.redirect(OPT_GUIDE_PATH);
    };

    match check_window(&graduation, &preferred_start) {
        Ok(window) => {
            info!(
                user_id = principal.user_id,
                earliest = %window.earliest,
                latest = %window.latest,
                "OPT dates accepted"
            );
            flash::redirect(
                "/skills",
                &Flash::success("OPT dates valid! You're ready to prepare your application."),
            )
        }
        Err(err) => PageError::from(err).redirect(OPT_GUIDE_PATH),
    }
}
