//! Askama page templates and the helper that turns them into responses.

use askama::Template;
use axum::{
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use tracing::error;

use super::{
    flash::{self, Flash},
    handlers::{grades::SubjectGrade, tracker::UniversityApplication},
};
use crate::checklist::ChecklistStep;

#[derive(Template)]
#[template(path = "login.html")]
pub(crate) struct LoginTemplate {
    pub flash: Option<Flash>,
}

#[derive(Template)]
#[template(path = "register.html")]
pub(crate) struct RegisterTemplate {
    pub flash: Option<Flash>,
}

#[derive(Template)]
#[template(path = "university_tracker.html")]
pub(crate) struct TrackerTemplate {
    pub flash: Option<Flash>,
    pub user_name: String,
    pub applications: Vec<UniversityApplication>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub(crate) struct DashboardTemplate {
    pub flash: Option<Flash>,
    pub user_name: String,
}

#[derive(Template)]
#[template(path = "checklist_step.html")]
pub(crate) struct ChecklistTemplate {
    pub flash: Option<Flash>,
    pub user_name: String,
    pub step: ChecklistStep,
    pub next_title: &'static str,
}

#[derive(Template)]
#[template(path = "subjects.html")]
pub(crate) struct SubjectsTemplate {
    pub flash: Option<Flash>,
    pub user_name: String,
    pub grades: Vec<SubjectGrade>,
}

#[derive(Template)]
#[template(path = "opt_guide.html")]
pub(crate) struct OptGuideTemplate {
    pub flash: Option<Flash>,
    pub user_name: String,
}

#[derive(Template)]
#[template(path = "skills.html")]
pub(crate) struct SkillsTemplate {
    pub flash: Option<Flash>,
    pub user_name: String,
}

/// Render `template` as HTML, clearing the flash cookie the request carried.
pub(crate) fn render<T: Template>(template: &T, request_headers: &HeaderMap) -> Response {
    let body = match template.render() {
        Ok(body) => body,
        Err(err) => {
            error!("Failed to render template: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut response = Html(body).into_response();
    if flash::present(request_headers) {
        if let Some(cookie) = flash::clear_cookie() {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
    }
    response
}
