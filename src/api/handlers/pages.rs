//! Informational pages behind the session gate.

use axum::{extract::Extension, http::HeaderMap, response::Response};
use sqlx::SqlitePool;
use std::sync::Arc;

use super::auth::{require_auth, AuthConfig};
use crate::api::{
    flash,
    views::{self, DashboardTemplate, SkillsTemplate},
};

#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = String, content_type = "text/html"),
        (status = 303, description = "No session, redirect to /login")
    ),
    tag = "pages"
)]
pub async fn dashboard(
    headers: HeaderMap,
    pool: Extension<SqlitePool>,
    config: Extension<Arc<AuthConfig>>,
) -> Response {
    let principal = match require_auth(&headers, &pool, &config).await {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    views::render(
        &DashboardTemplate {
            flash: flash::peek(&headers),
            user_name: principal.name,
        },
        &headers,
    )
}

#[utoipa::path(
    get,
    path = "/skills",
    responses(
        (status = 200, description = "Skills page", body = String, content_type = "text/html"),
        (status = 303, description = "No session, redirect to /login")
    ),
    tag = "pages"
)]
pub async fn skills(
    headers: HeaderMap,
    pool: Extension<SqlitePool>,
    config: Extension<Arc<AuthConfig>>,
) -> Response {
    let principal = match require_auth(&headers, &pool, &config).await {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    views::render(
        &SkillsTemplate {
            flash: flash::peek(&headers),
            user_name: principal.name,
        },
        &headers,
    )
}
