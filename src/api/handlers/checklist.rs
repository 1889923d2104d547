//! Checklist step pages. Each step shares the same two handlers, bound to its
//! path when the router is built.

use axum::{
    extract::Extension,
    http::HeaderMap,
    response::Response,
    routing::get,
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::auth::{require_auth, AuthConfig};
use crate::{
    api::{
        flash::{self, Flash},
        views::{self, ChecklistTemplate},
    },
    checklist::ChecklistStep,
};

/// Register `GET`/`POST` for every checklist page.
pub(crate) fn routes(mut router: Router) -> Router {
    for step in ChecklistStep::PAGES {
        router = router.route(
            step.path(),
            get(
                move |headers: HeaderMap,
                      pool: Extension<SqlitePool>,
                      config: Extension<Arc<AuthConfig>>| {
                    show_step(step, headers, pool, config)
                },
            )
            .post(
                move |headers: HeaderMap,
                      pool: Extension<SqlitePool>,
                      config: Extension<Arc<AuthConfig>>| {
                    complete_step(step, headers, pool, config)
                },
            ),
        );
    }
    router
}

#[instrument(skip(headers, pool, config))]
async fn show_step(
    step: ChecklistStep,
    headers: HeaderMap,
    pool: Extension<SqlitePool>,
    config: Extension<Arc<AuthConfig>>,
) -> Response {
    let principal = match require_auth(&headers, &pool, &config).await {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    views::render(
        &ChecklistTemplate {
            flash: flash::peek(&headers),
            user_name: principal.name,
            step,
            next_title: step.next().map_or("", ChecklistStep::title),
        },
        &headers,
    )
}

#[instrument(skip(headers, pool, config))]
async fn complete_step(
    step: ChecklistStep,
    headers: HeaderMap,
    pool: Extension<SqlitePool>,
    config: Extension<Arc<AuthConfig>>,
) -> Response {
    let principal = match require_auth(&headers, &pool, &config).await {
        Ok(principal) => principal,
        Err(response) => return response,
    };

    debug!(user_id = principal.user_id, "Checklist step completed");

    let next = step.next().map_or("/dashboard", ChecklistStep::path);
    flash::redirect(next, &Flash::success(step.confirmation()))
}
