use axum::{
    extract::{rejection::FormRejection, Extension, Form},
    http::{header::SET_COOKIE, HeaderMap},
    response::Response,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use super::{
    session::session_cookie,
    state::AuthConfig,
    storage::{delete_expired_sessions, insert_session, lookup_login_record},
    utils::{
        generate_session_token, hash_session_token, normalize_email, now_unix,
        verify_password_blocking,
    },
};
use crate::api::{
    flash::{self, Flash},
    handlers::{form_rejected, required, PageError},
    views::{self, LoginTemplate},
};

#[derive(ToSchema, Deserialize)]
pub struct LoginForm {
    email: String,
    password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login form", body = String, content_type = "text/html")
    ),
    tag = "auth"
)]
pub async fn login_page(headers: HeaderMap) -> Response {
    views::render(
        &LoginTemplate {
            flash: flash::peek(&headers),
        },
        &headers,
    )
}

#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Session cookie set, redirect to /university-tracker; on failure redirect back to /login with a flash message")
    ),
    tag = "auth"
)]
#[instrument(skip(pool, config, payload))]
pub async fn login(
    pool: Extension<SqlitePool>,
    config: Extension<Arc<AuthConfig>>,
    payload: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    let form = match payload {
        Ok(Form(form)) => form,
        Err(rejection) => return form_rejected(&rejection).redirect("/login"),
    };

    let email = match required("Email", &form.email, 150) {
        Ok(email) => normalize_email(&email),
        Err(err) => return err.redirect("/login"),
    };

    let record = match lookup_login_record(&pool, &email).await {
        Ok(Some(record)) => record,
        Ok(None) => return PageError::UnknownEmail.redirect("/login"),
        Err(err) => return PageError::Internal(err).redirect("/login"),
    };

    match verify_password_blocking(form.password, record.password_hash).await {
        Ok(true) => (),
        Ok(false) => return PageError::BadPassword.redirect("/login"),
        Err(err) => return PageError::Internal(err).redirect("/login"),
    }

    let token = match generate_session_token() {
        Ok(token) => token,
        Err(err) => return PageError::Internal(err).redirect("/login"),
    };

    let now = now_unix();
    let not_before = now - config.session_ttl_seconds();
    match delete_expired_sessions(&pool, record.user_id, not_before).await {
        Ok(0) => (),
        Ok(pruned) => debug!(user_id = record.user_id, pruned, "Expired sessions removed"),
        Err(err) => return PageError::Internal(err).redirect("/login"),
    }

    let token_hash = hash_session_token(&token);
    if let Err(err) = insert_session(&pool, record.user_id, &token_hash, now).await {
        return PageError::Internal(err).redirect("/login");
    }

    let cookie = match session_cookie(&config, &token) {
        Ok(cookie) => cookie,
        Err(err) => return PageError::Internal(err.into()).redirect("/login"),
    };

    info!(user_id = record.user_id, name = %record.name, "User logged in");

    let mut response = flash::redirect(
        "/university-tracker",
        &Flash::success("Login successful!"),
    );
    response.headers_mut().append(SET_COOKIE, cookie);
    response
}
