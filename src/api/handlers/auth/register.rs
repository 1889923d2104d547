use axum::{
    extract::{rejection::FormRejection, Extension, Form},
    http::HeaderMap,
    response::Response,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::{
    storage::{insert_user, SignupOutcome},
    utils::{hash_password_blocking, normalize_email, valid_email},
};
use crate::api::{
    flash::{self, Flash},
    handlers::{form_rejected, required, PageError},
    views::{self, RegisterTemplate},
};

#[derive(ToSchema, Deserialize)]
pub struct RegisterForm {
    name: String,
    email: String,
    password: String,
}

impl std::fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

struct NewUser {
    name: String,
    email: String,
    password: String,
}

impl RegisterForm {
    fn validate(self) -> Result<NewUser, PageError> {
        let name = required("Name", &self.name, 150)?;
        let email = normalize_email(&required("Email", &self.email, 150)?);
        if !valid_email(&email) {
            return Err(PageError::InvalidForm("Invalid email address.".to_string()));
        }
        if self.password.is_empty() {
            return Err(PageError::InvalidForm("Password is required.".to_string()));
        }
        Ok(NewUser {
            name,
            email,
            password: self.password,
        })
    }
}

#[utoipa::path(
    get,
    path = "/register",
    responses(
        (status = 200, description = "Registration form", body = String, content_type = "text/html")
    ),
    tag = "auth"
)]
pub async fn register_page(headers: HeaderMap) -> Response {
    views::render(
        &RegisterTemplate {
            flash: flash::peek(&headers),
        },
        &headers,
    )
}

#[utoipa::path(
    post,
    path = "/register",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Registered, redirect to /login; on failure redirect back to /register with a flash message")
    ),
    tag = "auth"
)]
#[instrument(skip(pool, payload))]
pub async fn register(
    pool: Extension<SqlitePool>,
    payload: Result<Form<RegisterForm>, FormRejection>,
) -> Response {
    let form = match payload {
        Ok(Form(form)) => form,
        Err(rejection) => return form_rejected(&rejection).redirect("/register"),
    };

    let user = match form.validate() {
        Ok(user) => user,
        Err(err) => return err.redirect("/register"),
    };

    let password_hash = match hash_password_blocking(user.password).await {
        Ok(hash) => hash,
        Err(err) => return PageError::Internal(err).redirect("/register"),
    };

    match insert_user(&pool, &user.name, &user.email, &password_hash).await {
        Ok(SignupOutcome::Created(user_id)) => {
            info!(user_id, "User registered");
            flash::redirect(
                "/login",
                &Flash::success("Registered successfully! You can now login."),
            )
        }
        Ok(SignupOutcome::Conflict) => PageError::DuplicateEmail.redirect("/register"),
        Err(err) => PageError::Internal(err).redirect("/register"),
    }
}
