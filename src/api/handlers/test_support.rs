//! Helpers for driving the full router in handler tests.

use anyhow::{anyhow, Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        Request, Response, StatusCode,
    },
    Router,
};
use sqlx::SqlitePool;
use tower::ServiceExt;

use super::auth::{session::SESSION_COOKIE_NAME, AuthConfig};
use crate::{
    api::{
        app,
        flash::{Flash, FLASH_COOKIE_NAME},
    },
    db,
};

pub(crate) struct TestApp {
    pub(crate) pool: SqlitePool,
    router: Router,
}

impl TestApp {
    pub(crate) async fn new() -> Result<Self> {
        let pool = db::memory_pool().await?;
        let router = app(pool.clone(), AuthConfig::default());
        Ok(Self { pool, router })
    }

    pub(crate) async fn get(&self, path: &str, session: Option<&str>) -> Result<Response<Body>> {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(token) = session {
            builder = builder.header(COOKIE, format!("{SESSION_COOKIE_NAME}={token}"));
        }
        let request = builder.body(Body::empty())?;
        Ok(self.router.clone().oneshot(request).await?)
    }

    pub(crate) async fn post_form(
        &self,
        path: &str,
        body: &str,
        session: Option<&str>,
    ) -> Result<Response<Body>> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(token) = session {
            builder = builder.header(COOKIE, format!("{SESSION_COOKIE_NAME}={token}"));
        }
        let request = builder.body(Body::from(body.to_string()))?;
        Ok(self.router.clone().oneshot(request).await?)
    }

    pub(crate) async fn register(&self, name: &str, email: &str, password: &str) -> Result<()> {
        let body = format!("name={name}&email={email}&password={password}");
        let response = self.post_form("/register", &body, None).await?;
        assert_eq!(location(&response).as_deref(), Some("/login"));
        Ok(())
    }

    /// Log in and return the raw session token.
    pub(crate) async fn login(&self, email: &str, password: &str) -> Result<String> {
        let body = format!("email={email}&password={password}");
        let response = self.post_form("/login", &body, None).await?;
        set_cookie(&response, SESSION_COOKIE_NAME)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| anyhow!("login did not set a session cookie"))
    }

    /// Register a fresh user and log them in.
    pub(crate) async fn signed_in(&self, name: &str, email: &str) -> Result<String> {
        self.register(name, email, "s3cret-pass").await?;
        self.login(email, "s3cret-pass").await
    }

    pub(crate) async fn count(&self, table: &str) -> Result<i64> {
        let query = format!("SELECT COUNT(*) FROM {table}");
        sqlx::query_scalar(&query)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("failed to count {table}"))
    }
}

pub(crate) fn location(response: &Response<Body>) -> Option<String> {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Value of the `Set-Cookie` header for `name`, if the response set one.
pub(crate) fn set_cookie(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| {
            let pair = value.split(';').next()?;
            let (key, val) = pair.split_once('=')?;
            (key == name).then(|| val.to_string())
        })
}

/// Decode the flash a response carries to the next page.
pub(crate) fn flash(response: &Response<Body>) -> Option<Flash> {
    let value = set_cookie(response, FLASH_COOKIE_NAME)?;
    let mut headers = axum::http::HeaderMap::new();
    headers.insert(
        COOKIE,
        format!("{FLASH_COOKIE_NAME}={value}").parse().ok()?,
    );
    crate::api::flash::peek(&headers)
}

pub(crate) fn flash_message(response: &Response<Body>) -> Option<String> {
    flash(response).map(|flash| flash.message)
}

pub(crate) async fn body_text(response: Response<Body>) -> Result<String> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}
