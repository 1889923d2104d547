//! One-shot flash messages.
//!
//! A flash is set on a redirect and read by the page that follows it. The
//! message travels in a short-lived cookie as base64url-encoded JSON; rendering
//! a page that received one clears it again.

use axum::{
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::cookies::{build_cookie, cookie_value};

pub const FLASH_COOKIE_NAME: &str = "gradpath_flash";
const FLASH_MAX_AGE_SECONDS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Warning,
    Danger,
}

impl Level {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    #[must_use]
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Level::Success, message)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    fn encode(&self) -> Option<String> {
        let json = serde_json::to_vec(self).ok()?;
        Some(URL_SAFE_NO_PAD.encode(json))
    }

    fn decode(value: &str) -> Option<Self> {
        let json = URL_SAFE_NO_PAD.decode(value.as_bytes()).ok()?;
        serde_json::from_slice(&json).ok()
    }
}

/// Redirect to `to`, carrying `flash` to the next page.
pub fn redirect(to: &str, flash: &Flash) -> Response {
    let mut response = Redirect::to(to).into_response();
    match flash
        .encode()
        .and_then(|value| build_cookie(FLASH_COOKIE_NAME, &value, FLASH_MAX_AGE_SECONDS, false).ok())
    {
        Some(cookie) => {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
        None => warn!("Failed to encode flash message: {}", flash.message),
    }
    response
}

/// Flash carried by the request, if any. Unreadable cookies are ignored.
pub fn peek(headers: &HeaderMap) -> Option<Flash> {
    cookie_value(headers, FLASH_COOKIE_NAME).and_then(|value| Flash::decode(&value))
}

/// Whether the request carried a flash cookie that should be cleared.
pub(crate) fn present(headers: &HeaderMap) -> bool {
    cookie_value(headers, FLASH_COOKIE_NAME).is_some()
}

pub(crate) fn clear_cookie() -> Option<HeaderValue> {
    build_cookie(FLASH_COOKIE_NAME, "", 0, false).ok()
}
