//! Page handlers and the form helpers they share.
//!
//! Handlers never touch the store before the session gate
//! ([`auth::require_auth`]) has resolved a principal, and every form is
//! deserialized into a typed struct and validated before business logic runs.

pub mod auth;
pub mod checklist;
mod error;
pub mod grades;
pub mod health;
pub mod opt_guide;
pub mod pages;
pub mod root;
pub mod tracker;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::PageError;

use axum::extract::rejection::FormRejection;
use tracing::debug;

/// Trimmed, non-empty value no longer than `max_chars`.
pub(crate) fn required(label: &str, value: &str, max_chars: usize) -> Result<String, PageError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PageError::InvalidForm(format!("{label} is required.")));
    }
    if trimmed.chars().count() > max_chars {
        return Err(PageError::InvalidForm(format!(
            "{label} must be at most {max_chars} characters."
        )));
    }
    Ok(trimmed.to_string())
}

/// Map a rejected form body to a user-facing error.
pub(crate) fn form_rejected(rejection: &FormRejection) -> PageError {
    debug!("Form rejected: {rejection}");
    PageError::InvalidForm("Please fill in all required fields.".to_string())
}
