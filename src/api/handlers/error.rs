//! User-facing failures and how they surface: a flash message plus a redirect.

use axum::response::Response;
use thiserror::Error;
use tracing::{debug, error};

use crate::{
    api::flash::{self, Flash, Level},
    opt::OptError,
};

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Email already registered. Please login.")]
    DuplicateEmail,
    #[error("Email not registered. Please register first.")]
    UnknownEmail,
    #[error("Incorrect password. Try again.")]
    BadPassword,
    #[error("Both dates are required.")]
    MissingDates,
    #[error(transparent)]
    Opt(#[from] OptError),
    #[error("Application not found or unauthorized.")]
    NotFoundOrUnauthorized,
    #[error("Please log in first.")]
    MissingSessionAuth,
    #[error("{0}")]
    InvalidForm(String),
    #[error("Something went wrong. Please try again.")]
    Internal(#[source] anyhow::Error),
}

impl PageError {
    #[must_use]
    pub const fn level(&self) -> Level {
        match self {
            Self::UnknownEmail | Self::MissingSessionAuth => Level::Warning,
            _ => Level::Danger,
        }
    }

    /// Flash this error and redirect to `to`.
    pub fn redirect(self, to: &str) -> Response {
        if let Self::Internal(err) = &self {
            error!("Request failed: {err:#}");
        } else {
            debug!("Rejected request: {self}");
        }
        flash::redirect(to, &Flash::new(self.level(), self.to_string()))
    }
}

impl From<anyhow::Error> for PageError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}
