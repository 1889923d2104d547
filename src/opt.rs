//! OPT start-date window check.
//!
//! A preferred program start date is accepted when it falls within
//! `[graduation - 90 days, graduation + 60 days]`, both ends inclusive.

use chrono::{Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DAYS_BEFORE_GRADUATION: u64 = 90;
pub const DAYS_AFTER_GRADUATION: u64 = 60;

// chrono alone accepts signed and padded years.
static DATE_SHAPE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").ok());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OptError {
    #[error("Invalid date format. Please use YYYY-MM-DD.")]
    InvalidDateFormat,
    #[error(
        "Start date is not within the valid OPT window (90 days before to 60 days after graduation)."
    )]
    OutOfWindow { earliest: NaiveDate, latest: NaiveDate },
}

/// Inclusive range of acceptable start dates for a graduation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptWindow {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

impl OptWindow {
    /// Window around `graduation`. Dates at the edge of the calendar saturate.
    #[must_use]
    pub fn around(graduation: NaiveDate) -> Self {
        let earliest = graduation
            .checked_sub_days(Days::new(DAYS_BEFORE_GRADUATION))
            .unwrap_or(NaiveDate::MIN);
        let latest = graduation
            .checked_add_days(Days::new(DAYS_AFTER_GRADUATION))
            .unwrap_or(NaiveDate::MAX);
        Self { earliest, latest }
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.earliest <= date && date <= self.latest
    }
}

/// Parse a `YYYY-MM-DD` date. Whitespace, signs and extra digits are rejected.
///
/// # Errors
/// Returns [`OptError::InvalidDateFormat`] if the input does not match the format.
pub fn parse_date(input: &str) -> Result<NaiveDate, OptError> {
    let shaped = DATE_SHAPE
        .as_ref()
        .is_some_and(|shape| shape.is_match(input));
    if !shaped {
        return Err(OptError::InvalidDateFormat);
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| OptError::InvalidDateFormat)
}

/// Validate a preferred start date against a graduation date.
///
/// # Errors
/// Returns [`OptError::InvalidDateFormat`] if either date fails to parse and
/// [`OptError::OutOfWindow`] if the start date lies outside the window.
pub fn check_window(graduation: &str, preferred_start: &str) -> Result<OptWindow, OptError> {
    let graduation = parse_date(graduation)?;
    let preferred_start = parse_date(preferred_start)?;

    let window = OptWindow::around(graduation);
    if window.contains(preferred_start) {
        Ok(window)
    } else {
        Err(OptError::OutOfWindow {
            earliest: window.earliest,
            latest: window.latest,
        })
    }
}
