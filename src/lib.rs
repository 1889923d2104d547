//! # Gradpath (admissions, grades and arrival checklist)
//!
//! `gradpath` is a small server-rendered web application for a student moving
//! abroad for university. It keeps track of:
//!
//! - **Applications:** one row per university application with a free-text
//!   status. A user may designate at most one application as their final
//!   choice; the flag is moved inside a single transaction.
//! - **Grades:** an append-only log of `(semester, subject, grade)` rows.
//! - **Arrival checklist:** a fixed walkthrough (I-20, visa, travel, post-arrival)
//!   that ends at the grade log. Progress is not persisted.
//! - **OPT window:** a pure check that a preferred start date lies between 90 days
//!   before and 60 days after graduation.
//!
//! ## Sessions
//!
//! Logging in creates a random session token. The browser keeps the raw token
//! in an `HttpOnly` cookie and the database stores only its SHA-256 hash. Every
//! protected handler resolves the cookie into a [`api::Principal`] before doing
//! any work; missing, expired or orphaned sessions are redirected to `/login`.

pub mod api;
pub mod checklist;
pub mod cli;
pub mod db;
pub mod opt;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
