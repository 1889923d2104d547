//! Registration, login, sessions and the session gate.
//!
//! Passwords are stored as Argon2id PHC strings. A successful login issues a
//! random 32-byte token: the browser gets the raw value in the
//! `gradpath_session` cookie, the `sessions` table only its SHA-256 hash.
//!
//! A session resolves to a [`Principal`] only while it is younger than the
//! configured TTL and its user still exists; anything else is treated as
//! signed out.

pub(crate) mod login;
pub(crate) mod principal;
pub(crate) mod register;
pub(crate) mod session;
mod state;
mod storage;
mod utils;

pub use principal::{require_auth, Principal};
pub use state::AuthConfig;
#[cfg(test)]
pub(crate) use storage::lookup_login_record;

#[cfg(test)]
mod tests;
