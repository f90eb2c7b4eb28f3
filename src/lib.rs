//! # practice-login (Provider sign-in for the practice portal)
//!
//! `practice_login` drives the provider login flow of a medical-practice
//! application and ships the small text helpers the portal uses to render
//! provider and patient data.
//!
//! ## Login flow
//!
//! 1. **Validate:** the submitted email and password are checked locally
//!    ([`login::form::validate`]). Invalid input never reaches the network.
//! 2. **Authenticate:** the hosted auth service is asked for a password grant.
//! 3. **Profile:** the `Providers` row for the authenticated user is fetched and,
//!    when complete, written to the shared [`session::SessionStore`] as one unit.
//! 4. **Navigate:** with an active session the navigator is pushed to the
//!    landing path (`/dashboard` by default).
//!
//! Every failure after validation collapses into a single "invalid login"
//! message. The tagged [`login::LoginError`] is kept for diagnostics only.
//!
//! External collaborators (auth service, profile store, navigator) are traits
//! so the controller can be driven by the HTTP [`backend::BackendClient`] or by
//! in-memory fakes in tests. Passwords and tokens are `SecretString` and must
//! never be logged.

pub mod backend;
pub mod cli;
pub mod formatters;
pub mod login;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
