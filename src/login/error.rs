use crate::backend::BackendError;
use crate::login::form::FieldErrors;
use thiserror::Error;

/// The only message a provider ever sees for a failed login.
pub const INVALID_LOGIN_MESSAGE: &str = "Invalid login credentials";

/// Why a login attempt failed. All variants surface as the same
/// [`INVALID_LOGIN_MESSAGE`]; the variant and detail are for logs.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
    #[error("network failure: {0}")]
    NetworkFailure(String),
    #[error("profile lookup failed: {0}")]
    ProfileLookupFailure(String),
}

impl LoginError {
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        INVALID_LOGIN_MESSAGE
    }

    pub(crate) fn from_sign_in(err: &BackendError) -> Self {
        if err.is_rejection() {
            Self::InvalidCredentials(err.to_string())
        } else {
            Self::NetworkFailure(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum SignUpError {
    #[error("invalid sign-up form: {0}")]
    Invalid(FieldErrors),
    #[error(transparent)]
    Backend(#[from] BackendError),
}
