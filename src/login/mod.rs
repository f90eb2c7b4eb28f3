//! Provider login: form validation, the submit sequence and the observable
//! form state. Credentials are validated locally, exchanged once with the auth
//! service and dropped; only the provider identity survives, in the
//! [`SessionStore`](crate::session::SessionStore).
//!
//! Flow Overview: validate → sign in → fetch the `Providers` row → store the
//! session when the row is complete → push the landing path when the service
//! issued a session. Any failure after validation sets the invalid-login flag.

pub mod controller;
mod error;
pub mod form;
pub mod navigation;

pub use controller::{
    AUTH_CALLBACK_PATH, DEFAULT_LANDING_PATH, LoginController, LoginView, SubmitOutcome,
};
pub use error::{INVALID_LOGIN_MESSAGE, LoginError, SignUpError};
pub use form::{Credentials, FieldErrors, LoginForm, validate};
pub use navigation::{HistoryNavigator, NavigationEvent, Navigator};
