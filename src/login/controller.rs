//! Submit sequence for the provider login form.
//!
//! The controller owns the form state (`loading`, `invalid_login`) and
//! publishes it on a `watch` channel so a view can bind to it. Only one
//! submission runs at a time; a second submit while loading is refused. The
//! loading flag is cleared by a guard, so every exit path resets it.

use super::{
    INVALID_LOGIN_MESSAGE,
    error::{LoginError, SignUpError},
    form::{Credentials, FieldErrors, LoginForm, validate},
    navigation::Navigator,
};
use crate::{
    backend::{AuthService, ProfileStore},
    session::{ProviderProfile, SessionInfo, SessionStore},
};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Authenticated view pushed after a login that produced a session.
pub const DEFAULT_LANDING_PATH: &str = "/dashboard";

/// Path the sign-up confirmation email links back to, relative to the origin.
pub const AUTH_CALLBACK_PATH: &str = "/auth/callback";

/// Form state as a view renders it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginView {
    pub loading: bool,
    pub invalid_login: bool,
    pub error: Option<LoginError>,
}

impl LoginView {
    /// Message shown under the form, if any.
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        self.invalid_login.then_some(INVALID_LOGIN_MESSAGE)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Rejected(FieldErrors),
    /// Another submission is still in flight.
    Busy,
    /// Signed in and moved to the landing path.
    Navigated(String),
    /// Signed in but the service issued no session; the form stays put.
    NoSession,
    /// Any failure after validation.
    InvalidLogin(LoginError),
}

pub struct LoginController<A, P, N> {
    auth: A,
    profiles: P,
    navigator: N,
    session: SessionStore,
    landing_path: String,
    view: watch::Sender<LoginView>,
}

impl<A, P, N> LoginController<A, P, N>
where
    A: AuthService,
    P: ProfileStore,
    N: Navigator,
{
    pub fn new(auth: A, profiles: P, navigator: N, session: SessionStore) -> Self {
        let (view, _) = watch::channel(LoginView::default());
        Self {
            auth,
            profiles,
            navigator,
            session,
            landing_path: DEFAULT_LANDING_PATH.to_string(),
            view,
        }
    }

    #[must_use]
    pub fn with_landing_path(mut self, landing_path: impl Into<String>) -> Self {
        self.landing_path = landing_path.into();
        self
    }

    #[must_use]
    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Snapshot of the current form state.
    #[must_use]
    pub fn view(&self) -> LoginView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every form state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LoginView> {
        self.view.subscribe()
    }

    /// Validates and submits the form.
    ///
    /// Invalid input returns [`SubmitOutcome::Rejected`] without touching the
    /// form state. Every failure after validation sets `invalid_login` and
    /// leaves the session store untouched.
    #[instrument(skip_all)]
    pub async fn submit(&self, form: &LoginForm) -> SubmitOutcome {
        let credentials = match validate(form) {
            Ok(credentials) => credentials,
            Err(errors) => {
                debug!(%errors, "login form rejected");
                return SubmitOutcome::Rejected(errors);
            }
        };

        let Some(_loading) = LoadingGuard::acquire(&self.view) else {
            debug!("login already in flight");
            return SubmitOutcome::Busy;
        };

        match self.sign_in(&credentials).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "login failed");
                self.view.send_modify(|view| {
                    view.invalid_login = true;
                    view.error = Some(err.clone());
                });
                SubmitOutcome::InvalidLogin(err)
            }
        }
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<SubmitOutcome, LoginError> {
        let result = self
            .auth
            .sign_in_with_password(credentials.email(), credentials.password())
            .await
            .map_err(|err| LoginError::from_sign_in(&err))?;

        let user = result
            .user
            .ok_or_else(|| LoginError::InvalidCredentials("no user in response".to_string()))?;

        let rows = self
            .profiles
            .provider_profiles(user.id)
            .await
            .map_err(|err| LoginError::ProfileLookupFailure(err.to_string()))?;
        let row = rows
            .first()
            .ok_or_else(|| LoginError::ProfileLookupFailure("no provider record".to_string()))?;

        match ProviderProfile::from_row(user.id, row) {
            Some(profile) => self.session.set_provider_info(SessionInfo::from(profile)),
            None => warn!(provider_id = %user.id, "provider record incomplete, session not stored"),
        }

        if result.session.is_some() {
            self.navigator.push(&self.landing_path);
            Ok(SubmitOutcome::Navigated(self.landing_path.clone()))
        } else {
            info!(provider_id = %user.id, "signed in without a session");
            Ok(SubmitOutcome::NoSession)
        }
    }

    /// Registers a new account with the submitted form and refreshes the view.
    ///
    /// `origin` is the public base of the application; the confirmation email
    /// links to `<origin>/auth/callback`.
    ///
    /// # Errors
    /// Returns `SignUpError::Invalid` for a form that fails validation (nothing
    /// is sent) and `SignUpError::Backend` when the service call fails.
    #[instrument(skip_all)]
    pub async fn sign_up(&self, form: &LoginForm, origin: &str) -> Result<(), SignUpError> {
        let credentials = validate(form).map_err(SignUpError::Invalid)?;
        let redirect_to = format!("{}{AUTH_CALLBACK_PATH}", origin.trim_end_matches('/'));

        self.auth
            .sign_up(credentials.email(), credentials.password(), &redirect_to)
            .await?;

        self.navigator.refresh();
        Ok(())
    }

    /// Ends the provider session. The local store is cleared even when the
    /// remote sign-out fails.
    #[instrument(skip_all)]
    pub async fn sign_out(&self) {
        if let Err(err) = self.auth.sign_out().await {
            warn!(error = %err, "remote sign-out failed");
        }
        self.session.clear();
        self.view.send_if_modified(|view| {
            let changed = view.invalid_login || view.error.is_some();
            view.invalid_login = false;
            view.error = None;
            changed
        });
    }
}

/// Holds the loading flag for the duration of one submission.
struct LoadingGuard<'a> {
    view: &'a watch::Sender<LoginView>,
}

impl<'a> LoadingGuard<'a> {
    /// Sets `loading` and resets the invalid-login flag, unless a submission
    /// already holds it.
    fn acquire(view: &'a watch::Sender<LoginView>) -> Option<Self> {
        let acquired = view.send_if_modified(|state| {
            if state.loading {
                return false;
            }
            state.loading = true;
            state.invalid_login = false;
            state.error = None;
            true
        });

        acquired.then_some(Self { view })
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.view.send_modify(|state| state.loading = false);
    }
}
