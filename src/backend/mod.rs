//! External collaborators of the login flow: the hosted auth service and the
//! profile data store. Both are traits so the controller can run against the
//! HTTP [`BackendClient`] in production and in-memory fakes in tests. Methods
//! return boxed `Send` futures to keep the traits object-safe.

pub mod client;
mod error;
mod types;

pub use client::{BackendClient, BackendConfig};
pub use error::BackendError;
pub use types::{AuthResult, AuthSession, AuthUser};

use crate::session::ProviderRow;
use secrecy::SecretString;
use std::{future::Future, pin::Pin, sync::Arc};
use uuid::Uuid;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Email/password authentication.
pub trait AuthService: Send + Sync {
    /// Exchanges credentials for a user and, when the account is active, a session.
    fn sign_in_with_password<'a>(
        &'a self,
        email: &'a str,
        password: &'a SecretString,
    ) -> BoxFuture<'a, Result<AuthResult, BackendError>>;

    /// Registers a new account. The confirmation email links back to `redirect_to`.
    fn sign_up<'a>(
        &'a self,
        email: &'a str,
        password: &'a SecretString,
        redirect_to: &'a str,
    ) -> BoxFuture<'a, Result<(), BackendError>>;

    /// Revokes the current session on the service.
    fn sign_out(&self) -> BoxFuture<'_, Result<(), BackendError>>;
}

/// Read access to provider profile rows.
pub trait ProfileStore: Send + Sync {
    /// Returns every `Providers` row whose id matches `provider_id`.
    fn provider_profiles(
        &self,
        provider_id: Uuid,
    ) -> BoxFuture<'_, Result<Vec<ProviderRow>, BackendError>>;
}

impl<T: AuthService + ?Sized> AuthService for Arc<T> {
    fn sign_in_with_password<'a>(
        &'a self,
        email: &'a str,
        password: &'a SecretString,
    ) -> BoxFuture<'a, Result<AuthResult, BackendError>> {
        (**self).sign_in_with_password(email, password)
    }

    fn sign_up<'a>(
        &'a self,
        email: &'a str,
        password: &'a SecretString,
        redirect_to: &'a str,
    ) -> BoxFuture<'a, Result<(), BackendError>> {
        (**self).sign_up(email, password, redirect_to)
    }

    fn sign_out(&self) -> BoxFuture<'_, Result<(), BackendError>> {
        (**self).sign_out()
    }
}

impl<T: ProfileStore + ?Sized> ProfileStore for Arc<T> {
    fn provider_profiles(
        &self,
        provider_id: Uuid,
    ) -> BoxFuture<'_, Result<Vec<ProviderRow>, BackendError>> {
        (**self).provider_profiles(provider_id)
    }
}
