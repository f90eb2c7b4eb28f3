//! Auth service payloads. Token material is wrapped in `SecretString` as soon
//! as it leaves the wire type, so these values must never be logged.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Session issued by a successful password grant.
#[derive(Clone, Debug)]
pub struct AuthSession {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    pub token_type: String,
    pub expires_in: Option<u64>,
}

/// Outcome of a password sign-in. Either part may be missing, e.g. when the
/// account still awaits email confirmation.
#[derive(Clone, Debug, Default)]
pub struct AuthResult {
    pub user: Option<AuthUser>,
    pub session: Option<AuthSession>,
}

#[derive(Serialize)]
pub(super) struct PasswordRequest<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Deserialize)]
pub(super) struct TokenResponse {
    #[serde(default)]
    pub(super) access_token: Option<String>,
    #[serde(default)]
    pub(super) refresh_token: Option<String>,
    #[serde(default)]
    pub(super) token_type: Option<String>,
    #[serde(default)]
    pub(super) expires_in: Option<u64>,
    #[serde(default)]
    pub(super) user: Option<AuthUser>,
}

impl From<TokenResponse> for AuthResult {
    fn from(response: TokenResponse) -> Self {
        let session = response.access_token.map(|token| AuthSession {
            access_token: SecretString::from(token),
            refresh_token: response.refresh_token.map(SecretString::from),
            token_type: response.token_type.unwrap_or_else(|| "bearer".to_string()),
            expires_in: response.expires_in,
        });

        Self {
            user: response.user,
            session,
        }
    }
}
