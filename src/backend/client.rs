//! HTTP client for the hosted auth (`/auth/v1`) and REST (`/rest/v1`) APIs.
//! Every request carries the public anon key; profile queries additionally
//! carry the access token of the last password grant so row-level policies
//! apply. Passwords and tokens are exposed only while building a request.

use super::{
    AuthResult, AuthService, BackendError, BoxFuture, ProfileStore,
    types::{PasswordRequest, TokenResponse},
};
use crate::{APP_USER_AGENT, session::ProviderRow};
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::{
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};
use tracing::{Instrument, debug, info_span};
use url::Url;
use uuid::Uuid;

/// Default request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const PROVIDERS_PATH: &str = "/rest/v1/Providers";
const PROVIDER_COLUMNS: &str = "practice,first_name,last_name";

/// Where the service lives and how to identify this client.
#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub base_url: Url,
    pub anon_key: SecretString,
    pub timeout: Duration,
}

impl BackendConfig {
    /// # Errors
    /// Returns an error if `base_url` does not parse or is not http(s).
    pub fn new(base_url: &str, anon_key: SecretString) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url.trim())?;

        match base_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(BackendError::Config(format!(
                    "unsupported scheme {scheme}"
                )));
            }
        }

        if base_url.host().is_none() {
            return Err(BackendError::Config("no host specified".to_string()));
        }

        Ok(Self {
            base_url,
            anon_key,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client shared by the auth and profile traits. Clones share the HTTP pool
/// and the in-memory access token.
#[derive(Clone, Debug)]
pub struct BackendClient {
    config: BackendConfig,
    http: Client,
    access_token: Arc<RwLock<Option<SecretString>>>,
}

impl BackendClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config,
            http,
            access_token: Arc::default(),
        })
    }

    /// Appends `path` to the base URL, keeping any path prefix the base has.
    ///
    /// # Errors
    /// Returns an error if the joined URL does not parse.
    pub fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        let base = self.config.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    #[must_use]
    pub fn has_access_token(&self) -> bool {
        self.access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Password grant against `/auth/v1/token`.
    ///
    /// # Errors
    /// Returns `BackendError::Api` when the service rejects the credentials and
    /// `BackendError::Http` when the request does not complete.
    pub async fn password_grant(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthResult, BackendError> {
        let mut url = self.endpoint("/auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        // A new grant replaces the identity of the previous one, even when it fails.
        self.set_access_token(None);

        let span = info_span!(
            "auth.password_grant",
            http.method = "POST",
            url.path = %url.path()
        );
        let response = self
            .with_anon_key(self.http.post(url))
            .json(&PasswordRequest {
                email,
                password: password.expose_secret(),
            })
            .send()
            .instrument(span)
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|err| BackendError::Decode(format!("token response: {err}")))?;
        let result = AuthResult::from(body);

        self.set_access_token(
            result
                .session
                .as_ref()
                .map(|session| session.access_token.clone()),
        );

        debug!(
            has_user = result.user.is_some(),
            has_session = result.session.is_some(),
            "password grant completed"
        );

        Ok(result)
    }

    /// Account registration against `/auth/v1/signup`.
    ///
    /// # Errors
    /// Returns an error if the service rejects the signup or is unreachable.
    pub async fn signup(
        &self,
        email: &str,
        password: &SecretString,
        redirect_to: &str,
    ) -> Result<(), BackendError> {
        let mut url = self.endpoint("/auth/v1/signup")?;
        url.query_pairs_mut().append_pair("redirect_to", redirect_to);

        let span = info_span!(
            "auth.signup",
            http.method = "POST",
            url.path = %url.path()
        );
        let response = self
            .with_anon_key(self.http.post(url))
            .json(&PasswordRequest {
                email,
                password: password.expose_secret(),
            })
            .send()
            .instrument(span)
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(())
    }

    /// Revokes the current access token. The local token is dropped even when
    /// the service call fails.
    ///
    /// # Errors
    /// Returns an error if the service rejects the logout or is unreachable.
    pub async fn logout(&self) -> Result<(), BackendError> {
        let Some(token) = self.take_access_token() else {
            debug!("no access token, skipping remote logout");
            return Ok(());
        };

        let url = self.endpoint("/auth/v1/logout")?;
        let span = info_span!(
            "auth.logout",
            http.method = "POST",
            url.path = %url.path()
        );
        let response = self
            .with_anon_key(self.http.post(url))
            .bearer_auth(token.expose_secret())
            .send()
            .instrument(span)
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(())
    }

    /// Fetches `Providers` rows for `provider_id`.
    ///
    /// # Errors
    /// Returns an error if the query fails or the body is not a list of rows.
    pub async fn fetch_provider_rows(
        &self,
        provider_id: Uuid,
    ) -> Result<Vec<ProviderRow>, BackendError> {
        let mut url = self.endpoint(PROVIDERS_PATH)?;
        url.query_pairs_mut()
            .append_pair("select", PROVIDER_COLUMNS)
            .append_pair("id", &format!("eq.{provider_id}"));

        let bearer = self
            .access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_else(|| self.config.anon_key.clone());

        let span = info_span!(
            "rest.select",
            http.method = "GET",
            db.table = "Providers"
        );
        let response = self
            .with_anon_key(self.http.get(url))
            .bearer_auth(bearer.expose_secret())
            .send()
            .instrument(span)
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let rows: Vec<ProviderRow> = response
            .json()
            .await
            .map_err(|err| BackendError::Decode(format!("provider rows: {err}")))?;

        debug!(rows = rows.len(), "provider rows fetched");

        Ok(rows)
    }

    fn with_anon_key(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", self.config.anon_key.expose_secret())
    }

    fn set_access_token(&self, token: Option<SecretString>) {
        let mut slot = self
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = token;
    }

    fn take_access_token(&self) -> Option<SecretString> {
        self.access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl AuthService for BackendClient {
    fn sign_in_with_password<'a>(
        &'a self,
        email: &'a str,
        password: &'a SecretString,
    ) -> BoxFuture<'a, Result<AuthResult, BackendError>> {
        Box::pin(self.password_grant(email, password))
    }

    fn sign_up<'a>(
        &'a self,
        email: &'a str,
        password: &'a SecretString,
        redirect_to: &'a str,
    ) -> BoxFuture<'a, Result<(), BackendError>> {
        Box::pin(self.signup(email, password, redirect_to))
    }

    fn sign_out(&self) -> BoxFuture<'_, Result<(), BackendError>> {
        Box::pin(self.logout())
    }
}

impl ProfileStore for BackendClient {
    fn provider_profiles(
        &self,
        provider_id: Uuid,
    ) -> BoxFuture<'_, Result<Vec<ProviderRow>, BackendError>> {
        Box::pin(self.fetch_provider_rows(provider_id))
    }
}

async fn api_error(response: Response) -> BackendError {
    let status = response.status().as_u16();
    let message = response
        .json::<Value>()
        .await
        .map(|body| error_message(&body))
        .unwrap_or_default();

    BackendError::Api { status, message }
}

/// The auth API has reported errors under several keys across versions.
fn error_message(body: &Value) -> String {
    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ANON_KEY: &str = "anon-key";
    const USER_ID: &str = "6f1c1d4e-8a38-4a57-9a4e-6b1a9a4f1c2d";

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client_for(base_url: &str) -> Result<BackendClient> {
        let config = BackendConfig::new(base_url, SecretString::from(ANON_KEY))?;
        Ok(BackendClient::new(config)?)
    }

    fn token_body() -> Value {
        json!({
            "access_token": "jwt-value",
            "refresh_token": "refresh-value",
            "token_type": "bearer",
            "expires_in": 3600,
            "user": {"id": USER_ID, "email": "doc@clinic.test"}
        })
    }

    #[test]
    fn config_rejects_unsupported_scheme() {
        let err = BackendConfig::new("ftp://example.com", SecretString::from(ANON_KEY))
            .err()
            .map(|err| err.to_string());
        assert_eq!(
            err.as_deref(),
            Some("invalid configuration: unsupported scheme ftp")
        );
    }

    #[test]
    fn endpoint_keeps_base_path_prefix() -> Result<()> {
        let client = client_for("https://db.example.com/api/")?;
        let url = client.endpoint("/auth/v1/token")?;
        assert_eq!(url.as_str(), "https://db.example.com/api/auth/v1/token");
        Ok(())
    }

    #[tokio::test]
    async fn password_grant_returns_user_and_session() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", ANON_KEY))
            .and(body_json(json!({
                "email": "doc@clinic.test",
                "password": "correct-horse"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri())?;
        let result = client
            .password_grant("doc@clinic.test", &SecretString::from("correct-horse"))
            .await?;

        let user = result.user.ok_or_else(|| anyhow!("expected user"))?;
        assert_eq!(user.id.to_string(), USER_ID);
        let session = result.session.ok_or_else(|| anyhow!("expected session"))?;
        assert_eq!(session.access_token.expose_secret(), "jwt-value");
        assert!(client.has_access_token());
        Ok(())
    }

    #[tokio::test]
    async fn password_grant_maps_rejection() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri())?;
        let err = client
            .password_grant("doc@clinic.test", &SecretString::from("wrong-password"))
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;

        match err {
            BackendError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid login credentials");
            }
            other => return Err(anyhow!("unexpected error: {other}")),
        }
        assert!(!client.has_access_token());
        Ok(())
    }

    #[tokio::test]
    async fn provider_rows_use_access_token_after_sign_in() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/Providers"))
            .and(query_param("select", "practice,first_name,last_name"))
            .and(query_param("id", format!("eq.{USER_ID}").as_str()))
            .and(header("apikey", ANON_KEY))
            .and(header("authorization", "Bearer jwt-value"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"practice": "practice-9", "first_name": "Miranda", "last_name": "Bailey"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri())?;
        client
            .password_grant("doc@clinic.test", &SecretString::from("correct-horse"))
            .await?;

        let rows = client.fetch_provider_rows(Uuid::parse_str(USER_ID)?).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].first_name.as_deref(), Some("Miranda"));
        assert_eq!(rows[0].practice, Some(json!("practice-9")));
        Ok(())
    }

    #[tokio::test]
    async fn sessionless_grant_drops_previous_token() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let second_user = Uuid::new_v4();

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(body_json(json!({"email": "first@clinic.test", "password": "correct-horse"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "first-token",
                "user": {"id": USER_ID}
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(body_json(json!({"email": "second@clinic.test", "password": "correct-horse"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": {"id": second_user}
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/Providers"))
            .and(header("authorization", "Bearer first-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/Providers"))
            .and(query_param("id", format!("eq.{second_user}").as_str()))
            .and(header("authorization", "Bearer anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri())?;
        let password = SecretString::from("correct-horse");
        client.password_grant("first@clinic.test", &password).await?;
        assert!(client.has_access_token());

        let result = client.password_grant("second@clinic.test", &password).await?;
        assert!(result.session.is_none());
        assert!(!client.has_access_token());

        let rows = client.fetch_provider_rows(second_user).await?;
        assert!(rows.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn rejected_grant_drops_previous_token() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(body_json(json!({"email": "doc@clinic.test", "password": "correct-horse"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(body_json(json!({"email": "doc@clinic.test", "password": "wrong-password"})))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error_description": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri())?;
        client
            .password_grant("doc@clinic.test", &SecretString::from("correct-horse"))
            .await?;
        assert!(client.has_access_token());

        let result = client
            .password_grant("doc@clinic.test", &SecretString::from("wrong-password"))
            .await;
        assert!(result.is_err());
        assert!(!client.has_access_token());
        Ok(())
    }

    #[tokio::test]
    async fn provider_rows_fall_back_to_anon_key() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/Providers"))
            .and(header("authorization", "Bearer anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri())?;
        let rows = client.fetch_provider_rows(Uuid::nil()).await?;
        assert!(rows.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn provider_rows_reject_malformed_body() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/Providers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rows": []})))
            .mount(&server)
            .await;

        let client = client_for(&server.uri())?;
        let err = client.fetch_provider_rows(Uuid::nil()).await.err();
        assert!(matches!(err, Some(BackendError::Decode(_))));
        Ok(())
    }

    #[tokio::test]
    async fn signup_sends_redirect_target() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/signup"))
            .and(query_param(
                "redirect_to",
                "https://portal.clinic.test/auth/callback",
            ))
            .and(body_json(json!({
                "email": "new@clinic.test",
                "password": "long-enough"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": USER_ID})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri())?;
        client
            .signup(
                "new@clinic.test",
                &SecretString::from("long-enough"),
                "https://portal.clinic.test/auth/callback",
            )
            .await?;
        Ok(())
    }

    #[tokio::test]
    async fn logout_revokes_and_drops_token() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .and(header("authorization", "Bearer jwt-value"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri())?;
        client
            .password_grant("doc@clinic.test", &SecretString::from("correct-horse"))
            .await?;
        client.logout().await?;
        assert!(!client.has_access_token());

        // Second logout has no token and stays local.
        client.logout().await?;
        Ok(())
    }
}
