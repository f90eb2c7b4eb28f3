use crate::backend::{BackendConfig, client::DEFAULT_TIMEOUT};
use crate::login::DEFAULT_LANDING_PATH;
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::time::Duration;

/// Settings shared by every action that talks to the hosted service.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub url: String,
    pub anon_key: SecretString,
    pub landing_path: String,
    pub timeout: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(url: String, anon_key: SecretString) -> Self {
        Self {
            url,
            anon_key,
            landing_path: DEFAULT_LANDING_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn set_landing_path(&mut self, landing_path: String) {
        self.landing_path = landing_path;
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// # Errors
    /// Returns an error if the service URL is not a valid http(s) URL.
    pub fn backend_config(&self) -> Result<BackendConfig> {
        let config = BackendConfig::new(&self.url, self.anon_key.clone())
            .with_context(|| format!("invalid service URL: {}", self.url))?;
        Ok(config.with_timeout(self.timeout))
    }
}
