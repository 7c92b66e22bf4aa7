use crate::passkey::{ApiClient, ApiConfig, PasskeyManager, RelayPlatform};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{sync::Arc, time::Duration};
use url::Url;

/// Connection settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub url: String,
    pub origin: String,
    pub session: Option<SecretString>,
    pub authenticator: Option<String>,
    pub timeout: Duration,
}

impl GlobalArgs {
    /// Resolves the origin from `url` when none is given.
    ///
    /// # Errors
    /// Returns an error if `url` is not a valid absolute URL.
    pub fn new(url: String, origin: Option<String>) -> Result<Self> {
        let origin = match origin {
            Some(origin) => origin,
            None => Url::parse(url.trim())
                .with_context(|| format!("invalid server URL: {url}"))?
                .origin()
                .ascii_serialization(),
        };

        Ok(Self {
            url,
            origin,
            session: None,
            authenticator: None,
            timeout: crate::passkey::api::DEFAULT_TIMEOUT,
        })
    }

    pub fn set_session(&mut self, session: SecretString) {
        self.session = Some(session);
    }

    /// Builds the passkey manager for these settings.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be configured.
    pub fn manager(&self) -> Result<PasskeyManager> {
        let config = ApiConfig {
            server_url: self.url.clone(),
            session: self.session.clone(),
            timeout: self.timeout,
        };
        let api = ApiClient::new(&config).context("failed to configure passkey API client")?;
        let platform = RelayPlatform::new(self.authenticator.as_deref());

        Ok(PasskeyManager::new(api, Arc::new(platform), self.origin.clone()))
    }
}
