//! Client configuration options.

use std::time::Duration;

use crate::{Error, Result};

/// Production REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.tdameritrade.com/v1";

/// Page the user is sent to for granting access.
pub const DEFAULT_AUTH_URL: &str = "https://auth.tdameritrade.com/auth";

/// Suffix TD Ameritrade expects on OAuth client ids.
pub const CLIENT_ID_SUFFIX: &str = "@AMER.OAUTHAP";

/// Configuration for the TD Ameritrade client.
///
/// # Example
///
/// ```
/// use tdameritrade_rs::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("MYAPPKEY", "https://localhost:8080/callback")
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0");
///
/// assert_eq!(config.oauth_client_id(), "MYAPPKEY@AMER.OAUTHAP");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Application consumer key, with or without the `@AMER.OAUTHAP` suffix
    pub client_id: String,
    /// Redirect URI registered for the application
    pub callback_url: String,
    /// Base URL of the REST API
    pub base_url: String,
    /// Authorization page URL
    pub auth_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Tokens expiring within this margin are refreshed
    pub refresh_skew: Duration,
    /// Period of the token expiration monitor
    pub monitor_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            callback_url: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("tdameritrade-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            refresh_skew: Duration::from_secs(5 * 60),
            monitor_interval: Duration::from_secs(60),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given application.
    pub fn new(client_id: impl Into<String>, callback_url: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            callback_url: callback_url.into(),
            ..Default::default()
        }
    }

    /// Read the configuration from the environment.
    ///
    /// `TDA_CLIENT_ID` and `TDA_CALLBACK_URL` are required; `TDA_BASE_URL`
    /// overrides the API endpoint.
    pub fn from_env() -> Result<Self> {
        let client_id = required_env("TDA_CLIENT_ID")?;
        let callback_url = required_env("TDA_CALLBACK_URL")?;
        let mut config = Self::new(client_id, callback_url);
        if let Ok(base_url) = std::env::var("TDA_BASE_URL") {
            config.base_url = base_url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Set the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the authorization page URL.
    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the margin before expiry at which tokens are refreshed.
    pub fn with_refresh_skew(mut self, skew: Duration) -> Self {
        self.refresh_skew = skew;
        self
    }

    /// Set the token monitor period.
    pub fn with_monitor_interval(mut self, interval: Duration) -> Self {
        self.monitor_interval = interval;
        self
    }

    /// The client id in the form the OAuth endpoints expect.
    pub fn oauth_client_id(&self) -> String {
        let client_id = self.client_id.trim();
        if client_id.ends_with(CLIENT_ID_SUFFIX) {
            client_id.to_string()
        } else {
            format!("{}{}", client_id, CLIENT_ID_SUFFIX)
        }
    }

    /// Check that the required settings are present.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(Error::Config("client id is required".to_string()));
        }
        if self.callback_url.trim().is_empty() {
            return Err(Error::Config("callback url is required".to_string()));
        }
        if self.monitor_interval.is_zero() {
            return Err(Error::Config("monitor interval must be positive".to_string()));
        }
        url::Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("invalid base url {:?}: {}", self.base_url, e)))?;
        Ok(())
    }
}

fn required_env(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::Config(format!("{} must be set", key)))
}
