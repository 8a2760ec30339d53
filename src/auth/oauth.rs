//! OAuth2 endpoints: authorization URL, code exchange and refresh grant.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;

use super::credentials::{CredentialsInput, Expiry};
use crate::client::{ApiRequest, RequestExecutor};
use crate::{Error, Result};

const TOKEN_PATH: &str = "/oauth2/token";

/// Build the URL the user visits to grant access.
///
/// ```
/// let url = tdameritrade_rs::auth::authorization_url(
///     "https://auth.tdameritrade.com/auth",
///     "KEY@AMER.OAUTHAP",
///     "https://localhost:8080/callback",
/// );
/// assert_eq!(
///     url,
///     "https://auth.tdameritrade.com/auth?response_type=code\
///      &redirect_uri=https%3A%2F%2Flocalhost%3A8080%2Fcallback\
///      &client_id=KEY%40AMER.OAUTHAP"
/// );
/// ```
pub fn authorization_url(auth_url: &str, client_id: &str, redirect_uri: &str) -> String {
    format!(
        "{}?response_type=code&redirect_uri={}&client_id={}",
        auth_url,
        urlencoding::encode(redirect_uri),
        urlencoding::encode(client_id)
    )
}

/// Response of the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// New access token
    #[serde(default)]
    pub access_token: Option<String>,
    /// New refresh token (code exchange only)
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Granted scope
    #[serde(default)]
    pub scope: Option<String>,
    /// Token type, normally `Bearer`
    #[serde(default)]
    pub token_type: Option<String>,
    /// Access token lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Refresh token lifetime in seconds
    #[serde(default)]
    pub refresh_token_expires_in: Option<i64>,
}

impl TokenResponse {
    /// Turn the response into credentials input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAccessToken`] if the response carries no
    /// access token.
    pub fn into_input(self) -> Result<CredentialsInput> {
        let access_token = self
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(Error::MissingAccessToken)?;

        let (refresh_token, refresh_token_expires) =
            match (self.refresh_token, self.refresh_token_expires_in) {
                (Some(token), Some(secs)) => (Some(token), Some(Expiry::In(secs))),
                _ => (None, None),
            };

        Ok(CredentialsInput {
            access_token: Some(access_token),
            access_token_expires: self.expires_in.map(Expiry::In),
            refresh_token,
            refresh_token_expires,
        })
    }
}

/// Client for the token endpoint.
#[derive(Clone)]
pub(crate) struct OAuthClient {
    executor: Arc<dyn RequestExecutor>,
    client_id: String,
    redirect_uri: String,
}

impl OAuthClient {
    pub(crate) fn new(
        executor: Arc<dyn RequestExecutor>,
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            executor,
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Exchange an authorization code for tokens.
    pub(crate) async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let request = ApiRequest::post(TOKEN_PATH).unauthorized().form([
            ("grant_type", "authorization_code"),
            ("access_type", "offline"),
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
        ]);
        self.token_request(request).await
    }

    /// Obtain a new access token with `refresh_token`.
    pub(crate) async fn refresh(&self, refresh_token: &SecretString) -> Result<TokenResponse> {
        let request = ApiRequest::post(TOKEN_PATH).unauthorized().form([
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.expose_secret()),
            ("client_id", self.client_id.as_str()),
        ]);
        self.token_request(request).await
    }

    async fn token_request(&self, request: ApiRequest) -> Result<TokenResponse> {
        let response = self.executor.execute(request).await?;
        if !response.is_success() {
            return Err(Error::from_api_response(
                response.status,
                response.body.unwrap_or_default(),
            ));
        }
        match response.body {
            // Not JSON, e.g. a maintenance page
            Some(Value::String(text)) => Err(Error::unknown(Some(text))),
            Some(body) => Ok(serde_json::from_value(body)?),
            None => Err(Error::MissingAccessToken),
        }
    }
}
