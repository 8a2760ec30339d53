//! HTTP client implementation for the TD Ameritrade API.

use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::api::{
    AccountsService, InstrumentsService, MarketDataService, OrdersService, TransactionsService,
    WatchlistsService,
};
use crate::auth::{
    authorization_url, Credentials, CredentialsInput, CredentialsObserver, OAuthClient,
    TokenManager, TokenStatus,
};
use crate::{Error, Result};

use super::config::ClientConfig;
use super::executor::{ApiRequest, ApiResponse, HttpExecutor, RequestExecutor};

/// The main client for interacting with the TD Ameritrade API.
///
/// The client owns the credentials of one user session. Every authorized
/// call first makes sure the access token is fresh, refreshing it when it
/// is about to expire, and then attaches it as a bearer token.
///
/// # Example
///
/// ```no_run
/// use tdameritrade_rs::{TdaClient, ClientConfig};
/// use tdameritrade_rs::auth::{CredentialsInput, Expiry};
///
/// # async fn example() -> tdameritrade_rs::Result<()> {
/// let client = TdaClient::new(ClientConfig::new(
///     "MYAPPKEY",
///     "https://localhost:8080/callback",
/// ))?;
///
/// client
///     .set_user_access_token(
///         CredentialsInput::new("access-token")
///             .access_token_expires(Expiry::In(1800))
///             .refresh_token("refresh-token", Expiry::In(7_776_000)),
///     )
///     .await?;
///
/// let accounts = client.accounts().list(&[]).await?;
/// println!("Found {} accounts", accounts.len());
/// # Ok(())
/// # }
/// ```
pub struct TdaClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) executor: Arc<dyn RequestExecutor>,
    pub(crate) tokens: Arc<TokenManager>,
    pub(crate) config: ClientConfig,
}

impl TdaClient {
    /// Create a client that talks to the API over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the client id or callback URL is missing
    /// or the base URL is invalid.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        let executor = HttpExecutor::new(http, &config.base_url)?;

        Self::with_executor(config, Arc::new(executor))
    }

    /// Create a client that sends every request through `executor`.
    pub fn with_executor(config: ClientConfig, executor: Arc<dyn RequestExecutor>) -> Result<Self> {
        config.validate()?;

        let skew = chrono::Duration::from_std(config.refresh_skew)
            .map_err(|e| Error::Config(format!("invalid refresh skew: {}", e)))?;
        let oauth = OAuthClient::new(
            executor.clone(),
            config.oauth_client_id(),
            config.callback_url.clone(),
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                executor,
                tokens: Arc::new(TokenManager::new(oauth, skew)),
                config,
            }),
        })
    }

    /// Get the accounts service.
    pub fn accounts(&self) -> AccountsService {
        AccountsService::new(self.inner.clone())
    }

    /// Get the orders service.
    pub fn orders(&self) -> OrdersService {
        OrdersService::new(self.inner.clone())
    }

    /// Get the transactions service.
    pub fn transactions(&self) -> TransactionsService {
        TransactionsService::new(self.inner.clone())
    }

    /// Get the market data service.
    pub fn market_data(&self) -> MarketDataService {
        MarketDataService::new(self.inner.clone())
    }

    /// Get the instruments service.
    pub fn instruments(&self) -> InstrumentsService {
        InstrumentsService::new(self.inner.clone())
    }

    /// Get the watchlists service.
    pub fn watchlists(&self) -> WatchlistsService {
        WatchlistsService::new(self.inner.clone())
    }

    /// URL of the page where the user grants this application access.
    pub fn authorization_url(&self) -> String {
        let config = &self.inner.config;
        authorization_url(&config.auth_url, &config.oauth_client_id(), &config.callback_url)
    }

    /// Replace the stored credentials, e.g. with a persisted session.
    ///
    /// Passing [`CredentialsInput::logout`] clears them. An expiry that does
    /// not fit a timestamp is rejected and the stored credentials are kept.
    pub async fn set_user_access_token(&self, input: CredentialsInput) -> Result<Credentials> {
        self.inner.tokens.set_credentials(input).await
    }

    /// Exchange the authorization code from the callback for tokens.
    pub async fn authenticate(&self, code: &str) -> Result<Credentials> {
        self.inner.tokens.authenticate(code).await
    }

    /// Get a new access token with `refresh_token`.
    pub async fn refresh_access_token(&self, refresh_token: impl Into<String>) -> Result<Credentials> {
        self.inner.tokens.refresh_access_token(refresh_token).await
    }

    /// Check the access token every [`ClientConfig::monitor_interval`] and
    /// refresh it before it expires.
    ///
    /// `observer` is called with the credentials after every check. Returns
    /// `false` if the monitor is already running or no credentials are set.
    pub async fn start_access_token_expiration_monitor(
        &self,
        observer: Option<CredentialsObserver>,
    ) -> bool {
        self.inner
            .tokens
            .start_monitor(self.inner.config.monitor_interval, observer)
            .await
    }

    /// Stop the token monitor.
    pub async fn stop_access_token_expiration_monitor(&self) -> bool {
        self.inner.tokens.stop_monitor().await
    }

    /// Snapshot of the current credentials.
    pub async fn credentials(&self) -> Credentials {
        self.inner.tokens.credentials().await
    }

    /// The token manager of this client.
    pub fn token_manager(&self) -> &Arc<TokenManager> {
        &self.inner.tokens
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Send a raw request, attaching the bearer token when it is authorized.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.inner.send(request).await
    }
}

impl ClientInner {
    /// Send a request, refreshing and attaching the access token first.
    pub(crate) async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        if request.authorized {
            self.authorize(&mut request).await?;
        }

        let response = self.executor.execute(request).await?;
        if !response.is_success() {
            return Err(Error::from_api_response(
                response.status,
                response.body.unwrap_or_default(),
            ));
        }
        Ok(response)
    }

    async fn authorize(&self, request: &mut ApiRequest) -> Result<()> {
        let status = self.tokens.check_and_refresh().await;
        match status {
            TokenStatus::LoggedOut => return Err(Error::RefreshTokenExpired),
            TokenStatus::RefreshInProgress => self.tokens.wait_for_refresh().await,
            _ => {}
        }

        match self.tokens.access_token().await {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose()))
                    .map_err(|_| Error::InvalidInput("Invalid token format".to_string()))?;
                value.set_sensitive(true);
                request.headers.insert(AUTHORIZATION, value);
                Ok(())
            }
            // A session existed when the check started but is gone now
            None if status != TokenStatus::Empty => Err(Error::RefreshTokenExpired),
            None => Ok(()),
        }
    }

    /// Send a request and decode its body.
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.send(request).await?;
        Ok(serde_json::from_value(response.body.unwrap_or(Value::Null))?)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.fetch(ApiRequest::get(path)).await
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        self.fetch(ApiRequest::get(path).query(query)?).await
    }

    /// Make a POST request whose response body is ignored.
    pub(crate) async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send(ApiRequest::post(path).json(body)?).await
    }

    /// Make a PUT request whose response body is ignored.
    pub(crate) async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send(ApiRequest::put(path).json(body)?).await
    }

    /// Make a DELETE request.
    pub(crate) async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::delete(path)).await
    }
}

impl Clone for TdaClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for TdaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TdaClient")
            .field("config", &self.inner.config)
            .finish()
    }
}
