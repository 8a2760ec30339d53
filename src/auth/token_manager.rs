//! Access token lifecycle.

use std::sync::{Arc, Weak};

use chrono::{Duration, Utc};
use secrecy::SecretString;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::credentials::{Credentials, CredentialsInput, Token, TokenState};
use super::oauth::OAuthClient;
use crate::Result;

/// Callback invoked with the credentials after every token check, e.g. to
/// persist them.
pub type CredentialsObserver = Arc<dyn Fn(&Credentials) + Send + Sync>;

/// Outcome of [`TokenManager::check_and_refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenStatus {
    /// Another check is running; nothing was done
    RefreshInProgress,
    /// No credentials are stored
    Empty,
    /// The access token cannot be refreshed (no refresh token)
    Unrefreshable,
    /// The access token is still valid
    Fresh,
    /// The access token was refreshed
    Refreshed,
    /// The refresh call failed; credentials are unchanged
    RefreshFailed,
    /// The credentials were replaced while the refresh was in flight and
    /// the refreshed token was discarded
    Superseded,
    /// The refresh token expired and the credentials were cleared
    LoggedOut,
}

impl TokenStatus {
    fn notifies_observer(self) -> bool {
        !matches!(
            self,
            TokenStatus::RefreshInProgress | TokenStatus::Empty | TokenStatus::Unrefreshable
        )
    }
}

/// Owns the credentials of one client and keeps the access token fresh.
///
/// Only one check runs at a time. A check that finds another one running
/// returns [`TokenStatus::RefreshInProgress`] without touching the network,
/// so concurrent callers never issue more than one refresh call.
pub struct TokenManager {
    credentials: RwLock<Credentials>,
    refresh_guard: Mutex<()>,
    oauth: OAuthClient,
    skew: Duration,
    observer: RwLock<Option<CredentialsObserver>>,
    monitor: Mutex<Option<JoinHandle<()>>>,
}

impl TokenManager {
    pub(crate) fn new(oauth: OAuthClient, skew: Duration) -> Self {
        Self {
            credentials: RwLock::new(Credentials::default()),
            refresh_guard: Mutex::new(()),
            oauth,
            skew,
            observer: RwLock::new(None),
            monitor: Mutex::new(None),
        }
    }

    /// Snapshot of the current credentials.
    pub async fn credentials(&self) -> Credentials {
        self.credentials.read().await.clone()
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> TokenState {
        self.credentials.read().await.state_at(Utc::now(), self.skew)
    }

    /// Margin before expiry at which tokens count as expired.
    pub fn skew(&self) -> Duration {
        self.skew
    }

    pub(crate) async fn access_token(&self) -> Option<Token> {
        self.credentials.read().await.access.clone()
    }

    /// Replace the stored credentials.
    ///
    /// An input without an access token clears everything. An input whose
    /// expiry is out of range is rejected and the stored credentials stay
    /// as they were.
    pub async fn set_credentials(&self, input: CredentialsInput) -> Result<Credentials> {
        let credentials = input.into_credentials(Utc::now())?;
        *self.credentials.write().await = credentials.clone();

        match credentials.access_token() {
            Some(access) => tracing::debug!(
                expires_at = %access.expires_at(),
                refreshable = credentials.refresh_token().is_some(),
                "credentials updated"
            ),
            None => tracing::info!("credentials cleared"),
        }
        Ok(credentials)
    }

    /// Register the callback invoked after each check.
    pub async fn set_observer(&self, observer: Option<CredentialsObserver>) {
        *self.observer.write().await = observer;
    }

    /// Exchange an authorization code for tokens and store them.
    pub async fn authenticate(&self, code: &str) -> Result<Credentials> {
        let input = self.oauth.exchange_code(code).await?.into_input()?;
        let credentials = self.set_credentials(input).await?;
        tracing::info!("authenticated with authorization code");
        self.notify().await;
        Ok(credentials)
    }

    /// Obtain a new access token with `refresh_token` and store it.
    ///
    /// The stored refresh token is kept as is. Waits for a refresh that is
    /// already in flight.
    pub async fn refresh_access_token(&self, refresh_token: impl Into<String>) -> Result<Credentials> {
        let credentials = {
            let _guard = self.refresh_guard.lock().await;
            let refresh_token = SecretString::from(refresh_token.into());
            let input = self.oauth.refresh(&refresh_token).await?.into_input()?;
            let fresh = input.into_credentials(Utc::now())?;

            let mut credentials = self.credentials.write().await;
            credentials.access = fresh.access;
            credentials.clone()
        };

        tracing::info!("access token refreshed");
        self.notify().await;
        Ok(credentials)
    }

    /// Make sure the access token is usable, refreshing it if needed.
    ///
    /// Clears the credentials when the refresh token has expired. A failed
    /// refresh leaves the credentials as they were; the next check retries.
    pub async fn check_and_refresh(&self) -> TokenStatus {
        let status = {
            let Ok(_guard) = self.refresh_guard.try_lock() else {
                tracing::debug!("token check already in progress");
                return TokenStatus::RefreshInProgress;
            };
            self.check().await
        };

        if status.notifies_observer() {
            self.notify().await;
        }
        status
    }

    /// Wait until no check or refresh is running.
    pub(crate) async fn wait_for_refresh(&self) {
        drop(self.refresh_guard.lock().await);
    }

    async fn check(&self) -> TokenStatus {
        let snapshot = self.credentials.read().await.clone();

        match snapshot.state_at(Utc::now(), self.skew) {
            TokenState::Empty => TokenStatus::Empty,
            TokenState::Unrefreshable => TokenStatus::Unrefreshable,
            TokenState::Valid => TokenStatus::Fresh,
            TokenState::RefreshTokenExpired => {
                *self.credentials.write().await = Credentials::default();
                tracing::warn!("refresh token expired, credentials cleared");
                TokenStatus::LoggedOut
            }
            TokenState::NearExpiry => match snapshot.refresh {
                Some(refresh) => self.refresh(&refresh).await,
                None => TokenStatus::Unrefreshable,
            },
        }
    }

    async fn refresh(&self, refresh: &Token) -> TokenStatus {
        tracing::debug!("access token near expiry, refreshing");

        let fresh = match self.oauth.refresh(refresh.secret()).await {
            Ok(response) => match response
                .into_input()
                .and_then(|input| input.into_credentials(Utc::now()))
            {
                Ok(fresh) => fresh,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        code = e.code(),
                        "token refresh returned unusable token"
                    );
                    return TokenStatus::RefreshFailed;
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, code = e.code(), "token refresh failed");
                return TokenStatus::RefreshFailed;
            }
        };

        let mut credentials = self.credentials.write().await;
        let still_current = credentials
            .refresh
            .as_ref()
            .is_some_and(|current| current.same_value(refresh));
        if !still_current {
            tracing::debug!("credentials replaced during refresh, discarding refreshed token");
            return TokenStatus::Superseded;
        }

        credentials.access = fresh.access;
        if let Some(access) = &credentials.access {
            tracing::info!(expires_at = %access.expires_at(), "access token refreshed");
        }
        TokenStatus::Refreshed
    }

    async fn notify(&self) {
        let observer = self.observer.read().await.clone();
        if let Some(observer) = observer {
            let credentials = self.credentials().await;
            observer(&credentials);
        }
    }

    /// Run [`check_and_refresh`](Self::check_and_refresh) every `interval`.
    ///
    /// Returns `false` without starting anything when a monitor is already
    /// running or no credentials are stored. `observer`, if given, replaces
    /// the registered observer when the monitor starts.
    pub async fn start_monitor(
        self: &Arc<Self>,
        interval: std::time::Duration,
        observer: Option<CredentialsObserver>,
    ) -> bool {
        let mut monitor = self.monitor.lock().await;
        if monitor.as_ref().is_some_and(|handle| !handle.is_finished()) {
            tracing::debug!("token monitor already running");
            return false;
        }
        if self.credentials.read().await.is_empty() {
            tracing::debug!("no credentials, token monitor not started");
            return false;
        }

        if observer.is_some() {
            self.set_observer(observer).await;
        }

        *monitor = Some(tokio::spawn(run_monitor(Arc::downgrade(self), interval)));
        tracing::info!(interval_secs = interval.as_secs(), "token monitor started");
        true
    }

    /// Stop the monitor. Returns `false` if none was running.
    pub async fn stop_monitor(&self) -> bool {
        match self.monitor.lock().await.take() {
            Some(handle) => {
                handle.abort();
                tracing::info!("token monitor stopped");
                true
            }
            None => false,
        }
    }

    /// Returns `true` while the monitor task is running.
    pub async fn is_monitoring(&self) -> bool {
        self.monitor
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

async fn run_monitor(manager: Weak<TokenManager>, interval: std::time::Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let Some(manager) = manager.upgrade() else {
            break;
        };
        let status = manager.check_and_refresh().await;
        tracing::trace!(?status, "token monitor tick");
    }
}

impl Drop for TokenManager {
    fn drop(&mut self) {
        if let Some(handle) = self.monitor.get_mut().take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("credentials", &"[REDACTED]")
            .field("skew", &self.skew)
            .finish()
    }
}
