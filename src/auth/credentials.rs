//! Token storage types.
//!
//! [`Credentials`] holds the access token and the refresh token together
//! with their expirations. A token can only exist together with its expiry,
//! and the whole value is swapped at once by the
//! [`TokenManager`](super::TokenManager).

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// Lifetime assumed for an injected access token that carries no expiry.
pub const DEFAULT_ACCESS_TOKEN_TTL: i64 = 1800;

/// A bearer or refresh token and the instant it stops being valid.
#[derive(Clone)]
pub struct Token {
    value: SecretString,
    expires_at: DateTime<Utc>,
}

impl Token {
    /// Create a token expiring at `expires_at`.
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: SecretString::from(value.into()),
            expires_at,
        }
    }

    /// The raw token value.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    /// When the token expires.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns `true` if the token is expired at `now + skew`.
    pub fn expires_within(&self, now: DateTime<Utc>, skew: Duration) -> bool {
        now.checked_add_signed(skew)
            .map_or(true, |horizon| horizon >= self.expires_at)
    }

    pub(crate) fn secret(&self) -> &SecretString {
        &self.value
    }

    pub(crate) fn same_value(&self, other: &Token) -> bool {
        self.expose() == other.expose()
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// The access and refresh tokens of one client.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub(crate) access: Option<Token>,
    pub(crate) refresh: Option<Token>,
}

impl Credentials {
    /// The current access token, if any.
    pub fn access_token(&self) -> Option<&Token> {
        self.access.as_ref()
    }

    /// The current refresh token, if any.
    pub fn refresh_token(&self) -> Option<&Token> {
        self.refresh.as_ref()
    }

    /// Returns `true` when no access token is stored.
    pub fn is_empty(&self) -> bool {
        self.access.is_none()
    }

    /// Classify these credentials at `now`, treating tokens that expire
    /// within `skew` as already expired.
    pub fn state_at(&self, now: DateTime<Utc>, skew: Duration) -> TokenState {
        let Some(access) = &self.access else {
            return TokenState::Empty;
        };
        let Some(refresh) = &self.refresh else {
            return TokenState::Unrefreshable;
        };

        if refresh.expires_within(now, skew) {
            TokenState::RefreshTokenExpired
        } else if access.expires_within(now, skew) {
            TokenState::NearExpiry
        } else {
            TokenState::Valid
        }
    }
}

/// Lifecycle state of a set of [`Credentials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenState {
    /// No access token
    Empty,
    /// Access token present but no refresh token to renew it with
    Unrefreshable,
    /// Access token usable beyond the refresh skew
    Valid,
    /// Access token about to expire; the refresh token is still good
    NearExpiry,
    /// Refresh token expired; the session must be re-authenticated
    RefreshTokenExpired,
}

/// When a token expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// At an absolute instant
    At(DateTime<Utc>),
    /// After the given number of seconds
    In(i64),
}

impl Expiry {
    /// Resolve to an absolute instant relative to `now`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the instant is out of range.
    pub fn resolve(self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        match self {
            Expiry::At(at) => Ok(at),
            Expiry::In(secs) => Duration::try_seconds(secs)
                .and_then(|lifetime| now.checked_add_signed(lifetime))
                .ok_or_else(|| {
                    Error::InvalidInput(format!("token lifetime out of range: {}s", secs))
                }),
        }
    }
}

impl From<DateTime<Utc>> for Expiry {
    fn from(at: DateTime<Utc>) -> Self {
        Expiry::At(at)
    }
}

/// Input for replacing the stored credentials.
///
/// An input without an access token logs the client out.
///
/// # Example
///
/// ```
/// use tdameritrade_rs::auth::{CredentialsInput, Expiry};
///
/// let input = CredentialsInput::new("access-token")
///     .access_token_expires(Expiry::In(1800))
///     .refresh_token("refresh-token", Expiry::In(7_776_000));
/// assert!(input.access_token.is_some());
///
/// let logout = CredentialsInput::logout();
/// assert!(logout.access_token.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CredentialsInput {
    /// Access token
    pub access_token: Option<String>,
    /// Access token expiry; defaults to [`DEFAULT_ACCESS_TOKEN_TTL`] seconds
    pub access_token_expires: Option<Expiry>,
    /// Refresh token; stored only together with its expiry
    pub refresh_token: Option<String>,
    /// Refresh token expiry
    pub refresh_token_expires: Option<Expiry>,
}

impl CredentialsInput {
    /// Input carrying `access_token`.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            ..Default::default()
        }
    }

    /// Input that clears all credentials.
    pub fn logout() -> Self {
        Self::default()
    }

    /// Set the access token expiry.
    pub fn access_token_expires(mut self, expiry: impl Into<Expiry>) -> Self {
        self.access_token_expires = Some(expiry.into());
        self
    }

    /// Set the refresh token and its expiry.
    pub fn refresh_token(mut self, token: impl Into<String>, expiry: impl Into<Expiry>) -> Self {
        self.refresh_token = Some(token.into());
        self.refresh_token_expires = Some(expiry.into());
        self
    }

    pub(crate) fn into_credentials(self, now: DateTime<Utc>) -> Result<Credentials> {
        let Some(access_token) = self.access_token else {
            return Ok(Credentials::default());
        };

        let access_expires = match self.access_token_expires {
            Some(expiry) => expiry.resolve(now)?,
            None => {
                tracing::debug!(
                    ttl_secs = DEFAULT_ACCESS_TOKEN_TTL,
                    "access token set without expiry, using default lifetime"
                );
                Expiry::In(DEFAULT_ACCESS_TOKEN_TTL).resolve(now)?
            }
        };

        let refresh = match (self.refresh_token, self.refresh_token_expires) {
            (Some(token), Some(expiry)) => Some(Token::new(token, expiry.resolve(now)?)),
            (Some(_), None) => {
                tracing::debug!("refresh token set without expiry, ignoring it");
                None
            }
            _ => None,
        };

        Ok(Credentials {
            access: Some(Token::new(access_token, access_expires)),
            refresh,
        })
    }
}

/// Conventional on-disk layout for persisting a session between runs.
///
/// The crate never reads or writes this file itself. Callers typically
/// write it from the observer passed to
/// [`TdaClient::start_access_token_expiration_monitor`](crate::TdaClient::start_access_token_expiration_monitor)
/// and feed it back through
/// [`TdaClient::set_user_access_token`](crate::TdaClient::set_user_access_token)
/// at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    /// Access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_access_token: Option<String>,
    /// Access token expiry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_expires: Option<DateTime<Utc>>,
    /// Refresh token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Refresh token expiry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token_expires: Option<DateTime<Utc>>,
    /// User principals, stored as returned by the API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principals: Option<Value>,
}

impl PersistedSession {
    /// Turn the persisted session back into credentials input.
    pub fn into_input(self) -> CredentialsInput {
        CredentialsInput {
            access_token: self.user_access_token,
            access_token_expires: self.access_token_expires.map(Expiry::At),
            refresh_token: self.refresh_token,
            refresh_token_expires: self.refresh_token_expires.map(Expiry::At),
        }
    }
}

impl From<&Credentials> for PersistedSession {
    fn from(credentials: &Credentials) -> Self {
        Self {
            user_access_token: credentials.access.as_ref().map(|t| t.expose().to_string()),
            access_token_expires: credentials.access.as_ref().map(Token::expires_at),
            refresh_token: credentials.refresh.as_ref().map(|t| t.expose().to_string()),
            refresh_token_expires: credentials.refresh.as_ref().map(Token::expires_at),
            principals: None,
        }
    }
}
