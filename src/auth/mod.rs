//! Authentication and access token lifecycle for the TD Ameritrade API.
//!
//! TD Ameritrade uses OAuth2 authorization codes. The user signs in on the
//! page returned by [`TdaClient::authorization_url`](crate::TdaClient::authorization_url)
//! and is redirected to the application's callback URL with a `code`,
//! which [`TdaClient::authenticate`](crate::TdaClient::authenticate)
//! exchanges for an access token (30 minutes) and a refresh token
//! (90 days).
//!
//! The [`TokenManager`] owned by each client refreshes the access token
//! five minutes before it expires and clears the session once the refresh
//! token itself has expired.
//!
//! # Restoring a session
//!
//! ```no_run
//! use tdameritrade_rs::{TdaClient, ClientConfig};
//! use tdameritrade_rs::auth::PersistedSession;
//!
//! # async fn example(saved: &str) -> tdameritrade_rs::Result<()> {
//! let client = TdaClient::new(ClientConfig::from_env()?)?;
//!
//! let session: PersistedSession = serde_json::from_str(saved)?;
//! client.set_user_access_token(session.into_input()).await?;
//! # Ok(())
//! # }
//! ```

mod credentials;
mod oauth;
mod token_manager;

pub use credentials::{
    Credentials, CredentialsInput, Expiry, PersistedSession, Token, TokenState,
    DEFAULT_ACCESS_TOKEN_TTL,
};
pub(crate) use oauth::OAuthClient;
pub use oauth::{authorization_url, TokenResponse};
pub use token_manager::{CredentialsObserver, TokenManager, TokenStatus};
