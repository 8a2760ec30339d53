//! HTTP client and service layer for the TD Ameritrade API.
//!
//! This module provides the main entry point [`TdaClient`] for interacting
//! with the TD Ameritrade API, and the [`RequestExecutor`] seam every request
//! passes through.
//!
//! # Example
//!
//! ```no_run
//! use tdameritrade_rs::{TdaClient, ClientConfig};
//!
//! # async fn example() -> tdameritrade_rs::Result<()> {
//! let client = TdaClient::new(ClientConfig::from_env()?)?;
//! println!("Visit {} to sign in", client.authorization_url());
//!
//! let credentials = client.authenticate("code-from-callback").await?;
//! let accounts = client.accounts().list(&[]).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod executor;
mod http;
#[cfg(test)]
pub(crate) mod testing;

pub use config::{ClientConfig, CLIENT_ID_SUFFIX, DEFAULT_AUTH_URL, DEFAULT_BASE_URL};
pub use executor::{ApiRequest, ApiResponse, HttpExecutor, RequestBody, RequestExecutor};
pub use http::TdaClient;
pub(crate) use http::ClientInner;
