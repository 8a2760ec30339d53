//! # tdameritrade-rs
//!
//! An async Rust client for the TD Ameritrade brokerage REST API.
//!
//! The client owns the OAuth2 access token lifecycle: it refreshes the
//! access token shortly before it expires, serializes concurrent refreshes
//! and signs the user out once the refresh token has expired. On top of
//! that it offers typed services for accounts, orders, transactions,
//! market data, instruments and watchlists.
//!
//! ## Features
//!
//! - **Authentication**: authorization-code exchange, token injection and refresh
//! - **Token monitor**: background task that keeps the access token fresh
//! - **Order presets**: validated limit orders for stocks and options
//! - **Account Management**: accounts, positions, balances, preferences, history
//! - **Market Data**: quotes, price history, option chains, movers, market hours
//! - **Pluggable transport**: every request goes through a [`RequestExecutor`](client::RequestExecutor)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tdameritrade_rs::{TdaClient, ClientConfig};
//! use tdameritrade_rs::auth::CredentialsInput;
//!
//! #[tokio::main]
//! async fn main() -> tdameritrade_rs::Result<()> {
//!     let client = TdaClient::new(ClientConfig::new(
//!         "MY_APP_KEY",
//!         "https://localhost:8080/callback",
//!     ))?;
//!
//!     // Send the user here, then exchange the code from the callback
//!     println!("Sign in at {}", client.authorization_url());
//!     client.authenticate("code-from-callback").await?;
//!
//!     // Keep the access token fresh in the background
//!     client.start_access_token_expiration_monitor(None).await;
//!
//!     let accounts = client.accounts().list(&[]).await?;
//!     println!("Found {} accounts", accounts.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Order Placement
//!
//! ```rust,no_run
//! use tdameritrade_rs::{TdaClient, ClientConfig};
//! use tdameritrade_rs::models::OrderRequest;
//! use rust_decimal_macros::dec;
//!
//! #[tokio::main]
//! async fn main() -> tdameritrade_rs::Result<()> {
//!     let client = TdaClient::new(ClientConfig::from_env()?)?;
//!
//!     let request = OrderRequest::new("123456789", "AAPL")
//!         .quantity(dec!(10))
//!         .price(dec!(150.00));
//!
//!     // Submits a GOOD_TILL_CANCEL limit order with instruction BUY
//!     let order_id = client.orders().buy_stock(request).await?;
//!     println!("Order placed: {:?}", order_id);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use error::{Error, Result};
pub use models::{AccountId, OrderId, Symbol};
pub use client::{ClientConfig, TdaClient};
pub use auth::{Credentials, CredentialsInput, TokenStatus};

/// Prelude module for convenient imports.
///
/// ```rust
/// use tdameritrade_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        // Primitives
        AccountId, OrderId, Symbol,
        // Enums
        AssetType, Instruction, OrderType, OrderStatus, PositionEffect, PositionSide,
        TimeInForce, TransactionType,
        // Account models
        SecuritiesAccount, Balances, Position,
        // Order models
        NewOrder, NewOrderBuilder, Order, OrderLeg, OrderRequest,
        // Market data
        Quote, Quotes,
    };
    pub use crate::client::{ApiRequest, ApiResponse, ClientConfig, RequestExecutor, TdaClient};
    pub use crate::auth::{
        Credentials, CredentialsInput, CredentialsObserver, Expiry, TokenManager, TokenStatus,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_creation() {
        let account = AccountId::new("123456789");
        assert_eq!(account.as_str(), "123456789");
    }

    #[test]
    fn test_symbols_are_upper_cased() {
        assert_eq!(Symbol::new(" aapl ").as_str(), "AAPL");
    }

    #[test]
    fn test_default_config_points_at_production() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, client::DEFAULT_BASE_URL);
        assert_eq!(config.refresh_skew, std::time::Duration::from_secs(300));
    }
}
