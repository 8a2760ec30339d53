//! Order placement example.
//!
//! This example restores a saved session, keeps the access token fresh with
//! the expiration monitor and places a good-till-cancel limit order through
//! the `buy_stock` preset. The limit price is far below the market so the
//! order rests; it is cancelled again at the end.
//!
//! Run with: cargo run --example place_order
//!
//! Environment variables:
//! - TDA_CLIENT_ID, TDA_CALLBACK_URL: as for the `authenticate` example
//! - TDA_SESSION: path to the session JSON printed by `authenticate`
//! - TDA_ACCOUNT: account to trade in

use std::sync::Arc;

use rust_decimal_macros::dec;
use tdameritrade_rs::auth::{Credentials, CredentialsObserver, PersistedSession};
use tdameritrade_rs::models::OrderRequest;
use tdameritrade_rs::{AccountId, ClientConfig, Error, TdaClient};

#[tokio::main]
async fn main() -> tdameritrade_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let session_path = std::env::var("TDA_SESSION")
        .map_err(|_| Error::Config("TDA_SESSION environment variable required".into()))?;
    let account = std::env::var("TDA_ACCOUNT")
        .map_err(|_| Error::Config("TDA_ACCOUNT environment variable required".into()))?;

    let saved = tokio::fs::read_to_string(&session_path)
        .await
        .map_err(|e| Error::Config(format!("cannot read {}: {}", session_path, e)))?;
    let session: PersistedSession = serde_json::from_str(&saved)?;

    let client = TdaClient::new(ClientConfig::from_env()?)?;
    client.set_user_access_token(session.into_input()).await?;

    // Persist every refreshed token so the next run can pick it up
    let path = session_path.clone();
    let observer: CredentialsObserver = Arc::new(move |credentials: &Credentials| {
        let session = PersistedSession::from(credentials);
        match serde_json::to_string_pretty(&session) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!(error = %e, "failed to persist session");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to encode session"),
        }
    });
    client
        .start_access_token_expiration_monitor(Some(observer))
        .await;

    let request = OrderRequest::new(&account, "SPY")
        .quantity(dec!(1))
        .price(dec!(1.00));

    println!("Placing BUY 1 SPY @ 1.00 (GTC limit)...");
    match client.orders().buy_stock(request).await? {
        Some(order_id) => {
            let account = AccountId::new(&account);
            let order = client.orders().get(&account, &order_id).await?;
            println!("Order {} is {:?}", order_id, order.status);

            if order.is_cancelable() {
                client.orders().cancel(&account, &order_id).await?;
                println!("Order {} cancelled", order_id);
            }
        }
        None => println!("Order accepted, but no order id was returned"),
    }

    client.stop_access_token_expiration_monitor().await;
    Ok(())
}
