//! Authentication example.
//!
//! This example walks through the OAuth2 sign-in: it prints the TD Ameritrade
//! login page, exchanges the code from the callback URL for tokens, lists the
//! user's accounts and prints the session so it can be restored later.
//!
//! Run with: cargo run --example authenticate
//!
//! Environment variables:
//! - TDA_CLIENT_ID: consumer key of the registered app
//! - TDA_CALLBACK_URL: callback URL of the registered app

use tdameritrade_rs::auth::PersistedSession;
use tdameritrade_rs::{ClientConfig, TdaClient};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> tdameritrade_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let client = TdaClient::new(ClientConfig::from_env()?)?;

    println!("Sign in at:\n\n  {}\n", client.authorization_url());
    println!("Paste the `code` parameter of the URL you were redirected to:");

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .map_err(|e| tdameritrade_rs::Error::InvalidInput(e.to_string()))?;

    // Codes arrive URL-encoded in the callback
    let code = urlencoding::decode(line.trim())
        .map_err(|e| tdameritrade_rs::Error::InvalidInput(e.to_string()))?;

    let credentials = client.authenticate(&code).await?;
    println!("Successfully authenticated!");

    let accounts = client.accounts().list(&[]).await?;
    println!("\nFound {} account(s):", accounts.len());
    for account in &accounts {
        let balances = client.accounts().balances(&account.id()).await?;
        println!(
            "  - {} ({:?}) liquidation value: {:?}",
            account.account_id, account.account_type, balances.liquidation_value
        );
    }

    let session = PersistedSession::from(&credentials);
    println!("\nSession (store it securely):\n{}", serde_json::to_string_pretty(&session)?);

    Ok(())
}
