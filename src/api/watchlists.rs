//! Watchlists service.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::{AccountId, NewWatchlist, Watchlist};
use crate::Result;

/// Service for watchlist operations.
///
/// # Example
///
/// ```no_run
/// use tdameritrade_rs::models::NewWatchlist;
///
/// # async fn example(client: tdameritrade_rs::TdaClient) -> tdameritrade_rs::Result<()> {
/// let account = "123456789".into();
/// client
///     .watchlists()
///     .create(&account, &NewWatchlist::equities("Tech", &["AAPL", "MSFT"]))
///     .await?;
///
/// let my_lists = client.watchlists().list(&account).await?;
/// # Ok(())
/// # }
/// ```
pub struct WatchlistsService {
    inner: Arc<ClientInner>,
}

impl WatchlistsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Get the watchlists of every account of the user.
    pub async fn list_all(&self) -> Result<Vec<Watchlist>> {
        self.inner.get("/accounts/watchlists").await
    }

    /// Get the watchlists of an account.
    pub async fn list(&self, account_id: &AccountId) -> Result<Vec<Watchlist>> {
        self.inner
            .get(&format!("/accounts/{}/watchlists", urlencoding::encode(account_id.as_str())))
            .await
    }

    /// Get a specific watchlist.
    pub async fn get(&self, account_id: &AccountId, watchlist_id: &str) -> Result<Watchlist> {
        self.inner
            .get(&format!(
                "/accounts/{}/watchlists/{}",
                urlencoding::encode(account_id.as_str()),
                urlencoding::encode(watchlist_id)
            ))
            .await
    }

    /// Create a watchlist.
    pub async fn create(&self, account_id: &AccountId, watchlist: &NewWatchlist) -> Result<()> {
        self.inner
            .post(
                &format!("/accounts/{}/watchlists", urlencoding::encode(account_id.as_str())),
                watchlist,
            )
            .await?;
        Ok(())
    }

    /// Replace the name and items of a watchlist.
    pub async fn replace(
        &self,
        account_id: &AccountId,
        watchlist_id: &str,
        watchlist: &NewWatchlist,
    ) -> Result<()> {
        self.inner
            .put(
                &format!(
                    "/accounts/{}/watchlists/{}",
                    urlencoding::encode(account_id.as_str()),
                    urlencoding::encode(watchlist_id)
                ),
                watchlist,
            )
            .await?;
        Ok(())
    }

    /// Delete a watchlist.
    pub async fn delete(&self, account_id: &AccountId, watchlist_id: &str) -> Result<()> {
        self.inner
            .delete(&format!(
                "/accounts/{}/watchlists/{}",
                urlencoding::encode(account_id.as_str()),
                urlencoding::encode(watchlist_id)
            ))
            .await?;
        Ok(())
    }
}
