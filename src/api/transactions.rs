//! Transactions service for account history.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::client::ClientInner;
use crate::models::{AccountId, Transaction, TransactionType};
use crate::Result;

/// Service for transaction history operations.
///
/// # Example
///
/// ```no_run
/// use tdameritrade_rs::AccountId;
/// use tdameritrade_rs::api::TransactionsQuery;
/// use tdameritrade_rs::models::{transaction, TransactionType};
///
/// # async fn example(client: tdameritrade_rs::TdaClient) -> tdameritrade_rs::Result<()> {
/// let account = AccountId::new("123456789");
///
/// let trades = client
///     .transactions()
///     .list(&account, Some(TransactionsQuery::of_type(TransactionType::Trade)))
///     .await?;
/// for (symbol, group) in transaction::group_by_symbol(&trades) {
///     println!("{}: {}", symbol, transaction::total_net_amount(group));
/// }
/// # Ok(())
/// # }
/// ```
pub struct TransactionsService {
    inner: Arc<ClientInner>,
}

/// Query parameters for listing transactions.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsQuery {
    /// Filter by transaction type
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    /// Filter by symbol
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Start of date range (at most one year back)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// End of date range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl TransactionsQuery {
    /// Only transactions of `transaction_type`.
    pub fn of_type(transaction_type: TransactionType) -> Self {
        Self {
            transaction_type: Some(transaction_type),
            ..Default::default()
        }
    }

    /// Restrict to `symbol`.
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Restrict to the given date range.
    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }
}

impl TransactionsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List transactions for an account.
    pub async fn list(
        &self,
        account_id: &AccountId,
        query: Option<TransactionsQuery>,
    ) -> Result<Vec<Transaction>> {
        let path = format!("/accounts/{}/transactions", urlencoding::encode(account_id.as_str()));
        match query {
            Some(q) => self.inner.get_with_query(&path, &q).await,
            None => self.inner.get(&path).await,
        }
    }

    /// Get a specific transaction by id.
    pub async fn get(&self, account_id: &AccountId, transaction_id: i64) -> Result<Transaction> {
        self.inner
            .get(&format!(
                "/accounts/{}/transactions/{}",
                urlencoding::encode(account_id.as_str()),
                transaction_id
            ))
            .await
    }
}
