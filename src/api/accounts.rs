//! Accounts service for account, preference and user principal operations.

use std::sync::Arc;

use serde::Serialize;

use crate::client::ClientInner;
use crate::models::{
    AccountEnvelope, AccountField, AccountId, Balances, Position, Preferences, PrincipalField,
    SecuritiesAccount, StreamerSubscriptionKeys, UserPrincipals,
};
use crate::Result;

/// Service for account-related operations.
///
/// # Example
///
/// ```no_run
/// use tdameritrade_rs::models::AccountField;
///
/// # async fn example(client: tdameritrade_rs::TdaClient) -> tdameritrade_rs::Result<()> {
/// // List accounts with their positions
/// let accounts = client.accounts().list(&[AccountField::Positions]).await?;
/// for account in accounts {
///     println!("Account {}: {} positions", account.account_id, account.positions.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct AccountsService {
    inner: Arc<ClientInner>,
}

#[derive(Serialize)]
struct FieldsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<String>,
}

impl FieldsQuery {
    fn new(fields: impl IntoIterator<Item = &'static str>) -> Self {
        let fields: Vec<&str> = fields.into_iter().collect();
        Self {
            fields: (!fields.is_empty()).then(|| fields.join(",")),
        }
    }
}

impl AccountsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// List all accounts of the user.
    ///
    /// `fields` selects the optional sections (positions, orders) to include.
    pub async fn list(&self, fields: &[AccountField]) -> Result<Vec<SecuritiesAccount>> {
        let query = FieldsQuery::new(fields.iter().map(AccountField::as_str));
        let accounts: Vec<AccountEnvelope> = self.inner.get_with_query("/accounts", &query).await?;
        Ok(accounts.into_iter().map(|a| a.securities_account).collect())
    }

    /// Get a specific account.
    pub async fn get(
        &self,
        account_id: &AccountId,
        fields: &[AccountField],
    ) -> Result<SecuritiesAccount> {
        let query = FieldsQuery::new(fields.iter().map(AccountField::as_str));
        let account: AccountEnvelope = self
            .inner
            .get_with_query(
                &format!("/accounts/{}", urlencoding::encode(account_id.as_str())),
                &query,
            )
            .await?;
        Ok(account.securities_account)
    }

    /// Get the positions held in an account.
    pub async fn positions(&self, account_id: &AccountId) -> Result<Vec<Position>> {
        Ok(self.get(account_id, &[AccountField::Positions]).await?.positions)
    }

    /// Get the current balances of an account.
    pub async fn balances(&self, account_id: &AccountId) -> Result<Balances> {
        Ok(self
            .get(account_id, &[])
            .await?
            .current_balances
            .unwrap_or_default())
    }

    /// Get the trading preferences of an account.
    pub async fn preferences(&self, account_id: &AccountId) -> Result<Preferences> {
        self.inner
            .get(&format!("/accounts/{}/preferences", urlencoding::encode(account_id.as_str())))
            .await
    }

    /// Replace the trading preferences of an account.
    pub async fn update_preferences(
        &self,
        account_id: &AccountId,
        preferences: &Preferences,
    ) -> Result<()> {
        self.inner
            .put(
                &format!("/accounts/{}/preferences", urlencoding::encode(account_id.as_str())),
                preferences,
            )
            .await?;
        Ok(())
    }

    /// Get the authenticated user and the accounts it can access.
    pub async fn user_principals(&self, fields: &[PrincipalField]) -> Result<UserPrincipals> {
        let query = FieldsQuery::new(fields.iter().map(PrincipalField::as_str));
        self.inner.get_with_query("/userprincipals", &query).await
    }

    /// Get the streamer subscription keys for the given accounts.
    pub async fn streamer_subscription_keys(
        &self,
        account_ids: &[AccountId],
    ) -> Result<StreamerSubscriptionKeys> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Query {
            account_ids: String,
        }

        let query = Query {
            account_ids: account_ids
                .iter()
                .map(AccountId::as_str)
                .collect::<Vec<_>>()
                .join(","),
        };
        self.inner
            .get_with_query("/userprincipals/streamersubscriptionkeys", &query)
            .await
    }
}
