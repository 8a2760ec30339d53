//! Account and preference models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::balance::{Balances, Position};
use super::order::Order;
use super::primitives::AccountId;

/// Wrapper returned by the account endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountEnvelope {
    /// The account itself
    pub securities_account: SecuritiesAccount,
}

/// Cash or margin account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Cash account
    Cash,
    /// Margin account
    Margin,
}

/// Trading account information.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritiesAccount {
    /// Account id
    pub account_id: String,
    /// Cash or margin
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Number of day-trade round trips in the rolling window
    #[serde(default)]
    pub round_trips: i32,
    /// Flagged as pattern day trader
    #[serde(default)]
    pub is_day_trader: bool,
    /// Restricted to closing transactions
    #[serde(default)]
    pub is_closing_only_restricted: bool,
    /// Positions (present when requested with `fields=positions`)
    #[serde(default)]
    pub positions: Vec<Position>,
    /// Orders (present when requested with `fields=orders`)
    #[serde(default)]
    pub order_strategies: Vec<Order>,
    /// Balances at the start of the day
    #[serde(default)]
    pub initial_balances: Option<Balances>,
    /// Balances now
    #[serde(default)]
    pub current_balances: Option<Balances>,
    /// Balances after pending activity settles
    #[serde(default)]
    pub projected_balances: Option<Balances>,
}

impl SecuritiesAccount {
    /// Get the account id as a strongly-typed value.
    pub fn id(&self) -> AccountId {
        AccountId::new(&self.account_id)
    }

    /// Returns `true` if this is a margin account.
    pub fn is_margin(&self) -> bool {
        matches!(self.account_type, AccountType::Margin)
    }
}

/// Optional sections to include when fetching accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountField {
    /// Include positions
    Positions,
    /// Include orders
    Orders,
}

impl AccountField {
    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountField::Positions => "positions",
            AccountField::Orders => "orders",
        }
    }
}

/// Trading preferences of an account.
///
/// Fields this crate does not model are preserved in `other`, so a fetched
/// value can be modified and sent back with `update_preferences`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Express trading enabled
    #[serde(default)]
    pub express_trading: bool,
    /// Direct options routing enabled
    #[serde(default)]
    pub direct_options_routing: bool,
    /// Direct equity routing enabled
    #[serde(default)]
    pub direct_equity_routing: bool,
    /// Default instruction for equity orders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_equity_order_leg_instruction: Option<String>,
    /// Default equity order type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_equity_order_type: Option<String>,
    /// Default equity order duration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_equity_order_duration: Option<String>,
    /// Default equity order session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_equity_order_market_session: Option<String>,
    /// Default equity quantity
    #[serde(default)]
    pub default_equity_quantity: i64,
    /// Session timeout in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token_timeout: Option<String>,
    /// Remaining fields as returned by the API
    #[serde(flatten)]
    pub other: Map<String, Value>,
}
