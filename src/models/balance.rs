//! Balance and position models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::AssetType;

/// Account balances.
///
/// The API returns different subsets of these fields for cash and margin
/// accounts, so every value is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balances {
    /// Accrued interest
    #[serde(default)]
    pub accrued_interest: Option<Decimal>,
    /// Cash balance
    #[serde(default)]
    pub cash_balance: Option<Decimal>,
    /// Cash available for trading
    #[serde(default)]
    pub cash_available_for_trading: Option<Decimal>,
    /// Cash available for withdrawal
    #[serde(default)]
    pub cash_available_for_withdrawal: Option<Decimal>,
    /// Available funds (margin)
    #[serde(default)]
    pub available_funds: Option<Decimal>,
    /// Buying power (margin)
    #[serde(default)]
    pub buying_power: Option<Decimal>,
    /// Day trading buying power
    #[serde(default)]
    pub day_trading_buying_power: Option<Decimal>,
    /// Equity
    #[serde(default)]
    pub equity: Option<Decimal>,
    /// Net liquidation value
    #[serde(default)]
    pub liquidation_value: Option<Decimal>,
    /// Long market value
    #[serde(default)]
    pub long_market_value: Option<Decimal>,
    /// Short market value
    #[serde(default)]
    pub short_market_value: Option<Decimal>,
    /// Long option market value
    #[serde(default)]
    pub long_option_market_value: Option<Decimal>,
    /// Short option market value
    #[serde(default)]
    pub short_option_market_value: Option<Decimal>,
    /// Maintenance requirement
    #[serde(default)]
    pub maintenance_requirement: Option<Decimal>,
    /// Money market fund balance
    #[serde(default)]
    pub money_market_fund: Option<Decimal>,
    /// Pending deposits
    #[serde(default)]
    pub pending_deposits: Option<Decimal>,
}

/// A position held in an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Instrument held
    pub instrument: PositionInstrument,
    /// Long quantity
    #[serde(default)]
    pub long_quantity: Decimal,
    /// Short quantity
    #[serde(default)]
    pub short_quantity: Decimal,
    /// Settled long quantity
    #[serde(default)]
    pub settled_long_quantity: Option<Decimal>,
    /// Settled short quantity
    #[serde(default)]
    pub settled_short_quantity: Option<Decimal>,
    /// Average cost per unit
    #[serde(default)]
    pub average_price: Option<Decimal>,
    /// Current market value
    #[serde(default)]
    pub market_value: Option<Decimal>,
    /// Profit or loss today
    #[serde(default)]
    pub current_day_profit_loss: Option<Decimal>,
    /// Profit or loss today, in percent
    #[serde(default)]
    pub current_day_profit_loss_percentage: Option<Decimal>,
}

impl Position {
    /// Net quantity (long minus short).
    pub fn net_quantity(&self) -> Decimal {
        self.long_quantity - self.short_quantity
    }

    /// Returns `true` if the position is net short.
    pub fn is_short(&self) -> bool {
        self.net_quantity() < Decimal::ZERO
    }
}

/// Instrument reference inside a position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionInstrument {
    /// Trading symbol
    pub symbol: String,
    /// Asset type
    pub asset_type: AssetType,
    /// CUSIP
    #[serde(default)]
    pub cusip: Option<String>,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// `PUT` or `CALL` for options
    #[serde(default)]
    pub put_call: Option<String>,
    /// Underlying symbol for options
    #[serde(default)]
    pub underlying_symbol: Option<String>,
}
