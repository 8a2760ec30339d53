//! Option chain models.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Contracts to include in an option chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractType {
    /// Calls only
    Call,
    /// Puts only
    Put,
    /// Calls and puts
    #[default]
    All,
}

/// Strike range relative to the underlying price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrikeRange {
    /// In the money
    #[serde(rename = "ITM")]
    InTheMoney,
    /// Near the money
    #[serde(rename = "NTM")]
    NearTheMoney,
    /// Out of the money
    #[serde(rename = "OTM")]
    OutOfTheMoney,
    /// Strikes above market
    #[serde(rename = "SAK")]
    StrikesAboveMarket,
    /// Strikes below market
    #[serde(rename = "SBK")]
    StrikesBelowMarket,
    /// Strikes near market
    #[serde(rename = "SNK")]
    StrikesNearMarket,
    /// All strikes
    #[serde(rename = "ALL")]
    All,
}

/// Expiration key (`YYYY-MM-DD:days`) to strike (`"120.0"`) to contracts.
pub type ExpirationMap = BTreeMap<String, BTreeMap<String, Vec<OptionContract>>>;

/// Option chain for an underlying.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChain {
    /// Underlying symbol
    pub symbol: String,
    /// `SUCCESS` or `FAILED`
    pub status: String,
    /// Chain strategy
    #[serde(default)]
    pub strategy: Option<String>,
    /// Whether quotes are delayed
    #[serde(default)]
    pub is_delayed: bool,
    /// Underlying price used for the chain
    #[serde(default)]
    pub underlying_price: Option<Decimal>,
    /// Number of contracts in the chain
    #[serde(default)]
    pub number_of_contracts: i64,
    /// Call contracts
    #[serde(default)]
    pub call_exp_date_map: ExpirationMap,
    /// Put contracts
    #[serde(default)]
    pub put_exp_date_map: ExpirationMap,
}

impl OptionChain {
    /// Returns `true` if the chain request succeeded.
    pub fn is_success(&self) -> bool {
        self.status == "SUCCESS"
    }

    /// All contracts in the chain, calls first.
    pub fn contracts(&self) -> impl Iterator<Item = &OptionContract> {
        self.call_exp_date_map
            .values()
            .chain(self.put_exp_date_map.values())
            .flat_map(|strikes| strikes.values())
            .flatten()
    }
}

/// One option contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionContract {
    /// `CALL` or `PUT`
    pub put_call: String,
    /// Option symbol (e.g., `AAPL_030521C120`)
    pub symbol: String,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Best bid
    #[serde(default)]
    pub bid: Option<Decimal>,
    /// Best ask
    #[serde(default)]
    pub ask: Option<Decimal>,
    /// Last trade
    #[serde(default)]
    pub last: Option<Decimal>,
    /// Mark
    #[serde(default)]
    pub mark: Option<Decimal>,
    /// Strike price
    pub strike_price: Decimal,
    /// Expiration in epoch milliseconds
    pub expiration_date: i64,
    /// Days until expiration
    #[serde(default)]
    pub days_to_expiration: i64,
    /// Volume
    #[serde(default)]
    pub total_volume: i64,
    /// Open interest
    #[serde(default)]
    pub open_interest: i64,
    /// Implied volatility
    #[serde(default)]
    pub volatility: Option<Decimal>,
    /// Delta
    #[serde(default)]
    pub delta: Option<Decimal>,
    /// Gamma
    #[serde(default)]
    pub gamma: Option<Decimal>,
    /// Theta
    #[serde(default)]
    pub theta: Option<Decimal>,
    /// Vega
    #[serde(default)]
    pub vega: Option<Decimal>,
    /// In the money
    #[serde(default)]
    pub in_the_money: bool,
    /// Contract multiplier
    #[serde(default)]
    pub multiplier: Option<Decimal>,
}
