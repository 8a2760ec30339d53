//! Instrument and fundamental data models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::AssetType;

/// How an instrument search query is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Projection {
    /// Exact symbol match
    SymbolSearch,
    /// Regular expression on the symbol
    SymbolRegex,
    /// Keyword search on the description
    DescSearch,
    /// Regular expression on the description
    DescRegex,
    /// Fundamental data for an exact symbol
    Fundamental,
}

/// An instrument as returned by instrument search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    /// Trading symbol
    pub symbol: String,
    /// CUSIP number
    #[serde(default)]
    pub cusip: Option<String>,
    /// Description/name of the security
    #[serde(default)]
    pub description: Option<String>,
    /// Listing exchange
    #[serde(default)]
    pub exchange: Option<String>,
    /// Asset type
    #[serde(default)]
    pub asset_type: AssetType,
    /// Fundamental data (only with [`Projection::Fundamental`])
    #[serde(default)]
    pub fundamental: Option<Fundamental>,
}

/// Fundamental data of an equity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fundamental {
    /// Symbol
    pub symbol: String,
    /// 52-week high
    #[serde(default)]
    pub high52: Option<Decimal>,
    /// 52-week low
    #[serde(default)]
    pub low52: Option<Decimal>,
    /// Dividend amount
    #[serde(default)]
    pub dividend_amount: Option<Decimal>,
    /// Dividend yield
    #[serde(default)]
    pub dividend_yield: Option<Decimal>,
    /// Price/earnings ratio
    #[serde(default)]
    pub pe_ratio: Option<Decimal>,
    /// Earnings per share (TTM)
    #[serde(default)]
    pub eps_ttm: Option<Decimal>,
    /// Market capitalization
    #[serde(default)]
    pub market_cap: Option<Decimal>,
    /// Beta
    #[serde(default)]
    pub beta: Option<Decimal>,
    /// Remaining ratios as returned by the API
    #[serde(flatten)]
    pub other: Map<String, Value>,
}
