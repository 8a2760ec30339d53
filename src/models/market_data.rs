//! Market data models: quotes, price history, movers and market hours.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::enums::AssetType;

/// Quote snapshot for an instrument.
///
/// Quote payloads differ per asset type; the common fields are typed and
/// the rest are kept in `other`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Trading symbol
    pub symbol: String,
    /// Asset type
    #[serde(default)]
    pub asset_type: AssetType,
    /// Description/name of the security
    #[serde(default)]
    pub description: Option<String>,
    /// Best bid price
    #[serde(default)]
    pub bid_price: Option<Decimal>,
    /// Best bid size
    #[serde(default)]
    pub bid_size: Option<Decimal>,
    /// Best ask price
    #[serde(default)]
    pub ask_price: Option<Decimal>,
    /// Best ask size
    #[serde(default)]
    pub ask_size: Option<Decimal>,
    /// Last trade price
    #[serde(default)]
    pub last_price: Option<Decimal>,
    /// Today's open
    #[serde(default)]
    pub open_price: Option<Decimal>,
    /// Today's high
    #[serde(default)]
    pub high_price: Option<Decimal>,
    /// Today's low
    #[serde(default)]
    pub low_price: Option<Decimal>,
    /// Previous close
    #[serde(default)]
    pub close_price: Option<Decimal>,
    /// Net change from previous close
    #[serde(default)]
    pub net_change: Option<Decimal>,
    /// Mark price
    #[serde(default)]
    pub mark: Option<Decimal>,
    /// Today's volume
    #[serde(default)]
    pub total_volume: Option<i64>,
    /// Quote time in epoch milliseconds
    #[serde(default)]
    pub quote_time_in_long: Option<i64>,
    /// 52-week high
    #[serde(rename = "52WkHigh", default)]
    pub week_52_high: Option<Decimal>,
    /// 52-week low
    #[serde(rename = "52WkLow", default)]
    pub week_52_low: Option<Decimal>,
    /// Whether the quote is delayed
    #[serde(default)]
    pub delayed: bool,
    /// Remaining asset-specific fields
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Quote {
    /// Midpoint of bid and ask, if both are present.
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.bid_price, self.ask_price) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }

    /// Quote time as a timestamp.
    pub fn quote_time(&self) -> Option<DateTime<Utc>> {
        self.quote_time_in_long
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }
}

/// Quotes keyed by symbol.
pub type Quotes = HashMap<String, Quote>;

/// Unit of the `period` in a price history request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    /// Days
    Day,
    /// Months
    Month,
    /// Years
    Year,
    /// Year to date
    Ytd,
}

/// Unit of the `frequency` in a price history request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyType {
    /// Minute candles
    Minute,
    /// Daily candles
    Daily,
    /// Weekly candles
    Weekly,
    /// Monthly candles
    Monthly,
}

/// Price history for a symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistory {
    /// Symbol
    pub symbol: String,
    /// `true` when no candles matched the request
    #[serde(default)]
    pub empty: bool,
    /// Candles in ascending time order
    #[serde(default)]
    pub candles: Vec<Candle>,
}

/// One OHLCV bar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    /// Open price
    pub open: Decimal,
    /// High price
    pub high: Decimal,
    /// Low price
    pub low: Decimal,
    /// Close price
    pub close: Decimal,
    /// Volume
    pub volume: i64,
    /// Bar start in epoch milliseconds
    pub datetime: i64,
}

impl Candle {
    /// Bar start as a timestamp.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.datetime).single()
    }
}

/// Index to query movers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoverIndex {
    /// Dow Jones Industrial Average
    Dji,
    /// Nasdaq Composite
    Compx,
    /// S&P 500
    Spx,
}

impl MoverIndex {
    /// Symbol of the index as used in the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            MoverIndex::Dji => "$DJI",
            MoverIndex::Compx => "$COMPX",
            MoverIndex::Spx => "$SPX.X",
        }
    }
}

/// Direction filter for movers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoverDirection {
    /// Top gainers
    Up,
    /// Top losers
    Down,
}

/// How mover change is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoverChange {
    /// Absolute change
    Value,
    /// Percent change
    Percent,
}

/// A top-moving symbol of an index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mover {
    /// Symbol
    pub symbol: String,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Change (absolute or percent, as requested)
    pub change: Decimal,
    /// `up` or `down`
    pub direction: MoverDirection,
    /// Last price
    #[serde(default)]
    pub last: Option<Decimal>,
    /// Volume
    #[serde(default)]
    pub total_volume: Option<i64>,
}

/// Market whose hours are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Market {
    /// Equities
    Equity,
    /// Options
    Option,
    /// Futures
    Future,
    /// Bonds
    Bond,
    /// Forex
    Forex,
}

impl Market {
    /// Wire name of the market.
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Equity => "EQUITY",
            Market::Option => "OPTION",
            Market::Future => "FUTURE",
            Market::Bond => "BOND",
            Market::Forex => "FOREX",
        }
    }
}

/// Market hours response: market (`equity`, `option`, ...) to product
/// (`EQ`, `EQO`, ...) to hours.
pub type MarketHoursMap = HashMap<String, HashMap<String, MarketHours>>;

/// Trading hours of one product on one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketHours {
    /// Date (`YYYY-MM-DD`)
    pub date: String,
    /// Market type
    pub market_type: String,
    /// Product code
    #[serde(default)]
    pub product: Option<String>,
    /// Product name
    #[serde(default)]
    pub product_name: Option<String>,
    /// Whether the market is open on that date
    pub is_open: bool,
    /// Session windows keyed by session (`preMarket`, `regularMarket`, `postMarket`)
    #[serde(default)]
    pub session_hours: HashMap<String, Vec<SessionWindow>>,
}

/// Start and end of a trading session, as ISO-8601 strings with offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionWindow {
    /// Session start
    pub start: String,
    /// Session end
    pub end: String,
}
