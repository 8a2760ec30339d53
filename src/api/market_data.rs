//! Market data service for quotes, price history, option chains, movers
//! and market hours.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::client::ClientInner;
use crate::models::{
    ContractType, FrequencyType, Market, MarketHoursMap, Mover, MoverChange, MoverDirection,
    MoverIndex, OptionChain, PeriodType, PriceHistory, Quote, Quotes, StrikeRange, Symbol,
};
use crate::{Error, Result};

/// Maximum number of symbols per quote request.
pub const MAX_SYMBOLS_PER_REQUEST: usize = 500;

/// Service for market data operations.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: tdameritrade_rs::TdaClient) -> tdameritrade_rs::Result<()> {
/// // Get quote for a single symbol
/// if let Some(quote) = client.market_data().quote("AAPL").await? {
///     println!("AAPL: bid={:?}, ask={:?}", quote.bid_price, quote.ask_price);
/// }
///
/// // Get quotes for multiple symbols
/// let quotes = client.market_data().quotes(&["AAPL", "TSLA"]).await?;
/// # Ok(())
/// # }
/// ```
pub struct MarketDataService {
    inner: Arc<ClientInner>,
}

/// Query parameters for price history.
///
/// Either `period` or a `start_date`/`end_date` range selects the window.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryQuery {
    /// Unit of `period`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_type: Option<PeriodType>,
    /// Number of periods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    /// Unit of `frequency`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_type: Option<FrequencyType>,
    /// Number of frequency units per candle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
    /// Start of the range
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub start_date: Option<DateTime<Utc>>,
    /// End of the range
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub end_date: Option<DateTime<Utc>>,
    /// Include pre- and post-market candles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub need_extended_hours_data: Option<bool>,
}

impl PriceHistoryQuery {
    /// Daily candles over the last `years` years.
    pub fn daily(years: u32) -> Self {
        Self {
            period_type: Some(PeriodType::Year),
            period: Some(years),
            frequency_type: Some(FrequencyType::Daily),
            frequency: Some(1),
            ..Default::default()
        }
    }

    /// `minutes`-minute candles over the last `days` days.
    pub fn intraday(days: u32, minutes: u32) -> Self {
        Self {
            period_type: Some(PeriodType::Day),
            period: Some(days),
            frequency_type: Some(FrequencyType::Minute),
            frequency: Some(minutes),
            ..Default::default()
        }
    }
}

/// Query parameters for an option chain.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChainQuery {
    /// Underlying symbol
    pub symbol: String,
    /// Calls, puts or both
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<ContractType>,
    /// Number of strikes above and below the at-the-money price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike_count: Option<u32>,
    /// Include underlying quotes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_quotes: Option<bool>,
    /// Only this strike
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike: Option<Decimal>,
    /// Strike range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<StrikeRange>,
    /// Only expirations on or after this date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<NaiveDate>,
    /// Only expirations on or before this date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
}

impl OptionChainQuery {
    /// Full chain for `symbol`.
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self {
            symbol: Symbol::new(symbol).as_str().to_string(),
            ..Default::default()
        }
    }

    /// Only calls or only puts.
    pub fn contract_type(mut self, contract_type: ContractType) -> Self {
        self.contract_type = Some(contract_type);
        self
    }

    /// Limit to `count` strikes around the money.
    pub fn strike_count(mut self, count: u32) -> Self {
        self.strike_count = Some(count);
        self
    }

    /// Limit to expirations within the given dates.
    pub fn expiring_between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from_date = Some(from);
        self.to_date = Some(to);
        self
    }
}

impl MarketDataService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Get the quote of a single symbol.
    ///
    /// Returns `None` for unknown symbols.
    pub async fn quote(&self, symbol: &str) -> Result<Option<Quote>> {
        let symbol = Symbol::new(symbol);
        let mut quotes: Quotes = self
            .inner
            .get(&format!(
                "/marketdata/{}/quotes",
                urlencoding::encode(symbol.as_str())
            ))
            .await?;
        Ok(quotes.remove(symbol.as_str()))
    }

    /// Get quotes for multiple symbols, keyed by symbol.
    pub async fn quotes(&self, symbols: &[&str]) -> Result<Quotes> {
        if symbols.is_empty() {
            return Ok(Quotes::new());
        }
        if symbols.len() > MAX_SYMBOLS_PER_REQUEST {
            return Err(Error::InvalidInput(format!(
                "Too many symbols: {} (max {})",
                symbols.len(),
                MAX_SYMBOLS_PER_REQUEST
            )));
        }

        #[derive(Serialize)]
        struct Query {
            symbol: String,
        }

        let query = Query {
            symbol: symbols
                .iter()
                .map(|s| Symbol::new(s).to_string())
                .collect::<Vec<_>>()
                .join(","),
        };
        self.inner.get_with_query("/marketdata/quotes", &query).await
    }

    /// Get price history candles for a symbol.
    pub async fn price_history(&self, symbol: &str, query: &PriceHistoryQuery) -> Result<PriceHistory> {
        self.inner
            .get_with_query(
                &format!(
                    "/marketdata/{}/pricehistory",
                    urlencoding::encode(Symbol::new(symbol).as_str())
                ),
                query,
            )
            .await
    }

    /// Get the option chain of an underlying.
    pub async fn option_chain(&self, query: &OptionChainQuery) -> Result<OptionChain> {
        if query.symbol.is_empty() {
            return Err(Error::InvalidInput("symbol is required".to_string()));
        }
        self.inner.get_with_query("/marketdata/chains", query).await
    }

    /// Get the top movers of an index.
    pub async fn movers(
        &self,
        index: MoverIndex,
        direction: Option<MoverDirection>,
        change: Option<MoverChange>,
    ) -> Result<Vec<Mover>> {
        #[derive(Serialize)]
        struct Query {
            #[serde(skip_serializing_if = "Option::is_none")]
            direction: Option<MoverDirection>,
            #[serde(skip_serializing_if = "Option::is_none")]
            change: Option<MoverChange>,
        }

        self.inner
            .get_with_query(
                &format!("/marketdata/{}/movers", urlencoding::encode(index.as_str())),
                &Query { direction, change },
            )
            .await
    }

    /// Get the trading hours of one market.
    pub async fn market_hours(&self, market: Market, date: Option<NaiveDate>) -> Result<MarketHoursMap> {
        self.inner
            .get_with_query(
                &format!("/marketdata/{}/hours", market.as_str()),
                &HoursQuery { markets: None, date },
            )
            .await
    }

    /// Get the trading hours of several markets.
    pub async fn markets_hours(&self, markets: &[Market], date: Option<NaiveDate>) -> Result<MarketHoursMap> {
        let markets = markets
            .iter()
            .map(Market::as_str)
            .collect::<Vec<_>>()
            .join(",");
        self.inner
            .get_with_query(
                "/marketdata/hours",
                &HoursQuery {
                    markets: Some(markets),
                    date,
                },
            )
            .await
    }
}

#[derive(Serialize)]
struct HoursQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    markets: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
}
