//! Watchlist models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::AssetType;
use super::primitives::Symbol;

/// A saved watchlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Watchlist {
    /// Watchlist name
    pub name: String,
    /// Watchlist id
    pub watchlist_id: String,
    /// Owning account
    pub account_id: String,
    /// Entries
    #[serde(default)]
    pub watchlist_items: Vec<WatchlistItem>,
}

/// Body for creating or replacing a watchlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWatchlist {
    /// Watchlist name
    pub name: String,
    /// Entries
    pub watchlist_items: Vec<WatchlistItem>,
}

impl NewWatchlist {
    /// A watchlist named `name` holding equity entries for `symbols`.
    pub fn equities<S: AsRef<str>>(name: impl Into<String>, symbols: &[S]) -> Self {
        Self {
            name: name.into(),
            watchlist_items: symbols
                .iter()
                .map(|s| WatchlistItem::new(Symbol::new(s), AssetType::Equity))
                .collect(),
        }
    }
}

/// One entry in a watchlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItem {
    /// Position in the list (response only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_id: Option<i64>,
    /// Quantity held, for tracking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    /// Average price, for tracking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_price: Option<Decimal>,
    /// Instrument
    pub instrument: WatchlistInstrument,
}

impl WatchlistItem {
    /// An entry for `symbol`.
    pub fn new(symbol: Symbol, asset_type: AssetType) -> Self {
        Self {
            sequence_id: None,
            quantity: None,
            average_price: None,
            instrument: WatchlistInstrument {
                symbol: symbol.as_str().to_string(),
                asset_type,
                description: None,
            },
        }
    }
}

/// Instrument reference inside a watchlist entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistInstrument {
    /// Trading symbol
    pub symbol: String,
    /// Asset type
    pub asset_type: AssetType,
    /// Description (response only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
