//! Transaction history models and helpers.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{AssetType, Instruction, PositionEffect, TransactionKind};
use super::order::tda_time;

/// A single account transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction id
    pub transaction_id: i64,
    /// Kind of transaction
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Broker sub-type code (e.g., `BY`, `SL`)
    #[serde(default)]
    pub transaction_sub_type: Option<String>,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
    /// Order id that produced this transaction
    #[serde(default)]
    pub order_id: Option<String>,
    /// Net cash effect
    #[serde(default)]
    pub net_amount: Decimal,
    /// When the transaction happened
    #[serde(default, with = "tda_time::option")]
    pub transaction_date: Option<DateTime<Utc>>,
    /// Settlement date
    #[serde(default)]
    pub settlement_date: Option<NaiveDate>,
    /// Security details for trades and deliveries
    #[serde(default)]
    pub transaction_item: Option<TransactionItem>,
}

impl Transaction {
    /// Symbol of the instrument involved, if any.
    pub fn symbol(&self) -> Option<&str> {
        self.transaction_item
            .as_ref()
            .and_then(|item| item.instrument.as_ref())
            .map(|instrument| instrument.symbol.as_str())
    }

    /// Returns `true` if this is a trade execution.
    pub fn is_trade(&self) -> bool {
        matches!(self.kind, TransactionKind::Trade)
    }
}

/// Security details of a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItem {
    /// Quantity
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Execution price
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Total cost
    #[serde(default)]
    pub cost: Option<Decimal>,
    /// Trading instruction
    #[serde(default)]
    pub instruction: Option<Instruction>,
    /// Opening or closing
    #[serde(default)]
    pub position_effect: Option<PositionEffect>,
    /// Instrument traded
    #[serde(default)]
    pub instrument: Option<TransactionInstrument>,
}

/// Instrument reference inside a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInstrument {
    /// Trading symbol
    pub symbol: String,
    /// Asset type
    #[serde(default)]
    pub asset_type: AssetType,
    /// CUSIP
    #[serde(default)]
    pub cusip: Option<String>,
    /// Underlying symbol for options
    #[serde(default)]
    pub underlying_symbol: Option<String>,
}

/// Transactions of the given kind.
pub fn filter_by_kind(
    transactions: &[Transaction],
    kind: TransactionKind,
) -> Vec<&Transaction> {
    transactions.iter().filter(|t| t.kind == kind).collect()
}

/// Transactions involving `symbol` (case-insensitive).
pub fn filter_by_symbol<'a>(transactions: &'a [Transaction], symbol: &str) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|t| t.symbol().is_some_and(|s| s.eq_ignore_ascii_case(symbol)))
        .collect()
}

/// Transactions grouped by instrument symbol; transactions without an
/// instrument are left out.
pub fn group_by_symbol(transactions: &[Transaction]) -> BTreeMap<String, Vec<&Transaction>> {
    let mut groups: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for transaction in transactions {
        if let Some(symbol) = transaction.symbol() {
            groups.entry(symbol.to_string()).or_default().push(transaction);
        }
    }
    groups
}

/// Sum of the net cash effect of `transactions`.
pub fn total_net_amount<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Decimal {
    transactions.into_iter().map(|t| t.net_amount).sum()
}
