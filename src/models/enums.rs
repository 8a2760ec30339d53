//! Enumeration types for the TD Ameritrade API.
//!
//! This module contains the enum types used throughout the API, including
//! order instructions, asset types, order states and query selectors.

use serde::{Deserialize, Serialize};

/// Asset type of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    /// Common stock
    #[default]
    Equity,
    /// Equity or index option contract
    Option,
    /// Exchange-traded fund
    Etf,
    /// Mutual fund
    MutualFund,
    /// Money market / sweep vehicle
    CashEquivalent,
    /// Bonds and other fixed income
    FixedIncome,
    /// Index
    Index,
    /// Currency
    Currency,
    /// Unknown asset type (forward-compatibility)
    #[serde(other)]
    Unknown,
}

impl AssetType {
    /// Returns `true` if this asset type is an option contract.
    pub fn is_option(&self) -> bool {
        matches!(self, AssetType::Option)
    }
}

/// Which side of the market a position is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionSide {
    /// Long position (bought first)
    Long,
    /// Short position (sold first)
    Short,
}

/// Whether an order opens or closes a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionEffect {
    /// Opens (or adds to) a position
    Opening,
    /// Closes (or reduces) a position
    Closing,
}

/// Trading action of an order leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Instruction {
    /// Buy shares
    Buy,
    /// Sell shares held long
    Sell,
    /// Sell borrowed shares
    SellShort,
    /// Buy back shares sold short
    BuyToCover,
    /// Buy an option to open a long position
    BuyToOpen,
    /// Sell an option held long
    SellToClose,
    /// Write an option
    SellToOpen,
    /// Buy back a written option
    BuyToClose,
    /// Exchange mutual fund shares
    Exchange,
}

impl Instruction {
    /// Select the instruction for an asset type, position side and effect.
    ///
    /// | asset  | side  | opening      | closing       |
    /// |--------|-------|--------------|---------------|
    /// | equity | long  | BUY          | SELL          |
    /// | equity | short | SELL_SHORT   | BUY_TO_COVER  |
    /// | option | long  | BUY_TO_OPEN  | SELL_TO_CLOSE |
    /// | option | short | SELL_TO_OPEN | BUY_TO_CLOSE  |
    ///
    /// Every asset type other than [`AssetType::Option`] trades with the
    /// equity instructions.
    pub fn for_trade(asset_type: AssetType, side: PositionSide, effect: PositionEffect) -> Self {
        use PositionEffect::*;
        use PositionSide::*;

        match (asset_type.is_option(), side, effect) {
            (false, Long, Opening) => Instruction::Buy,
            (false, Long, Closing) => Instruction::Sell,
            (false, Short, Opening) => Instruction::SellShort,
            (false, Short, Closing) => Instruction::BuyToCover,
            (true, Long, Opening) => Instruction::BuyToOpen,
            (true, Long, Closing) => Instruction::SellToClose,
            (true, Short, Opening) => Instruction::SellToOpen,
            (true, Short, Closing) => Instruction::BuyToClose,
        }
    }

    /// Returns `true` if this is a buy instruction.
    pub fn is_buy(&self) -> bool {
        matches!(
            self,
            Instruction::Buy
                | Instruction::BuyToCover
                | Instruction::BuyToOpen
                | Instruction::BuyToClose
        )
    }

    /// Returns `true` if this is a sell instruction.
    pub fn is_sell(&self) -> bool {
        matches!(
            self,
            Instruction::Sell
                | Instruction::SellShort
                | Instruction::SellToClose
                | Instruction::SellToOpen
        )
    }

    /// Returns `true` if this opens a new position.
    pub fn is_opening(&self) -> bool {
        matches!(
            self,
            Instruction::Buy
                | Instruction::SellShort
                | Instruction::BuyToOpen
                | Instruction::SellToOpen
        )
    }
}

/// Order type specifying how the order should be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Execute immediately at the current market price
    Market,
    /// Execute at the specified price or better
    Limit,
    /// Becomes a market order when the stop price is reached
    Stop,
    /// Becomes a limit order when the stop price is reached
    StopLimit,
    /// Stop that follows the market by an offset
    TrailingStop,
    /// Market order filled at the closing price
    MarketOnClose,
    /// Exercise an option
    Exercise,
    /// Trailing stop that becomes a limit order
    TrailingStopLimit,
    /// Net debit for multi-leg orders
    NetDebit,
    /// Net credit for multi-leg orders
    NetCredit,
    /// Net zero for multi-leg orders
    NetZero,
}

impl OrderType {
    /// Returns `true` if this order type needs a limit price.
    pub fn requires_price(&self) -> bool {
        matches!(
            self,
            OrderType::Limit
                | OrderType::StopLimit
                | OrderType::NetDebit
                | OrderType::NetCredit
        )
    }

    /// Returns `true` if this order type needs a stop price.
    pub fn requires_stop_price(&self) -> bool {
        matches!(self, OrderType::Stop | OrderType::StopLimit)
    }
}

/// Trading session an order is eligible for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Session {
    /// Regular market hours
    Normal,
    /// Pre-market only
    Am,
    /// After-hours only
    Pm,
    /// All sessions
    Seamless,
}

/// How long an order remains active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    /// Expires at the end of the trading day
    Day,
    /// Remains active until filled or cancelled
    GoodTillCancel,
    /// Fill completely or cancel
    FillOrKill,
}

/// Strategy of an order (single order vs. linked orders).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStrategyType {
    /// Stand-alone order
    Single,
    /// One-cancels-other
    Oco,
    /// Triggers child orders when filled
    Trigger,
}

/// Current status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Waiting for a parent order to fill
    AwaitingParentOrder,
    /// Waiting for a condition to be met
    AwaitingCondition,
    /// Waiting for manual review
    AwaitingManualReview,
    /// Accepted by the broker
    Accepted,
    /// Waiting for the user to confirm
    AwaitingUrOut,
    /// Queued before routing
    PendingActivation,
    /// Queued for the next session
    Queued,
    /// Live at the exchange
    Working,
    /// Rejected
    Rejected,
    /// Cancel has been requested
    PendingCancel,
    /// Cancelled
    Canceled,
    /// Replace has been requested
    PendingReplace,
    /// Replaced by another order
    Replaced,
    /// Completely filled
    Filled,
    /// Expired
    Expired,
    /// Unknown status (forward-compatibility)
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Returns `true` if the order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Rejected
                | OrderStatus::Canceled
                | OrderStatus::Replaced
                | OrderStatus::Filled
                | OrderStatus::Expired
        )
    }

    /// Returns `true` if the order is still working.
    pub fn is_working(&self) -> bool {
        matches!(
            self,
            OrderStatus::Accepted
                | OrderStatus::PendingActivation
                | OrderStatus::Queued
                | OrderStatus::Working
                | OrderStatus::AwaitingParentOrder
                | OrderStatus::AwaitingCondition
        )
    }
}

/// Transaction type filter for transaction history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// All transaction types
    #[default]
    All,
    /// Trades
    Trade,
    /// Buys only
    BuyOnly,
    /// Sells only
    SellOnly,
    /// Cash deposits and withdrawals
    CashInOrCashOut,
    /// Checks
    Checking,
    /// Dividends
    Dividend,
    /// Interest
    Interest,
    /// Other
    Other,
    /// Advisor fees
    AdvisorFees,
}

/// Type of an executed transaction, as reported in transaction history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Trade execution
    Trade,
    /// Securities received or delivered (expirations, assignments)
    ReceiveAndDeliver,
    /// Dividend or interest payment
    DividendOrInterest,
    /// ACH receipt
    AchReceipt,
    /// ACH disbursement
    AchDisbursement,
    /// Cash receipt
    CashReceipt,
    /// Cash disbursement
    CashDisbursement,
    /// Electronic fund
    ElectronicFund,
    /// Incoming wire
    WireIn,
    /// Outgoing wire
    WireOut,
    /// Journal entry
    Journal,
    /// Memorandum
    Memorandum,
    /// Margin call
    MarginCall,
    /// Money market
    MoneyMarket,
    /// SMA adjustment
    SmaAdjustment,
    /// Other transaction type
    #[serde(other)]
    Other,
}
