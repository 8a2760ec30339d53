//! Order models for placing and managing trades.
//!
//! Most callers trade through [`OrderRequest`], which validates a simple
//! single-leg intent and turns it into the broker's wire format. The
//! general [`NewOrderBuilder`] covers everything else.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::*;
use super::primitives::{AccountId, OrderId, Symbol};
use crate::{Error, Result};

/// Smallest accepted limit price.
pub const MIN_PRICE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Quantity used when an [`OrderRequest`] leaves it unset.
pub const DEFAULT_QUANTITY: Decimal = Decimal::ONE;

/// A single-leg trading intent.
///
/// # Example
///
/// ```
/// use tdameritrade_rs::models::{
///     AssetType, Instruction, OrderRequest, PositionEffect, PositionSide,
/// };
/// use rust_decimal_macros::dec;
///
/// let (account, order) = OrderRequest::new("123456789", "msft")
///     .quantity(dec!(10))
///     .price(dec!(300.50))
///     .build(AssetType::Equity, PositionSide::Short, PositionEffect::Opening)
///     .unwrap();
///
/// assert_eq!(account.as_str(), "123456789");
/// assert_eq!(order.order_leg_collection[0].instruction, Instruction::SellShort);
/// assert_eq!(order.order_leg_collection[0].instrument.symbol, "MSFT");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderRequest {
    /// Account to trade in
    pub account_id: String,
    /// Symbol to trade (upper-cased when the order is built)
    pub symbol: String,
    /// Number of shares or contracts; defaults to 1
    pub quantity: Option<Decimal>,
    /// Limit price; required
    pub price: Option<Decimal>,
}

impl OrderRequest {
    /// Start an order request for `symbol` in `account_id`.
    pub fn new(account_id: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            symbol: symbol.into(),
            quantity: None,
            price: None,
        }
    }

    /// Set the quantity.
    pub fn quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Set the limit price.
    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Validate the request and produce the account and the order to submit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`] if the account id or symbol is blank,
    /// the quantity is below 1, or the price is missing or below 0.01.
    pub fn build(
        self,
        asset_type: AssetType,
        side: PositionSide,
        effect: PositionEffect,
    ) -> Result<(AccountId, NewOrder)> {
        let account_id = self.account_id.trim();
        if account_id.is_empty() {
            return Err(Error::InvalidOrder("accountId is required".to_string()));
        }

        let symbol = Symbol::new(&self.symbol);
        if symbol.is_empty() {
            return Err(Error::InvalidOrder("symbol is required".to_string()));
        }

        let quantity = self.quantity.unwrap_or(DEFAULT_QUANTITY);
        if quantity < Decimal::ONE {
            return Err(Error::InvalidOrder(format!(
                "quantity must be at least 1, got {}",
                quantity
            )));
        }

        let price = self
            .price
            .ok_or_else(|| Error::InvalidOrder("price is required".to_string()))?;
        if price < MIN_PRICE {
            return Err(Error::InvalidOrder(format!(
                "price must be at least {}, got {}",
                MIN_PRICE, price
            )));
        }

        // Anything that is not an option trades as an equity
        let asset_type = if asset_type.is_option() {
            AssetType::Option
        } else {
            AssetType::Equity
        };
        let leg = OrderLeg::new(
            Instruction::for_trade(asset_type, side, effect),
            symbol,
            asset_type,
            quantity,
        );

        Ok((AccountId::new(account_id), NewOrder::single_limit(leg, price)))
    }
}

/// A new order to be submitted.
///
/// Use [`NewOrderBuilder`] for a convenient way to construct orders.
///
/// # Example
///
/// ```
/// use tdameritrade_rs::models::{
///     AssetType, Instruction, NewOrderBuilder, OrderLeg, OrderType, TimeInForce,
/// };
/// use rust_decimal_macros::dec;
///
/// let order = NewOrderBuilder::new()
///     .order_type(OrderType::Limit)
///     .duration(TimeInForce::Day)
///     .price(dec!(150.00))
///     .add_leg(OrderLeg::new(Instruction::Buy, "AAPL", AssetType::Equity, dec!(10)))
///     .build()
///     .unwrap();
///
/// assert_eq!(order.order_leg_collection.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Type of order (limit, market, etc.)
    pub order_type: OrderType,
    /// Session the order may trade in
    pub session: Session,
    /// How long the order remains active
    pub duration: TimeInForce,
    /// Single or linked order
    pub order_strategy_type: OrderStrategyType,
    /// Limit price (required for limit orders)
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    /// Stop trigger price (required for stop orders)
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        with = "rust_decimal::serde::float_option"
    )]
    pub stop_price: Option<Decimal>,
    /// Order legs (instruments to trade)
    pub order_leg_collection: Vec<OrderLeg>,
}

impl NewOrder {
    /// Wrap one leg in the standard template: a good-till-cancel limit
    /// order for the regular session.
    pub fn single_limit(leg: OrderLeg, price: Decimal) -> Self {
        Self {
            order_type: OrderType::Limit,
            session: Session::Normal,
            duration: TimeInForce::GoodTillCancel,
            order_strategy_type: OrderStrategyType::Single,
            price: Some(price),
            stop_price: None,
            order_leg_collection: vec![leg],
        }
    }
}

/// Builder for creating new orders with validation.
#[derive(Debug, Default, Clone)]
pub struct NewOrderBuilder {
    order_type: Option<OrderType>,
    session: Option<Session>,
    duration: Option<TimeInForce>,
    order_strategy_type: Option<OrderStrategyType>,
    price: Option<Decimal>,
    stop_price: Option<Decimal>,
    legs: Vec<OrderLeg>,
}

impl NewOrderBuilder {
    /// Create a new order builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the order type.
    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = Some(order_type);
        self
    }

    /// Set the session (defaults to `NORMAL`).
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Set the duration (defaults to `DAY`).
    pub fn duration(mut self, duration: TimeInForce) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set the strategy type (defaults to `SINGLE`).
    pub fn order_strategy_type(mut self, strategy: OrderStrategyType) -> Self {
        self.order_strategy_type = Some(strategy);
        self
    }

    /// Set the limit price.
    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Set the stop trigger price.
    pub fn stop_price(mut self, price: Decimal) -> Self {
        self.stop_price = Some(price);
        self
    }

    /// Add a single leg to the order.
    pub fn add_leg(mut self, leg: OrderLeg) -> Self {
        self.legs.push(leg);
        self
    }

    /// Build the order, validating all fields.
    pub fn build(self) -> Result<NewOrder> {
        let order_type = self
            .order_type
            .ok_or_else(|| Error::InvalidOrder("orderType is required".to_string()))?;

        if self.legs.is_empty() {
            return Err(Error::InvalidOrder(
                "Order must have at least one leg".to_string(),
            ));
        }

        if self.legs.iter().any(|leg| leg.quantity <= Decimal::ZERO) {
            return Err(Error::InvalidOrder(
                "Leg quantities must be positive".to_string(),
            ));
        }

        if order_type.requires_price() && self.price.is_none() {
            return Err(Error::InvalidOrder(
                "Limit orders require a price".to_string(),
            ));
        }

        if order_type.requires_stop_price() && self.stop_price.is_none() {
            return Err(Error::InvalidOrder(
                "Stop orders require a stopPrice".to_string(),
            ));
        }

        Ok(NewOrder {
            order_type,
            session: self.session.unwrap_or(Session::Normal),
            duration: self.duration.unwrap_or(TimeInForce::Day),
            order_strategy_type: self
                .order_strategy_type
                .unwrap_or(OrderStrategyType::Single),
            price: self.price,
            stop_price: self.stop_price,
            order_leg_collection: self.legs,
        })
    }
}

/// A single leg of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLeg {
    /// Trading action
    pub instruction: Instruction,
    /// Quantity to trade
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    /// What is traded
    pub instrument: OrderInstrument,
}

impl OrderLeg {
    /// Create a new order leg.
    pub fn new(
        instruction: Instruction,
        symbol: impl Into<Symbol>,
        asset_type: AssetType,
        quantity: Decimal,
    ) -> Self {
        Self {
            instruction,
            quantity,
            instrument: OrderInstrument::new(symbol, asset_type),
        }
    }
}

/// Instrument reference inside an order leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInstrument {
    /// Trading symbol
    pub symbol: String,
    /// Asset type
    pub asset_type: AssetType,
    /// CUSIP (response only)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cusip: Option<String>,
    /// Description (response only)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

impl OrderInstrument {
    /// Reference `symbol` as an instrument of `asset_type`.
    pub fn new(symbol: impl Into<Symbol>, asset_type: AssetType) -> Self {
        Self {
            symbol: symbol.into().as_str().to_string(),
            asset_type,
            cusip: None,
            description: None,
        }
    }
}

/// A placed/existing order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order id
    pub order_id: i64,
    /// Account id
    pub account_id: i64,
    /// Current status
    pub status: OrderStatus,
    /// Order type
    pub order_type: OrderType,
    /// Session
    #[serde(default)]
    pub session: Option<Session>,
    /// Duration
    #[serde(default)]
    pub duration: Option<TimeInForce>,
    /// Strategy
    #[serde(default)]
    pub order_strategy_type: Option<OrderStrategyType>,
    /// Limit price
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Stop price
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    /// Total quantity
    #[serde(default)]
    pub quantity: Option<Decimal>,
    /// Quantity filled
    #[serde(default)]
    pub filled_quantity: Option<Decimal>,
    /// Remaining quantity
    #[serde(default)]
    pub remaining_quantity: Option<Decimal>,
    /// Order legs
    #[serde(default)]
    pub order_leg_collection: Vec<OrderLeg>,
    /// Cancelable flag
    #[serde(default)]
    pub cancelable: bool,
    /// Editable flag
    #[serde(default)]
    pub editable: bool,
    /// When the order was entered
    #[serde(default, with = "tda_time::option")]
    pub entered_time: Option<DateTime<Utc>>,
    /// When the order was filled/cancelled/expired
    #[serde(default, with = "tda_time::option")]
    pub close_time: Option<DateTime<Utc>>,
    /// Rejection or cancellation reason
    #[serde(default)]
    pub status_description: Option<String>,
    /// Client tag
    #[serde(default)]
    pub tag: Option<String>,
}

impl Order {
    /// Get the order id as a strongly-typed value.
    pub fn id(&self) -> OrderId {
        OrderId::from(self.order_id)
    }

    /// Returns `true` if the order can be cancelled.
    pub fn is_cancelable(&self) -> bool {
        self.cancelable && !self.status.is_terminal()
    }

    /// Returns `true` if the order is completely filled.
    pub fn is_filled(&self) -> bool {
        matches!(self.status, OrderStatus::Filled)
    }

    /// Calculate the fill percentage.
    pub fn fill_percentage(&self) -> Option<Decimal> {
        match (self.filled_quantity, self.quantity) {
            (Some(filled), Some(size)) if size > Decimal::ZERO => {
                Some((filled / size) * Decimal::from(100))
            }
            _ => None,
        }
    }
}

/// An order saved on the server without being submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedOrder {
    /// Saved order id
    pub saved_order_id: i64,
    /// The saved order body
    #[serde(flatten)]
    pub order: NewOrder,
    /// When the order was saved
    #[serde(default, with = "tda_time::option")]
    pub saved_time: Option<DateTime<Utc>>,
}

/// Timestamps in TD Ameritrade responses use `+0000` offsets
/// (`2021-03-01T15:30:00+0000`), which RFC 3339 parsing rejects.
pub(crate) mod tda_time {
    use chrono::{DateTime, Utc};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

    pub(crate) fn parse(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_str(s, FORMAT)
            .or_else(|_| DateTime::parse_from_rfc3339(s))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub(crate) mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub(crate) fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => serializer.serialize_str(&dt.format(super::FORMAT).to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            let raw = Option::<String>::deserialize(deserializer)?;
            match raw {
                Some(s) => super::parse(&s)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", s))),
                None => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request() -> OrderRequest {
        OrderRequest::new("123456789", "aapl").price(dec!(150.25))
    }

    fn instruction_for(asset: AssetType, side: PositionSide, effect: PositionEffect) -> Instruction {
        let (_, order) = request().build(asset, side, effect).unwrap();
        order.order_leg_collection[0].instruction
    }

    #[test]
    fn test_instruction_table() {
        use PositionEffect::{Closing, Opening};
        use PositionSide::{Long, Short};

        let (equity, option) = (AssetType::Equity, AssetType::Option);

        let cases = [
            (equity, Long, Opening, Instruction::Buy),
            (equity, Long, Closing, Instruction::Sell),
            (equity, Short, Opening, Instruction::SellShort),
            (equity, Short, Closing, Instruction::BuyToCover),
            (option, Long, Opening, Instruction::BuyToOpen),
            (option, Long, Closing, Instruction::SellToClose),
            (option, Short, Opening, Instruction::SellToOpen),
            (option, Short, Closing, Instruction::BuyToClose),
        ];

        for (asset, side, effect, expected) in cases {
            assert_eq!(
                instruction_for(asset, side, effect),
                expected,
                "{:?} {:?} {:?}",
                asset,
                side,
                effect
            );
        }
    }

    #[test]
    fn test_order_template() {
        let (account, order) = request()
            .quantity(dec!(5))
            .build(AssetType::Option, PositionSide::Long, PositionEffect::Opening)
            .unwrap();

        assert_eq!(account, AccountId::new("123456789"));
        assert_eq!(order.order_type, OrderType::Limit);
        assert_eq!(order.session, Session::Normal);
        assert_eq!(order.duration, TimeInForce::GoodTillCancel);
        assert_eq!(order.order_strategy_type, OrderStrategyType::Single);
        assert_eq!(order.price, Some(dec!(150.25)));
        assert_eq!(order.order_leg_collection.len(), 1);

        let leg = &order.order_leg_collection[0];
        assert_eq!(leg.quantity, dec!(5));
        assert_eq!(leg.instrument.symbol, "AAPL");
        assert_eq!(leg.instrument.asset_type, AssetType::Option);
    }

    #[test]
    fn test_non_option_assets_trade_as_equity() {
        for asset in [AssetType::Etf, AssetType::MutualFund, AssetType::Unknown] {
            let (_, order) = request()
                .build(asset, PositionSide::Short, PositionEffect::Opening)
                .unwrap();
            let leg = &order.order_leg_collection[0];
            assert_eq!(leg.instrument.asset_type, AssetType::Equity, "{:?}", asset);
            assert_eq!(leg.instruction, Instruction::SellShort, "{:?}", asset);
        }
    }

    #[test]
    fn test_wire_format() {
        let (_, order) = request()
            .build(AssetType::Equity, PositionSide::Long, PositionEffect::Opening)
            .unwrap();

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["orderType"], "LIMIT");
        assert_eq!(json["session"], "NORMAL");
        assert_eq!(json["duration"], "GOOD_TILL_CANCEL");
        assert_eq!(json["orderStrategyType"], "SINGLE");
        assert_eq!(json["orderLegCollection"][0]["instruction"], "BUY");
        assert_eq!(json["orderLegCollection"][0]["quantity"], 1.0);
        assert_eq!(json["orderLegCollection"][0]["instrument"]["assetType"], "EQUITY");
        assert!(json.get("stopPrice").is_none());
        assert!(json["orderLegCollection"][0]["instrument"].get("cusip").is_none());
    }

    #[test]
    fn test_price_boundary() {
        let equity = (AssetType::Equity, PositionSide::Long, PositionEffect::Opening);

        let zero = request().price(dec!(0)).build(equity.0, equity.1, equity.2);
        assert!(matches!(zero, Err(Error::InvalidOrder(_))));

        let cent = request().price(dec!(0.01)).build(equity.0, equity.1, equity.2);
        assert!(cent.is_ok());

        let missing = OrderRequest::new("123456789", "AAPL").build(equity.0, equity.1, equity.2);
        assert!(matches!(missing, Err(Error::InvalidOrder(_))));
    }

    #[test]
    fn test_quantity_boundary() {
        let zero = request()
            .quantity(dec!(0))
            .build(AssetType::Equity, PositionSide::Long, PositionEffect::Opening);
        assert!(matches!(zero, Err(Error::InvalidOrder(_))));

        let (_, order) = request()
            .build(AssetType::Equity, PositionSide::Long, PositionEffect::Opening)
            .unwrap();
        assert_eq!(order.order_leg_collection[0].quantity, DEFAULT_QUANTITY);
    }

    #[test]
    fn test_blank_fields_rejected() {
        let no_account = OrderRequest::new(" ", "AAPL")
            .price(dec!(1))
            .build(AssetType::Equity, PositionSide::Long, PositionEffect::Opening);
        assert_eq!(no_account.unwrap_err().code(), "INVALID_ORDER_REQUEST");

        let no_symbol = OrderRequest::new("123", "")
            .price(dec!(1))
            .build(AssetType::Equity, PositionSide::Long, PositionEffect::Opening);
        assert!(matches!(no_symbol, Err(Error::InvalidOrder(_))));
    }

    #[test]
    fn test_order_builder_valid() {
        let order = NewOrderBuilder::new()
            .order_type(OrderType::StopLimit)
            .price(dec!(99.50))
            .stop_price(dec!(100))
            .add_leg(OrderLeg::new(Instruction::Sell, "SPY", AssetType::Etf, dec!(3)))
            .build()
            .unwrap();

        assert_eq!(order.duration, TimeInForce::Day);
        assert_eq!(order.session, Session::Normal);
        assert_eq!(order.stop_price, Some(dec!(100)));
    }

    #[test]
    fn test_order_builder_limit_no_price() {
        let result = NewOrderBuilder::new()
            .order_type(OrderType::Limit)
            .add_leg(OrderLeg::new(Instruction::Buy, "AAPL", AssetType::Equity, dec!(10)))
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_order_builder_no_legs() {
        let result = NewOrderBuilder::new().order_type(OrderType::Market).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_order() {
        let json = r#"{
            "orderId": 987654321,
            "accountId": 123456789,
            "status": "WORKING",
            "orderType": "LIMIT",
            "session": "NORMAL",
            "duration": "GOOD_TILL_CANCEL",
            "orderStrategyType": "SINGLE",
            "price": 150.25,
            "quantity": 10.0,
            "filledQuantity": 4.0,
            "remainingQuantity": 6.0,
            "cancelable": true,
            "editable": true,
            "enteredTime": "2021-03-01T15:30:00+0000",
            "orderLegCollection": [{
                "orderLegType": "EQUITY",
                "legId": 1,
                "instruction": "BUY",
                "quantity": 10.0,
                "instrument": { "assetType": "EQUITY", "cusip": "037833100", "symbol": "AAPL" }
            }]
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.id(), OrderId::new("987654321"));
        assert!(order.is_cancelable());
        assert_eq!(order.fill_percentage(), Some(dec!(40)));
        assert_eq!(
            order.order_leg_collection[0].instrument.cusip.as_deref(),
            Some("037833100")
        );
        assert!(order.entered_time.is_some());
    }
}
