//! Primitive types and newtypes for type-safe API interactions.
//!
//! This module provides strongly-typed wrappers around string identifiers
//! to prevent mixing up different types of IDs at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A strongly-typed TD Ameritrade account id.
///
/// # Example
///
/// ```
/// use tdameritrade_rs::AccountId;
///
/// let account = AccountId::new("123456789");
/// println!("Account: {}", account);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account id from a string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the account id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A strongly-typed order id.
///
/// TD Ameritrade order ids are numeric on the wire; they are kept as
/// strings here because the id of a freshly placed order is only available
/// as the last segment of the `Location` response header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Create a new order id.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the order id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract the order id from a `Location` header such as
    /// `https://api.tdameritrade.com/v1/accounts/123/orders/456`.
    pub fn from_location(location: &str) -> Option<Self> {
        location
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()))
            .map(Self::new)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<i64> for OrderId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// A trading symbol (e.g., "AAPL", "MSFT_011924C400").
///
/// Symbols are upper-cased on construction.
///
/// # Example
///
/// ```
/// use tdameritrade_rs::Symbol;
///
/// let symbol = Symbol::new("aapl");
/// assert_eq!(symbol.as_str(), "AAPL");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new symbol.
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(s.as_ref().trim().to_uppercase())
    }

    /// Get the symbol as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the symbol is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id() {
        let account = AccountId::new("123456789");
        assert_eq!(account.as_str(), "123456789");
        assert_eq!(account.to_string(), "123456789");
    }

    #[test]
    fn test_symbol_is_normalized() {
        let symbol: Symbol = " msft ".into();
        assert_eq!(symbol.as_str(), "MSFT");
        assert!(Symbol::new("  ").is_empty());
    }

    #[test]
    fn test_order_id_from_location() {
        let id = OrderId::from_location("https://api.tdameritrade.com/v1/accounts/123/orders/4567");
        assert_eq!(id, Some(OrderId::new("4567")));
        assert_eq!(OrderId::from_location("https://api.tdameritrade.com/v1/accounts/123/orders"), None);
        assert_eq!(OrderId::from_location(""), None);
    }
}
