//! Data models for the TD Ameritrade API.
//!
//! This module contains the strongly-typed data structures used to
//! interact with the TD Ameritrade API. Models are organized by domain:
//!
//! - [`primitives`] - Identifier newtypes like `AccountId` and `Symbol`
//! - [`enums`] - Instructions, order types, statuses, etc.
//! - [`account`] - Account and preference models
//! - [`balance`] - Balance and position models
//! - [`order`] - Order construction, validation and order responses
//! - [`transaction`] - Transaction history and its filter/group helpers
//! - [`market_data`] - Quotes, price history, movers and market hours
//! - [`option_chain`] - Option chains
//! - [`instrument`] - Instrument search and fundamentals
//! - [`watchlist`] - Watchlists
//! - [`user`] - User principals

pub mod primitives;
pub mod enums;
pub mod account;
pub mod balance;
pub mod order;
pub mod transaction;
pub mod market_data;
pub mod option_chain;
pub mod instrument;
pub mod watchlist;
pub mod user;

// Re-export commonly used types
pub use primitives::*;
pub use enums::*;
pub use account::*;
pub use balance::*;
pub use order::*;
pub use transaction::{Transaction, TransactionInstrument, TransactionItem};
pub use market_data::*;
pub use option_chain::*;
pub use instrument::*;
pub use watchlist::*;
pub use user::*;
