//! API service modules for TD Ameritrade endpoints.
//!
//! Each service provides methods for interacting with a specific
//! subset of the TD Ameritrade API. Services are obtained from
//! [`TdaClient`](crate::TdaClient) and share its token manager.

mod accounts;
mod instruments;
mod market_data;
mod orders;
mod transactions;
mod watchlists;

pub use accounts::AccountsService;
pub use instruments::InstrumentsService;
pub use market_data::{MarketDataService, OptionChainQuery, PriceHistoryQuery, MAX_SYMBOLS_PER_REQUEST};
pub use orders::{OrdersQuery, OrdersService};
pub use transactions::{TransactionsQuery, TransactionsService};
pub use watchlists::WatchlistsService;
