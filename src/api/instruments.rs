//! Instruments service for symbol search and fundamentals.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::client::ClientInner;
use crate::models::{Fundamental, Instrument, Projection};
use crate::{Error, Result};

/// Service for instrument data operations.
///
/// # Example
///
/// ```no_run
/// use tdameritrade_rs::models::Projection;
///
/// # async fn example(client: tdameritrade_rs::TdaClient) -> tdameritrade_rs::Result<()> {
/// // Every symbol starting with "AA"
/// let found = client.instruments().search("AA.*", Projection::SymbolRegex).await?;
///
/// // Fundamentals of a single equity
/// if let Some(f) = client.instruments().fundamentals("AAPL").await? {
///     println!("P/E: {:?}", f.pe_ratio);
/// }
/// # Ok(())
/// # }
/// ```
pub struct InstrumentsService {
    inner: Arc<ClientInner>,
}

#[derive(Serialize)]
struct SearchQuery<'a> {
    symbol: &'a str,
    projection: Projection,
}

impl InstrumentsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Search instruments, keyed by symbol.
    pub async fn search(&self, symbol: &str, projection: Projection) -> Result<HashMap<String, Instrument>> {
        if symbol.trim().is_empty() {
            return Err(Error::InvalidInput("symbol is required".to_string()));
        }
        self.inner
            .get_with_query("/instruments", &SearchQuery { symbol, projection })
            .await
    }

    /// Get the fundamental data of an equity.
    pub async fn fundamentals(&self, symbol: &str) -> Result<Option<Fundamental>> {
        let found = self.search(symbol, Projection::Fundamental).await?;
        Ok(found
            .into_values()
            .find(|i| i.symbol.eq_ignore_ascii_case(symbol))
            .and_then(|i| i.fundamental))
    }

    /// Get instruments by CUSIP.
    pub async fn get_by_cusip(&self, cusip: &str) -> Result<Vec<Instrument>> {
        self.inner
            .get(&format!("/instruments/{}", urlencoding::encode(cusip)))
            .await
    }
}
