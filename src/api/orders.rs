//! Orders service for order placement and management.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::client::{ApiRequest, ClientInner};
use crate::models::{
    AccountId, AssetType, NewOrder, Order, OrderId, OrderRequest, OrderStatus, PositionEffect,
    PositionSide, SavedOrder,
};
use crate::Result;

/// Service for order operations.
///
/// The preset methods (`buy_stock`, `short_stock`, `write_option`, ...)
/// validate an [`OrderRequest`], pick the instruction for the trade and
/// submit a good-till-cancel limit order. Validation failures return
/// [`Error::InvalidOrder`](crate::Error::InvalidOrder) without sending
/// anything.
///
/// # Example
///
/// ```no_run
/// use tdameritrade_rs::models::OrderRequest;
/// use rust_decimal_macros::dec;
///
/// # async fn example(client: tdameritrade_rs::TdaClient) -> tdameritrade_rs::Result<()> {
/// let request = OrderRequest::new("123456789", "AAPL")
///     .quantity(dec!(10))
///     .price(dec!(150.00));
///
/// if let Some(order_id) = client.orders().buy_stock(request).await? {
///     let order = client.orders().get(&"123456789".into(), &order_id).await?;
///     println!("Order {} is {:?}", order_id, order.status);
/// }
/// # Ok(())
/// # }
/// ```
pub struct OrdersService {
    inner: Arc<ClientInner>,
}

/// Query parameters for listing orders.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersQuery {
    /// Maximum number of orders to return
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    /// Only orders entered on or after this date (at most 60 days back)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_entered_time: Option<NaiveDate>,
    /// Only orders entered on or before this date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_entered_time: Option<NaiveDate>,
    /// Filter by status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

impl OrdersQuery {
    /// Only orders with `status`.
    pub fn with_status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl OrdersService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Place an order.
    ///
    /// Returns the id of the new order, taken from the `Location` header of
    /// the response, or `None` if the header is missing.
    pub async fn place(&self, account_id: &AccountId, order: &NewOrder) -> Result<Option<OrderId>> {
        let response = self
            .inner
            .post(
                &format!("/accounts/{}/orders", urlencoding::encode(account_id.as_str())),
                order,
            )
            .await?;

        let order_id = response.location().and_then(OrderId::from_location);
        tracing::info!(account = %account_id, order_id = ?order_id, "order placed");
        Ok(order_id)
    }

    /// Validate a single-leg request and place it.
    pub async fn place_request(
        &self,
        request: OrderRequest,
        asset_type: AssetType,
        side: PositionSide,
        effect: PositionEffect,
    ) -> Result<Option<OrderId>> {
        let (account_id, order) = request.build(asset_type, side, effect)?;
        self.place(&account_id, &order).await
    }

    /// Open a long or short position.
    pub async fn open_position(
        &self,
        request: OrderRequest,
        asset_type: AssetType,
        side: PositionSide,
    ) -> Result<Option<OrderId>> {
        self.place_request(request, asset_type, side, PositionEffect::Opening)
            .await
    }

    /// Close a long or short position.
    pub async fn close_position(
        &self,
        request: OrderRequest,
        asset_type: AssetType,
        side: PositionSide,
    ) -> Result<Option<OrderId>> {
        self.place_request(request, asset_type, side, PositionEffect::Closing)
            .await
    }

    /// Buy shares (`BUY`).
    pub async fn buy_stock(&self, request: OrderRequest) -> Result<Option<OrderId>> {
        self.open_position(request, AssetType::Equity, PositionSide::Long)
            .await
    }

    /// Sell shares held long (`SELL`).
    pub async fn sell_stock(&self, request: OrderRequest) -> Result<Option<OrderId>> {
        self.close_position(request, AssetType::Equity, PositionSide::Long)
            .await
    }

    /// Sell shares short (`SELL_SHORT`).
    pub async fn short_stock(&self, request: OrderRequest) -> Result<Option<OrderId>> {
        self.open_position(request, AssetType::Equity, PositionSide::Short)
            .await
    }

    /// Buy back shorted shares (`BUY_TO_COVER`).
    pub async fn cover_stock(&self, request: OrderRequest) -> Result<Option<OrderId>> {
        self.close_position(request, AssetType::Equity, PositionSide::Short)
            .await
    }

    /// Buy option contracts (`BUY_TO_OPEN`).
    pub async fn buy_option(&self, request: OrderRequest) -> Result<Option<OrderId>> {
        self.open_position(request, AssetType::Option, PositionSide::Long)
            .await
    }

    /// Sell option contracts held long (`SELL_TO_CLOSE`).
    pub async fn sell_option(&self, request: OrderRequest) -> Result<Option<OrderId>> {
        self.close_position(request, AssetType::Option, PositionSide::Long)
            .await
    }

    /// Write option contracts (`SELL_TO_OPEN`).
    pub async fn write_option(&self, request: OrderRequest) -> Result<Option<OrderId>> {
        self.open_position(request, AssetType::Option, PositionSide::Short)
            .await
    }

    /// Buy back written option contracts (`BUY_TO_CLOSE`).
    pub async fn close_option(&self, request: OrderRequest) -> Result<Option<OrderId>> {
        self.close_position(request, AssetType::Option, PositionSide::Short)
            .await
    }

    /// Get a specific order.
    pub async fn get(&self, account_id: &AccountId, order_id: &OrderId) -> Result<Order> {
        self.inner
            .get(&format!(
                "/accounts/{}/orders/{}",
                urlencoding::encode(account_id.as_str()),
                urlencoding::encode(order_id.as_str())
            ))
            .await
    }

    /// List orders of an account.
    pub async fn list(&self, account_id: &AccountId, query: Option<OrdersQuery>) -> Result<Vec<Order>> {
        let path = format!("/accounts/{}/orders", urlencoding::encode(account_id.as_str()));
        match query {
            Some(q) => self.inner.get_with_query(&path, &q).await,
            None => self.inner.get(&path).await,
        }
    }

    /// List orders across all accounts of the user, or of one account.
    pub async fn list_all(
        &self,
        account_id: Option<&AccountId>,
        query: Option<OrdersQuery>,
    ) -> Result<Vec<Order>> {
        let mut request = ApiRequest::get("/orders").query(&query.unwrap_or_default())?;
        if let Some(account_id) = account_id {
            request = request.query_pair("accountId", account_id.as_str());
        }
        self.inner.fetch(request).await
    }

    /// Cancel an order.
    pub async fn cancel(&self, account_id: &AccountId, order_id: &OrderId) -> Result<()> {
        self.inner
            .delete(&format!(
                "/accounts/{}/orders/{}",
                urlencoding::encode(account_id.as_str()),
                urlencoding::encode(order_id.as_str())
            ))
            .await?;
        tracing::info!(account = %account_id, order_id = %order_id, "order cancelled");
        Ok(())
    }

    /// Replace an existing order.
    ///
    /// The old order is cancelled and a new one created; its id is returned
    /// when the response carries one.
    pub async fn replace(
        &self,
        account_id: &AccountId,
        order_id: &OrderId,
        order: &NewOrder,
    ) -> Result<Option<OrderId>> {
        let response = self
            .inner
            .put(
                &format!(
                    "/accounts/{}/orders/{}",
                    urlencoding::encode(account_id.as_str()),
                    urlencoding::encode(order_id.as_str())
                ),
                order,
            )
            .await?;
        Ok(response.location().and_then(OrderId::from_location))
    }

    /// Save an order without submitting it.
    pub async fn save(&self, account_id: &AccountId, order: &NewOrder) -> Result<()> {
        self.inner
            .post(
                &format!("/accounts/{}/savedorders", urlencoding::encode(account_id.as_str())),
                order,
            )
            .await?;
        Ok(())
    }

    /// List saved orders of an account.
    pub async fn saved(&self, account_id: &AccountId) -> Result<Vec<SavedOrder>> {
        self.inner
            .get(&format!("/accounts/{}/savedorders", urlencoding::encode(account_id.as_str())))
            .await
    }

    /// Delete a saved order.
    pub async fn delete_saved(&self, account_id: &AccountId, saved_order_id: i64) -> Result<()> {
        self.inner
            .delete(&format!(
                "/accounts/{}/savedorders/{}",
                urlencoding::encode(account_id.as_str()),
                saved_order_id
            ))
            .await?;
        Ok(())
    }
}
