//! Integration tests for tdameritrade-rs
//!
//! Every test runs the real client (reqwest transport, token manager and
//! services) against a local wiremock server standing in for the
//! TD Ameritrade API, so no credentials or network access are required.
//!
//! Run with: cargo test --test api_tests
//!
//! Set RUST_LOG=tdameritrade_rs=debug to see the client's tracing output.

use std::sync::Once;
use std::time::Duration;

use chrono::Utc;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use tdameritrade_rs::prelude::*;
use tdameritrade_rs::api::{OrdersQuery, TransactionsQuery};
use tdameritrade_rs::auth::TokenState;
use tdameritrade_rs::models::{AccountField, NewWatchlist, TransactionKind};

static INIT: Once = Once::new();

const ACCOUNT: &str = "123456789";

/// Initialize logging for tests
fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Create a client pointed at the mock server, without credentials
fn create_client(server: &MockServer) -> TdaClient {
    init_logging();
    let config = ClientConfig::new("TESTKEY", "https://localhost:8080/callback")
        .with_base_url(server.uri());
    TdaClient::new(config).expect("Failed to create client")
}

/// Create a client holding a fresh access token "T1"
async fn create_authenticated_client(server: &MockServer) -> TdaClient {
    let client = create_client(server);
    client
        .set_user_access_token(
            CredentialsInput::new("T1")
                .access_token_expires(Expiry::In(1800))
                .refresh_token("R1", Expiry::In(90 * 24 * 3600)),
        )
        .await
        .expect("valid credentials");
    client
}

fn account() -> AccountId {
    AccountId::new(ACCOUNT)
}

/// Mount the token endpoint answering with access token `access`
async fn mount_token_endpoint(server: &MockServer, access: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": access,
            "expires_in": 1800,
            "token_type": "Bearer",
            "scope": "PlaceTrades AccountAccess MoveMoney"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Body of the single order submitted to the mock server
async fn submitted_order(server: &MockServer) -> Value {
    let requests: Vec<Request> = server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .into_iter()
        .filter(|r| r.url.path().ends_with("/orders"))
        .collect();
    assert_eq!(requests.len(), 1, "exactly one order should be submitted");
    serde_json::from_slice(&requests[0].body).expect("order body is JSON")
}

// ============================================================================
// AUTHENTICATION TESTS
// ============================================================================

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_authenticate_exchanges_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("access_type=offline"))
            .and(body_string_contains("code=abc123"))
            .and(body_string_contains("client_id=TESTKEY%40AMER.OAUTHAP"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "T1",
                "refresh_token": "R1",
                "expires_in": 1800,
                "refresh_token_expires_in": 7776000
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_client(&server);
        let credentials = client.authenticate("abc123").await.expect("Should authenticate");

        assert_eq!(credentials.access_token().map(|t| t.expose()), Some("T1"));
        assert_eq!(credentials.refresh_token().map(|t| t.expose()), Some("R1"));
        assert_eq!(client.token_manager().state().await, TokenState::Valid);
    }

    #[tokio::test]
    async fn test_authenticate_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })),
            )
            .mount(&server)
            .await;

        let client = create_client(&server);
        let err = client.authenticate("bad-code").await.unwrap_err();

        assert!(matches!(err, Error::Api { status: 400, ref message, .. } if message == "invalid_grant"));
        assert!(client.credentials().await.is_empty());
    }

    #[tokio::test]
    async fn test_bearer_header_attached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/accounts"))
            .and(header("authorization", "Bearer T1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_authenticated_client(&server).await;
        let accounts = client.accounts().list(&[]).await.expect("Should list accounts");
        assert!(accounts.is_empty());
    }

    #[tokio::test]
    async fn test_stale_access_token_refreshed_before_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=R1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "T2",
                "expires_in": 1800
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/accounts"))
            .and(header("authorization", "Bearer T2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_client(&server);
        client
            .set_user_access_token(
                CredentialsInput::new("T1")
                    .access_token_expires(Expiry::In(60))
                    .refresh_token("R1", Expiry::In(90 * 24 * 3600)),
            )
            .await
            .expect("valid credentials");

        client.accounts().list(&[]).await.expect("Should list accounts");

        let credentials = client.credentials().await;
        assert_eq!(credentials.access_token().map(|t| t.expose()), Some("T2"));
        // The refresh token survives an access-token refresh
        assert_eq!(credentials.refresh_token().map(|t| t.expose()), Some("R1"));
    }

    #[tokio::test]
    async fn test_concurrent_requests_refresh_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "access_token": "T2", "expires_in": 1800 }))
                    .set_delay(Duration::from_millis(100)),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/accounts"))
            .and(header("authorization", "Bearer T2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(3)
            .mount(&server)
            .await;

        let client = create_client(&server);
        client
            .set_user_access_token(
                CredentialsInput::new("T1")
                    .access_token_expires(Expiry::In(10))
                    .refresh_token("R1", Expiry::In(3600)),
            )
            .await
            .expect("valid credentials");

        let (acc_a, acc_b, acc_c) = (client.accounts(), client.accounts(), client.accounts());
        let (a, b, c) = tokio::join!(
            acc_a.list(&[]),
            acc_b.list(&[]),
            acc_c.list(&[]),
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
    }

    #[tokio::test]
    async fn test_expired_refresh_token_logs_out() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server, "never", 0).await;

        let client = create_client(&server);
        client
            .set_user_access_token(
                CredentialsInput::new("T1")
                    .access_token_expires(Utc::now() - chrono::Duration::minutes(5))
                    .refresh_token("R1", Utc::now() - chrono::Duration::minutes(1)),
            )
            .await
            .expect("valid credentials");

        let err = client.accounts().list(&[]).await.unwrap_err();
        assert!(matches!(err, Error::RefreshTokenExpired));
        assert_eq!(err.code(), "REFRESH_TOKEN_EXPIRED");
        assert!(client.credentials().await.is_empty());
    }

    #[tokio::test]
    async fn test_manual_refresh() {
        let server = MockServer::start().await;
        mount_token_endpoint(&server, "T9", 1).await;

        let client = create_authenticated_client(&server).await;
        let credentials = client
            .refresh_access_token("R1")
            .await
            .expect("Should refresh");

        assert_eq!(credentials.access_token().map(|t| t.expose()), Some("T9"));
    }
}

// ============================================================================
// ORDERS SERVICE TESTS
// ============================================================================

mod orders_tests {
    use super::*;

    async fn mount_place_order(server: &MockServer, order_id: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/accounts/{}/orders", ACCOUNT)))
            .and(header("authorization", "Bearer T1"))
            .respond_with(ResponseTemplate::new(201).insert_header(
                "Location",
                format!("https://api.tdameritrade.com/v1/accounts/{}/orders/{}", ACCOUNT, order_id),
            ))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_buy_stock() {
        let server = MockServer::start().await;
        mount_place_order(&server, "4242").await;
        let client = create_authenticated_client(&server).await;

        let request = OrderRequest::new(ACCOUNT, "aapl")
            .quantity(dec!(10))
            .price(dec!(150.25));
        let order_id = client.orders().buy_stock(request).await.expect("Should place order");
        assert_eq!(order_id, Some(OrderId::new("4242")));

        let order = submitted_order(&server).await;
        assert_eq!(order["orderType"], "LIMIT");
        assert_eq!(order["session"], "NORMAL");
        assert_eq!(order["duration"], "GOOD_TILL_CANCEL");
        assert_eq!(order["orderStrategyType"], "SINGLE");
        assert_eq!(order["price"], 150.25);
        let leg = &order["orderLegCollection"][0];
        assert_eq!(leg["instruction"], "BUY");
        assert_eq!(leg["quantity"], 10.0);
        assert_eq!(leg["instrument"]["symbol"], "AAPL");
        assert_eq!(leg["instrument"]["assetType"], "EQUITY");
    }

    #[tokio::test]
    async fn test_presets_pick_instruction() {
        let cases: [(&str, &str, &str); 8] = [
            ("buy_stock", "BUY", "EQUITY"),
            ("sell_stock", "SELL", "EQUITY"),
            ("short_stock", "SELL_SHORT", "EQUITY"),
            ("cover_stock", "BUY_TO_COVER", "EQUITY"),
            ("buy_option", "BUY_TO_OPEN", "OPTION"),
            ("sell_option", "SELL_TO_CLOSE", "OPTION"),
            ("write_option", "SELL_TO_OPEN", "OPTION"),
            ("close_option", "BUY_TO_CLOSE", "OPTION"),
        ];

        for (preset, instruction, asset_type) in cases {
            let server = MockServer::start().await;
            mount_place_order(&server, "1").await;
            let client = create_authenticated_client(&server).await;
            let orders = client.orders();

            let request = OrderRequest::new(ACCOUNT, "XYZ").price(dec!(1.50));
            let result = match preset {
                "buy_stock" => orders.buy_stock(request).await,
                "sell_stock" => orders.sell_stock(request).await,
                "short_stock" => orders.short_stock(request).await,
                "cover_stock" => orders.cover_stock(request).await,
                "buy_option" => orders.buy_option(request).await,
                "sell_option" => orders.sell_option(request).await,
                "write_option" => orders.write_option(request).await,
                _ => orders.close_option(request).await,
            };
            assert!(result.is_ok(), "{} should succeed: {:?}", preset, result);

            let order = submitted_order(&server).await;
            let leg = &order["orderLegCollection"][0];
            assert_eq!(leg["instruction"], instruction, "{}", preset);
            assert_eq!(leg["instrument"]["assetType"], asset_type, "{}", preset);
            // Quantity defaults to a single share or contract
            assert_eq!(leg["quantity"], 1.0, "{}", preset);
        }
    }

    #[tokio::test]
    async fn test_order_is_sent_as_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/accounts/{}/orders", ACCOUNT)))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({ "orderType": "LIMIT" })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        let client = create_authenticated_client(&server).await;

        let request = OrderRequest::new(ACCOUNT, "AAPL").price(dec!(100));
        let order_id = client.orders().buy_stock(request).await.expect("Should place order");
        assert_eq!(order_id, None);
    }

    #[tokio::test]
    async fn test_invalid_order_not_submitted() {
        let server = MockServer::start().await;
        let client = create_authenticated_client(&server).await;

        let cases = [
            OrderRequest::new(ACCOUNT, "AAPL"),
            OrderRequest::new(ACCOUNT, "AAPL").price(dec!(0.001)),
            OrderRequest::new(ACCOUNT, "AAPL").price(dec!(10)).quantity(dec!(0)),
            OrderRequest::new(ACCOUNT, "  ").price(dec!(10)),
            OrderRequest::new("", "AAPL").price(dec!(10)),
        ];
        for request in cases {
            let err = client.orders().buy_stock(request.clone()).await.unwrap_err();
            assert_eq!(err.code(), "INVALID_ORDER_REQUEST", "{:?}", request);
        }

        let received = server.received_requests().await.unwrap_or_default();
        assert!(received.is_empty(), "no request should reach the API");
    }

    #[tokio::test]
    async fn test_minimum_price_accepted() {
        let server = MockServer::start().await;
        mount_place_order(&server, "7").await;
        let client = create_authenticated_client(&server).await;

        let request = OrderRequest::new(ACCOUNT, "F").price(dec!(0.01));
        assert!(client.orders().sell_stock(request).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_and_cancel_orders() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/accounts/{}/orders", ACCOUNT)))
            .and(query_param("status", "WORKING"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "orderId": 4242,
                "accountId": 123456789,
                "orderType": "LIMIT",
                "session": "NORMAL",
                "duration": "GOOD_TILL_CANCEL",
                "orderStrategyType": "SINGLE",
                "status": "WORKING",
                "price": 150.25,
                "quantity": 10,
                "filledQuantity": 0,
                "remainingQuantity": 10,
                "cancelable": true,
                "orderLegCollection": [{
                    "instruction": "BUY",
                    "quantity": 10,
                    "instrument": { "symbol": "AAPL", "assetType": "EQUITY" }
                }]
            }])))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("/accounts/{}/orders/4242", ACCOUNT)))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_authenticated_client(&server).await;
        let orders = client
            .orders()
            .list(&account(), Some(OrdersQuery::with_status(OrderStatus::Working)))
            .await
            .expect("Should list orders");
        assert_eq!(orders.len(), 1);

        let order = &orders[0];
        assert!(order.is_cancelable());
        client
            .orders()
            .cancel(&account(), &order.id())
            .await
            .expect("Should cancel order");
    }

    #[tokio::test]
    async fn test_account_id_is_path_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/accounts/123%20456%2F7/orders/4242"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/accounts/123%20456%2F7/savedorders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_authenticated_client(&server).await;
        let account = AccountId::new("123 456/7");
        client
            .orders()
            .cancel(&account, &OrderId::new("4242"))
            .await
            .expect("Should cancel order");
        let saved = client.orders().saved(&account).await.expect("Should list saved orders");
        assert!(saved.is_empty());
    }
}

// ============================================================================
// ACCOUNTS SERVICE TESTS
// ============================================================================

mod accounts_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_account_with_positions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/accounts/{}", ACCOUNT)))
            .and(query_param("fields", "positions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "securitiesAccount": {
                    "accountId": ACCOUNT,
                    "type": "MARGIN",
                    "roundTrips": 0,
                    "isDayTrader": false,
                    "positions": [{
                        "longQuantity": 10,
                        "shortQuantity": 0,
                        "averagePrice": 120.5,
                        "marketValue": 1502.5,
                        "instrument": { "symbol": "AAPL", "assetType": "EQUITY" }
                    }]
                }
            })))
            .mount(&server)
            .await;

        let client = create_authenticated_client(&server).await;
        let account = client
            .accounts()
            .get(&account(), &[AccountField::Positions])
            .await
            .expect("Should get account");

        assert_eq!(account.id(), AccountId::new(ACCOUNT));
        assert!(account.is_margin());
        assert_eq!(account.positions.len(), 1);
        assert_eq!(account.positions[0].net_quantity(), dec!(10));
    }

    #[tokio::test]
    async fn test_unknown_account_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/accounts/000"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "error": "Account not found" })),
            )
            .mount(&server)
            .await;

        let client = create_authenticated_client(&server).await;
        let err = client
            .accounts()
            .get(&AccountId::new("000"), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Api { status: 404, .. }));
        assert!(err.is_client_error());
        assert!(!err.is_retryable());
    }
}

// ============================================================================
// TRANSACTIONS SERVICE TESTS
// ============================================================================

mod transactions_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_trades() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/accounts/{}/transactions", ACCOUNT)))
            .and(query_param("type", "TRADE"))
            .and(query_param("symbol", "AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "transactionId": 1001,
                "type": "TRADE",
                "transactionSubType": "BY",
                "description": "BUY TRADE",
                "netAmount": -1502.5,
                "transactionItem": {
                    "amount": 10,
                    "price": 150.25,
                    "instrument": { "symbol": "AAPL", "assetType": "EQUITY" }
                }
            }])))
            .mount(&server)
            .await;

        let client = create_authenticated_client(&server).await;
        let trades = client
            .transactions()
            .list(
                &account(),
                Some(TransactionsQuery::of_type(TransactionType::Trade).symbol("AAPL")),
            )
            .await
            .expect("Should list transactions");

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].kind, TransactionKind::Trade);
        assert_eq!(trades[0].symbol(), Some("AAPL"));
        assert_eq!(trades[0].net_amount, dec!(-1502.5));
    }
}

// ============================================================================
// MARKET DATA SERVICE TESTS
// ============================================================================

mod market_data_tests {
    use super::*;

    #[tokio::test]
    async fn test_quotes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/marketdata/quotes"))
            .and(query_param("symbol", "AAPL,MSFT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "AAPL": { "symbol": "AAPL", "assetType": "EQUITY", "bidPrice": 150.0, "askPrice": 150.1 },
                "MSFT": { "symbol": "MSFT", "assetType": "EQUITY", "bidPrice": 300.0, "askPrice": 300.4 }
            })))
            .mount(&server)
            .await;

        let client = create_authenticated_client(&server).await;
        let quotes = client
            .market_data()
            .quotes(&["aapl", "msft"])
            .await
            .expect("Should get quotes");

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes["AAPL"].mid_price(), Some(dec!(150.05)));
        assert_eq!(quotes["MSFT"].mid_price(), Some(dec!(300.2)));
    }

    #[tokio::test]
    async fn test_single_quote() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/marketdata/SPY/quotes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "SPY": { "symbol": "SPY", "lastPrice": 420.69 }
            })))
            .mount(&server)
            .await;

        let client = create_authenticated_client(&server).await;
        let quote = client.market_data().quote("spy").await.expect("Should get quote");

        assert_eq!(quote.and_then(|q| q.last_price), Some(dec!(420.69)));
    }

    #[tokio::test]
    async fn test_empty_quotes_make_no_request() {
        let server = MockServer::start().await;
        let client = create_authenticated_client(&server).await;

        let quotes = client.market_data().quotes(&[]).await.expect("Should succeed");
        assert!(quotes.is_empty());
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }
}

// ============================================================================
// WATCHLISTS SERVICE TESTS
// ============================================================================

mod watchlists_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/accounts/{}/watchlists", ACCOUNT)))
            .and(body_partial_json(json!({
                "name": "Tech",
                "watchlistItems": [
                    { "instrument": { "symbol": "AAPL", "assetType": "EQUITY" } },
                    { "instrument": { "symbol": "MSFT", "assetType": "EQUITY" } }
                ]
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/accounts/{}/watchlists", ACCOUNT)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "name": "Tech",
                "watchlistId": "77",
                "accountId": ACCOUNT,
                "watchlistItems": [
                    { "sequenceId": 1, "instrument": { "symbol": "AAPL", "assetType": "EQUITY" } }
                ]
            }])))
            .mount(&server)
            .await;

        let client = create_authenticated_client(&server).await;
        client
            .watchlists()
            .create(&account(), &NewWatchlist::equities("Tech", &["aapl", "msft"]))
            .await
            .expect("Should create watchlist");

        let lists = client.watchlists().list(&account()).await.expect("Should list");
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].watchlist_id, "77");
        assert_eq!(lists[0].watchlist_items[0].instrument.symbol, "AAPL");
    }
}

// ============================================================================
// REQUEST EXECUTOR TESTS
// ============================================================================

mod executor_tests {
    use super::*;
    use reqwest::header::{HeaderValue, CONTENT_TYPE};

    #[tokio::test]
    async fn test_json_content_type_by_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userprincipals"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_authenticated_client(&server).await;
        client
            .execute(ApiRequest::get("/userprincipals"))
            .await
            .expect("Should send request");
    }

    #[tokio::test]
    async fn test_caller_content_type_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/accounts/{}/orders", ACCOUNT)))
            .and(header("content-type", "application/vnd.tda.order+json"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_authenticated_client(&server).await;
        let request = ApiRequest::post(format!("/accounts/{}/orders", ACCOUNT))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/vnd.tda.order+json"))
            .json(&json!({ "orderType": "MARKET" }))
            .expect("body serializes");
        client.execute(request).await.expect("Should send request");

        let received = server.received_requests().await.unwrap_or_default();
        assert_eq!(received.len(), 1);
        let content_types: Vec<_> = received[0].headers.get_all("content-type").iter().collect();
        assert_eq!(content_types.len(), 1, "content type must not be duplicated");
        let body: Value = serde_json::from_slice(&received[0].body).expect("body is JSON");
        assert_eq!(body["orderType"], "MARKET");
    }
}

// ============================================================================
// ERROR HANDLING TESTS
// ============================================================================

mod error_handling_tests {
    use super::*;

    #[tokio::test]
    async fn test_unauthenticated_request_rejected_by_api() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/accounts"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "The access token being passed has expired or is invalid."
            })))
            .mount(&server)
            .await;

        let client = create_client(&server);
        let err = client.accounts().list(&[]).await.unwrap_err();

        assert!(err.is_auth_error());
        assert_eq!(err.code(), "HTTP_ERROR");
    }

    #[tokio::test]
    async fn test_server_error_is_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/marketdata/quotes"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&server)
            .await;

        let client = create_authenticated_client(&server).await;
        let err = client.market_data().quotes(&["AAPL"]).await.unwrap_err();

        assert!(err.is_retryable());
        assert!(err.is_server_error());
        assert!(matches!(err, Error::Api { ref message, .. } if message == "Service Unavailable"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
            .mount(&server)
            .await;

        let client = create_authenticated_client(&server).await;
        let err = client.accounts().list(&[]).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_RESPONSE");
    }
}
