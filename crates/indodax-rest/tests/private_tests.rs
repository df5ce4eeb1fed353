//! Integration tests for signed private endpoints

mod common;

use common::{
    authed_client, expected_signature, form_fields, header, invalid_nonce_body, sent_nonce,
    setup_mock_server, API_KEY,
};
use indodax_rest::{
    ApiErrorCode, CancelOrderRequest, ClientConfig, GetOrderRequest, IndodaxClient,
    OpenOrdersRequest, OrderSide, Payload, RestError, TradeRequest,
};
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header_exists, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_trade_returns_return_object() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/tapi"))
        .and(header_exists("Key"))
        .and(header_exists("Sign"))
        .and(body_string_contains("method=trade"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": 1,
            "return": {
                "receive_btc": "0.00000000",
                "spend_rp": 0,
                "fee": 0,
                "remain_rp": "50000",
                "order_id": 9_001
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let order = TradeRequest::buy_limit("btc_idr", dec!(1000000000), dec!(50000));
    let result = client.trade(&order).await.unwrap();

    assert_eq!(result["order_id"], 9_001);
    assert_eq!(result["remain_rp"], "50000");
}

#[tokio::test]
async fn test_request_is_signed_over_form_body() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/tapi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": 1, "return": {} })))
        .mount(&server)
        .await;

    let client = authed_client(&server);
    client
        .cancel_order(&CancelOrderRequest::new("btc_idr", 42, OrderSide::Sell))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];

    assert_eq!(header(request, "Key"), API_KEY);
    assert_eq!(header(request, "Sign"), expected_signature(request));

    let keys: Vec<String> = form_fields(request).into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["method", "pair", "order_id", "type", "nonce"]);
}

#[tokio::test]
async fn test_free_text_values_verify_after_form_decoding() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/tapi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": 1, "return": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let order = TradeRequest::buy_limit("btc_idr", dec!(1000000000), dec!(50000))
        .with_client_order_id("grid a&b=c");
    client.trade(&order).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let request = &requests[0];

    let client_order_id = form_fields(request)
        .into_iter()
        .find(|(k, _)| k == "client_order_id")
        .map(|(_, v)| v);
    assert_eq!(client_order_id.as_deref(), Some("grid a&b=c"));
    assert_eq!(header(request, "Sign"), expected_signature(request));
}

#[tokio::test]
async fn test_back_to_back_calls_use_distinct_nonces() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/tapi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": 1, "return": {} })))
        .expect(2)
        .mount(&server)
        .await;

    let client = authed_client(&server);
    client.get_info().await.unwrap();
    client.open_orders(&OpenOrdersRequest::all()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let first = sent_nonce(&requests[0]);
    let second = sent_nonce(&requests[1]);
    assert!(second > first);
    assert!(client.get_nonce() > second);
}

#[tokio::test]
async fn test_invalid_nonce_triggers_recovery() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/tapi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(invalid_nonce_body("123.456")))
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let err = client
        .trade(&TradeRequest::sell_limit("btc_idr", dec!(1000000000), dec!(0.01)))
        .await
        .unwrap_err();

    assert!(err.is_invalid_nonce());
    match err {
        RestError::Api { code, message } => {
            assert_eq!(code, ApiErrorCode::InvalidNonce);
            assert!(message.starts_with("Nonce must be greater than"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert_eq!(client.get_nonce(), 123_456);
}

#[tokio::test]
async fn test_next_call_after_recovery_exceeds_hint() {
    let server = setup_mock_server().await;
    let hint: u64 = 9_000_000_000_000;
    Mock::given(method("POST"))
        .and(path("/tapi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(invalid_nonce_body(&hint.to_string())))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tapi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": 1, "return": {} })))
        .mount(&server)
        .await;

    let client = authed_client(&server);
    assert!(client.get_info().await.unwrap_err().is_invalid_nonce());
    assert_eq!(client.get_nonce(), hint);

    client.get_info().await.unwrap();
    let requests = server.received_requests().await.unwrap();
    assert!(sent_nonce(&requests[1]) > hint);
}

#[tokio::test]
async fn test_unexpected_nonce_message_skips_recovery() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/tapi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": 0,
            "error": "Invalid nonce",
            "error_code": "invalid_nonce"
        })))
        .mount(&server)
        .await;

    let client = authed_client(&server);
    client.set_nonce(10);
    let err = client.get_info().await.unwrap_err();
    assert!(err.is_invalid_nonce());

    let sent = sent_nonce(&server.received_requests().await.unwrap()[0]);
    assert_eq!(client.get_nonce(), sent + 1);
}

#[tokio::test]
async fn test_other_api_error_leaves_nonce_alone() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/tapi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": 0,
            "error": "Invalid order.",
            "error_code": "order_not_found"
        })))
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let err = client
        .get_order(&GetOrderRequest::new("btc_idr", 1))
        .await
        .unwrap_err();

    match err {
        RestError::Api { code, message } => {
            assert_eq!(code, ApiErrorCode::Other("order_not_found".to_string()));
            assert_eq!(message, "Invalid order.");
        }
        other => panic!("expected Api error, got {other:?}"),
    }

    let sent = sent_nonce(&server.received_requests().await.unwrap()[0]);
    assert_eq!(client.get_nonce(), sent + 1);
}

#[tokio::test]
async fn test_malformed_private_body() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/tapi"))
        .respond_with(ResponseTemplate::new(200).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let result = client.get_info().await;
    assert!(matches!(result, Err(RestError::MalformedResponse { .. })));
}

#[tokio::test]
async fn test_caller_nonce_is_sent_unchanged() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/tapi"))
        .and(body_string_contains("nonce=777"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": 1, "return": { "ok": true } })))
        .expect(1)
        .mount(&server)
        .await;

    let client = authed_client(&server);
    client.set_nonce(3);

    let payload = Payload::with_method("withdrawFee")
        .field("currency", "btc")
        .field("nonce", 777);
    let result = client.private_call(payload).await.unwrap();

    assert_eq!(result["ok"], true);
    assert_eq!(client.get_nonce(), 3);
}

#[tokio::test]
async fn test_private_call_without_credentials() {
    let server = setup_mock_server().await;
    let client = common::public_client(&server);

    assert!(matches!(client.get_info().await, Err(RestError::AuthRequired)));
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(client.get_nonce(), 0);
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let client = IndodaxClient::with_config(
        ClientConfig::new()
            .with_credentials(indodax_rest::Credentials::new(API_KEY, "s"))
            .with_private_url("http://127.0.0.1:1/tapi")
            .with_timeout(5),
    )
    .unwrap();

    let result = client.get_info().await;
    assert!(matches!(result, Err(RestError::Transport(_))));
}

#[tokio::test]
async fn test_concurrent_calls_reach_server_in_nonce_order() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/tapi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": 1, "return": {} })))
        .expect(6)
        .mount(&server)
        .await;

    let client = authed_client(&server);
    let handles: Vec<_> = (0..6)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.get_info().await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let nonces: Vec<u64> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(sent_nonce)
        .collect();

    assert_eq!(nonces.len(), 6);
    assert!(nonces.windows(2).all(|w| w[1] > w[0]));
}
