//! Integration tests for endpoint URLs, methods, and headers.

mod common;

use std::collections::BTreeMap;

use payout_contract_client::Method;
use payout_contract_core::{CreatePaymentRequest, Money};

#[test]
fn endpoint_construction_tests_builds_listing_and_balance_paths() {
    let (client, _) = common::recording_client();

    let list = client.list_payments_request().expect("list request should build");
    assert_eq!(list.method, Method::Get);
    assert_eq!(
        list.url.as_str(),
        "https://api.example.test/partner/v1/agents/agent-1/points/point-1/payments"
    );
    assert!(list.body.is_none());

    let balance = client.balance_request().expect("balance request should build");
    assert_eq!(
        balance.url.path(),
        "/partner/v1/agents/agent-1/points/point-1/balance"
    );
}

#[test]
fn endpoint_construction_tests_builds_create_and_execute_paths() {
    let (client, _) = common::recording_client();
    let body = CreatePaymentRequest::new(
        "qiwi-wallet",
        BTreeMap::from([("phone".to_string(), "79123456789".to_string())]),
        Money::new("1.00", "RUB"),
    )
    .expect("body should build");

    let create = client
        .create_payment_request("payout-42", &body)
        .expect("create request should build");
    assert_eq!(create.method, Method::Put);
    assert_eq!(
        create.url.path(),
        "/partner/v1/agents/agent-1/points/point-1/payments/payout-42"
    );
    assert_eq!(create.header("content-type"), Some("application/json"));
    let sent: serde_json::Value =
        serde_json::from_slice(create.body.as_deref().expect("create has a body"))
            .expect("body should be json");
    assert_eq!(sent["amount"]["value"], "1.00");

    let execute = client
        .execute_payment_request("payout-42")
        .expect("execute request should build");
    assert_eq!(execute.method, Method::Post);
    assert_eq!(
        execute.url.path(),
        "/partner/v1/agents/agent-1/points/point-1/payments/payout-42/execute"
    );
    assert_eq!(execute.header("content-type"), None);
}

#[test]
fn endpoint_construction_tests_sets_auth_and_accept_headers() {
    let (client, _) = common::recording_client();
    let request = client.balance_request().expect("balance request should build");

    assert_eq!(request.header("authorization"), Some("Bearer token-abc"));
    assert_eq!(request.header("accept"), Some("application/json"));
    assert_eq!(request.header("user-agent"), Some("payout-contract/test"));
}

#[test]
fn endpoint_construction_tests_percent_encodes_ids() {
    let (client, _) = common::recording_client();
    let request = client
        .execute_payment_request("a/b c")
        .expect("execute request should build");

    assert!(request.url.path().ends_with("/payments/a%2Fb%20c/execute"));
}

#[test]
fn endpoint_construction_tests_handles_trailing_slash_base() {
    let mut config = common::config();
    config.base_url = "https://api.example.test/partner/".to_string();
    let (_, transport) = common::recording_client();
    let client = payout_contract_client::PayoutClient::new(config, transport)
        .expect("client should build");

    let request = client.list_payments_request().expect("list request should build");
    assert_eq!(
        request.url.path(),
        "/partner/v1/agents/agent-1/points/point-1/payments"
    );
}
