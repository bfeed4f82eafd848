//! Tests create-payment body construction and wire shape.

use std::collections::BTreeMap;

use payout_contract_core::{CoreError, CreatePaymentRequest, Money};

#[test]
fn create_request_codec_tests_emits_camel_case_keys() {
    let fields = BTreeMap::from([("phone".to_string(), "79123456789".to_string())]);
    let request = CreatePaymentRequest::new("qiwi-wallet", fields, Money::new("1.00", "RUB"))
        .expect("request should build");

    let encoded = request.to_json_bytes().expect("encoding should succeed");
    let value: serde_json::Value =
        serde_json::from_slice(&encoded).expect("encoded body should be json");

    assert_eq!(value["recipientDetails"]["providerCode"], "qiwi-wallet");
    assert_eq!(value["recipientDetails"]["fields"]["phone"], "79123456789");
    assert_eq!(value["amount"]["value"], "1.00");
    assert_eq!(value["amount"]["currency"], "RUB");
}

#[test]
fn create_request_codec_tests_rejects_blank_recipient_field() {
    let fields = BTreeMap::from([("phone".to_string(), " ".to_string())]);
    let error = CreatePaymentRequest::new("qiwi-wallet", fields, Money::new("1.00", "RUB"))
        .expect_err("blank phone should be rejected");

    assert!(matches!(error, CoreError::InvalidRequest(message) if message.contains("phone")));
}
