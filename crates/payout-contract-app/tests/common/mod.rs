//! Shared fixtures for app integration tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use payout_contract_app::{SuiteConfig, user_agent};
use payout_contract_client::{ApiConfig, ApiRequest, ApiTransport, ClientError, PayoutClient};
use payout_contract_core::{CreatePaymentRequest, HttpResponse, Money};

/// Payout id used by create and execute fixtures.
#[allow(dead_code)]
pub const PAYOUT_ID: &str = "generated_payout_id";

/// Transport answering by path suffix, recording every request path.
#[derive(Debug, Default)]
pub struct RoutedTransport {
    pub routes: Vec<(&'static str, HttpResponse)>,
    pub seen: Mutex<Vec<String>>,
}

impl ApiTransport for RoutedTransport {
    fn send(&self, request: &ApiRequest) -> Result<HttpResponse, ClientError> {
        let path = request.url.path().to_string();
        self.seen
            .lock()
            .expect("seen lock should work")
            .push(path.clone());

        self.routes
            .iter()
            .find(|(suffix, _)| path.ends_with(suffix))
            .map(|(_, response)| response.clone())
            .ok_or_else(|| ClientError::Transport(format!("connection refused for {path}")))
    }
}

/// JSON response with status 200.
#[allow(dead_code)]
pub fn ok_json(body: &str) -> HttpResponse {
    HttpResponse::new(200, body).with_header("Content-Type", "application/json")
}

/// Payment body with the given status value.
#[allow(dead_code)]
pub fn payment_json(status: &str) -> String {
    format!(
        r#"{{
            "paymentId":"{PAYOUT_ID}",
            "creationDateTime":"2024-01-01T00:00:00Z",
            "expirationDatetime":"2024-01-02T00:00:00Z",
            "status":{{"value":"{status}","changedDateTime":"2024-01-01T00:00:01.000Z"}},
            "recipientDetails":{{"providerCode":"qiwi-wallet","fields":{{"phone":"79123456789"}}}},
            "amount":{{"value":"1.00","currency":"RUB"}}
        }}"#
    )
}

/// Balance body with positive amounts.
#[allow(dead_code)]
pub fn balance_json() -> &'static str {
    r#"{
        "balance":{"value":"10.00","currency":"RUB"},
        "overdraft":{"value":"5","currency":"RUB"},
        "available":{"value":"15.00","currency":"RUB"}
    }"#
}

/// Suite config pointing at a fake base URL.
#[allow(dead_code)]
pub fn suite_config() -> SuiteConfig {
    SuiteConfig {
        api: ApiConfig {
            base_url: "https://api.example.test/partner".to_string(),
            agent_id: "agent-1".to_string(),
            point_id: "point-1".to_string(),
            bearer_token: "secret-token".to_string(),
            user_agent: user_agent(),
        },
        payout_id: PAYOUT_ID.to_string(),
        create_request: CreatePaymentRequest::new(
            "qiwi-wallet",
            BTreeMap::from([("phone".to_string(), "79123456789".to_string())]),
            Money::new("1.00", "RUB"),
        )
        .expect("create request fixture should build"),
        timeout: Duration::from_millis(100),
    }
}

/// Builds a client over a routed transport.
#[allow(dead_code)]
pub fn client_with(
    routes: Vec<(&'static str, HttpResponse)>,
) -> (PayoutClient, Arc<RoutedTransport>) {
    let transport = Arc::new(RoutedTransport {
        routes,
        seen: Mutex::new(Vec::new()),
    });
    let client = PayoutClient::new(suite_config().api, transport.clone())
        .expect("client fixture should build");
    (client, transport)
}
