//! Shared fakes for client integration tests.

use std::sync::{Arc, Mutex};

use payout_contract_client::{ApiConfig, ApiRequest, ApiTransport, ClientError, PayoutClient};
use payout_contract_core::HttpResponse;

/// Transport that records every request and answers with a canned response.
#[derive(Debug)]
pub struct RecordingTransport {
    pub requests: Mutex<Vec<ApiRequest>>,
    pub response: HttpResponse,
}

impl ApiTransport for RecordingTransport {
    fn send(&self, request: &ApiRequest) -> Result<HttpResponse, ClientError> {
        self.requests
            .lock()
            .expect("request log lock should work")
            .push(request.clone());
        Ok(self.response.clone())
    }
}

/// Config pointing at a sandbox-like base URL with a path prefix.
#[allow(dead_code)]
pub fn config() -> ApiConfig {
    ApiConfig {
        base_url: "https://api.example.test/partner".to_string(),
        agent_id: "agent-1".to_string(),
        point_id: "point-1".to_string(),
        bearer_token: "token-abc".to_string(),
        user_agent: "payout-contract/test".to_string(),
    }
}

/// Builds a client backed by a recording transport.
#[allow(dead_code)]
pub fn recording_client() -> (PayoutClient, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport {
        requests: Mutex::new(Vec::new()),
        response: HttpResponse::new(200, "[]").with_header("content-type", "application/json"),
    });
    let client = PayoutClient::new(config(), transport.clone()).expect("client should build");
    (client, transport)
}
