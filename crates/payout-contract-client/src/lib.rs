#![warn(missing_docs)]
//! # payout-contract-client
//!
//! ## Purpose
//! Builds and sends the four payout API requests exercised by the contract
//! suite.
//!
//! ## Responsibilities
//! - Validate base URL policy (absolute HTTPS, no embedded credentials).
//! - Build per-agent/per-point endpoint URLs with percent-encoded ids.
//! - Attach bearer, accept, and user-agent headers to every request.
//! - Send requests through an injectable [`ApiTransport`].
//!
//! ## Data flow
//! [`ApiConfig`] -> [`PayoutClient`] builds [`ApiRequest`] -> [`ApiTransport`]
//! returns [`HttpResponse`] -> validator crate judges it.
//!
//! ## Ownership and lifetimes
//! Requests own their URL, headers, and body so transports can hold them
//! across blocking I/O without borrowing from the client.
//!
//! ## Error model
//! Config and endpoint policy violations, body encoding, and transport
//! failures return [`ClientError`]. A non-200 response is not an error here.
//!
//! ## Security and privacy notes
//! `Debug` output of [`ApiConfig`] and [`ApiRequest`] never includes the bearer
//! token. Request logging records method and path only.
//!
//! ## Example
//! ```rust
//! use payout_contract_client::validate_base_url;
//!
//! assert!(validate_base_url("https://api-test.qiwi.com/partner").is_ok());
//! assert!(validate_base_url("http://api-test.qiwi.com/partner").is_err());
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use payout_contract_core::{CoreError, CreatePaymentRequest, HttpResponse, JSON_MEDIA_TYPE};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Sandbox base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api-test.qiwi.com/partner";

/// Default transport timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// HTTP method subset used by the payout API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `PUT`
    Put,
    /// `POST`
    Post,
}

impl Method {
    /// Returns the wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
        }
    }
}

/// Connection and identity settings for one agent point.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL the `/v1/...` paths are appended to.
    pub base_url: String,
    /// Agent identifier.
    pub agent_id: String,
    /// Point identifier.
    pub point_id: String,
    /// Bearer token for the `Authorization` header.
    pub bearer_token: String,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("agent_id", &self.agent_id)
            .field("point_id", &self.point_id)
            .field("bearer_token", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Fully built request handed to a transport.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute target URL.
    pub url: Url,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
    /// Optional JSON body.
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Returns the first header value whose name matches case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case("authorization") {
                    (name.as_str(), "<redacted>")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();

        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("headers", &headers)
            .field("body_len", &self.body.as_ref().map(Vec::len))
            .finish()
    }
}

/// Abstract transport used by [`PayoutClient`].
pub trait ApiTransport: Send + Sync {
    /// Sends one request and returns the raw response, whatever its status.
    fn send(&self, request: &ApiRequest) -> Result<HttpResponse, ClientError>;
}

/// Client for the payout endpoints of one agent point.
#[derive(Clone)]
pub struct PayoutClient {
    base: Url,
    config: ApiConfig,
    transport: Arc<dyn ApiTransport>,
}

impl PayoutClient {
    /// Creates a validated client.
    ///
    /// # Errors
    /// Returns [`ClientError::InvalidEndpoint`] when the base URL violates
    /// [`validate_base_url`], and [`ClientError::InvalidConfig`] when agent id,
    /// point id, or token is blank.
    pub fn new(config: ApiConfig, transport: Arc<dyn ApiTransport>) -> Result<Self, ClientError> {
        let base = validate_base_url(&config.base_url)?;

        for (name, value) in [
            ("agent id", &config.agent_id),
            ("point id", &config.point_id),
            ("bearer token", &config.bearer_token),
        ] {
            if value.trim().is_empty() {
                return Err(ClientError::InvalidConfig(format!("{name} is empty")));
            }
        }

        Ok(Self {
            base,
            config,
            transport,
        })
    }

    /// Returns the validated configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Builds `GET /v1/agents/{agentId}/points/{pointId}/payments`.
    pub fn list_payments_request(&self) -> Result<ApiRequest, ClientError> {
        self.request(Method::Get, &["payments"], None)
    }

    /// Builds `GET /v1/agents/{agentId}/points/{pointId}/balance`.
    pub fn balance_request(&self) -> Result<ApiRequest, ClientError> {
        self.request(Method::Get, &["balance"], None)
    }

    /// Builds `PUT /v1/agents/{agentId}/points/{pointId}/payments/{payoutId}`.
    ///
    /// # Errors
    /// Returns [`ClientError::Encode`] when the body cannot be serialized.
    pub fn create_payment_request(
        &self,
        payout_id: &str,
        body: &CreatePaymentRequest,
    ) -> Result<ApiRequest, ClientError> {
        let encoded = body.to_json_bytes()?;
        self.request(Method::Put, &["payments", payout_id], Some(encoded))
    }

    /// Builds `POST /v1/agents/{agentId}/points/{pointId}/payments/{payoutId}/execute`.
    pub fn execute_payment_request(&self, payout_id: &str) -> Result<ApiRequest, ClientError> {
        self.request(Method::Post, &["payments", payout_id, "execute"], None)
    }

    /// Lists all payments of the point.
    pub fn list_payments(&self) -> Result<HttpResponse, ClientError> {
        self.send(&self.list_payments_request()?)
    }

    /// Fetches the point balance.
    pub fn balance(&self) -> Result<HttpResponse, ClientError> {
        self.send(&self.balance_request()?)
    }

    /// Creates payment `payout_id`.
    pub fn create_payment(
        &self,
        payout_id: &str,
        body: &CreatePaymentRequest,
    ) -> Result<HttpResponse, ClientError> {
        self.send(&self.create_payment_request(payout_id, body)?)
    }

    /// Executes previously created payment `payout_id`.
    pub fn execute_payment(&self, payout_id: &str) -> Result<HttpResponse, ClientError> {
        self.send(&self.execute_payment_request(payout_id)?)
    }

    fn send(&self, request: &ApiRequest) -> Result<HttpResponse, ClientError> {
        debug!(
            method = request.method.as_str(),
            path = request.url.path(),
            "sending payout api request"
        );
        let response = self.transport.send(request)?;
        debug!(status = response.status, "payout api responded");
        Ok(response)
    }

    fn request(
        &self,
        method: Method,
        tail: &[&str],
        body: Option<Vec<u8>>,
    ) -> Result<ApiRequest, ClientError> {
        if tail.iter().any(|segment| segment.trim().is_empty()) {
            return Err(ClientError::InvalidConfig(
                "path segment is empty".to_string(),
            ));
        }

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::InvalidEndpoint("base url cannot carry a path".to_string())
            })?
            .pop_if_empty()
            .extend([
                "v1",
                "agents",
                self.config.agent_id.as_str(),
                "points",
                self.config.point_id.as_str(),
            ])
            .extend(tail);

        let mut headers = vec![
            (
                "Authorization".to_string(),
                format!("Bearer {}", self.config.bearer_token),
            ),
            ("Accept".to_string(), JSON_MEDIA_TYPE.to_string()),
            ("User-Agent".to_string(), self.config.user_agent.clone()),
        ];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), JSON_MEDIA_TYPE.to_string()));
        }

        Ok(ApiRequest {
            method,
            url,
            headers,
            body,
        })
    }
}

/// Blocking `reqwest` transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Builds a transport whose requests time out after `timeout`.
    ///
    /// # Errors
    /// Returns [`ClientError::Transport`] when the TLS backend cannot start.
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| ClientError::Transport(format!("client build failed: {error}")))?;
        Ok(Self { client })
    }
}

impl ApiTransport for ReqwestTransport {
    fn send(&self, request: &ApiRequest) -> Result<HttpResponse, ClientError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .map_err(|error| ClientError::Transport(error.without_url().to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|text| (name.as_str().to_string(), text.to_string()))
            })
            .collect();
        let body = response
            .text()
            .map_err(|error| ClientError::Transport(format!("body read failed: {error}")))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Validates base URL policy and returns the parsed URL.
///
/// # Errors
/// Returns [`ClientError::InvalidEndpoint`] for unparsable, non-HTTPS, or
/// credential-bearing URLs.
pub fn validate_base_url(base_url: &str) -> Result<Url, ClientError> {
    let parsed = Url::parse(base_url)
        .map_err(|error| ClientError::InvalidEndpoint(format!("invalid base url: {error}")))?;

    if parsed.scheme() != "https" {
        return Err(ClientError::InvalidEndpoint(
            "base url must use https".to_string(),
        ));
    }

    if !parsed.username().is_empty() || parsed.password().is_some() {
        return Err(ClientError::InvalidEndpoint(
            "base url must not embed credentials".to_string(),
        ));
    }

    Ok(parsed)
}

/// Errors produced while building or sending requests.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Base URL violates scheme or shape policy.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Identity settings are blank.
    #[error("invalid client config: {0}")]
    InvalidConfig(String),
    /// Network or I/O failure below HTTP semantics.
    #[error("transport failure: {0}")]
    Transport(String),
    /// Request body could not be encoded.
    #[error("request encoding failure: {0}")]
    Encode(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    //! Unit tests for base URL policy and redacted debug output.

    use super::*;

    #[test]
    fn base_url_policy_rejects_cleartext_and_credentials() {
        validate_base_url(DEFAULT_BASE_URL).expect("default base url should pass");
        assert!(validate_base_url("http://api.example.test").is_err());
        assert!(validate_base_url("https://user:pw@api.example.test").is_err());
        assert!(validate_base_url("not a url").is_err());
    }

    #[test]
    fn config_debug_hides_token() {
        let config = ApiConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            agent_id: "agent".to_string(),
            point_id: "point".to_string(),
            bearer_token: "super-secret".to_string(),
            user_agent: "payout-contract/test".to_string(),
        };

        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
