#![warn(missing_docs)]
//! # payout-contract-core
//!
//! ## Purpose
//! Defines the pure data model shared across the `payout-contract` workspace.
//!
//! ## Responsibilities
//! - Represent raw HTTP responses handed over by the transport layer.
//! - Represent payment and balance records returned by the payout API.
//! - Describe the call context that fixes acceptable payment statuses.
//! - Encode the create-payment request body.
//!
//! ## Data flow
//! Transport emits [`HttpResponse`] -> validator parses it into
//! [`PaymentRecord`] or [`BalanceRecord`] -> suite reports the outcome.
//!
//! ## Ownership and lifetimes
//! Records own their strings so they can outlive the response buffer they were
//! parsed from. They are never mutated after construction.
//!
//! ## Error model
//! Request construction and codec failures return [`CoreError`].
//!
//! ## Security and privacy notes
//! This crate never sees bearer tokens; they live in the client crate only.
//!
//! ## Example
//! ```rust
//! use payout_contract_core::{HttpResponse, PaymentContext};
//!
//! let response = HttpResponse::new(200, "{}").with_header("Content-Type", "application/json");
//! assert_eq!(response.header("content-type"), Some("application/json"));
//! assert!(PaymentContext::Created.allows("CREATED"));
//! assert!(!PaymentContext::Created.allows("IN_PROGRESS"));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Media type every payout API response must declare.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Status reported right after a payment has been created.
pub const STATUS_CREATED: &str = "CREATED";
/// Status reported while an executed payment is being processed.
pub const STATUS_IN_PROGRESS: &str = "IN_PROGRESS";
/// Status reported once an executed payment has settled.
pub const STATUS_COMPLETED: &str = "COMPLETED";

/// Raw HTTP response as received from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Numeric status code.
    pub status: u16,
    /// Header name/value pairs in wire order.
    pub headers: Vec<(String, String)>,
    /// Body decoded as UTF-8 text.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response without headers.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Appends one header and returns the response.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns the first header value whose name matches case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Monetary amount as the provider sends it: decimal text plus currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Unsigned decimal string, for example `"1.00"`.
    pub value: String,
    /// Currency code, for example `"RUB"`.
    pub currency: String,
}

impl Money {
    /// Creates an amount from decimal text and a currency code.
    pub fn new(value: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            currency: currency.into(),
        }
    }
}

/// Lifecycle status of one payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    /// Status code such as `CREATED` or `COMPLETED`.
    pub value: String,
    /// Timestamp of the last status change.
    pub changed_date_time: String,
}

/// Payout destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientDetails {
    /// Provider code, for example `qiwi-wallet`.
    pub provider_code: String,
    /// Provider-specific recipient fields (phone, account, ...).
    pub fields: BTreeMap<String, String>,
}

/// One payment as returned by create, execute, and list calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// Identifier chosen by the caller when the payment was created.
    pub payment_id: String,
    /// Creation timestamp.
    pub creation_date_time: String,
    /// Expiration timestamp. The provider spells this key with a lower-case `t`.
    #[serde(rename = "expirationDatetime")]
    pub expiration_datetime: String,
    /// Current status.
    pub status: PaymentStatus,
    /// Destination of the payout.
    pub recipient_details: RecipientDetails,
    /// Transfer amount.
    pub amount: Money,
}

/// Account balance snapshot for one agent point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    /// Booked balance.
    pub balance: Money,
    /// Overdraft limit.
    pub overdraft: Money,
    /// Amount available for new payouts.
    pub available: Money,
}

/// Call after which a payment record was returned.
///
/// The context fixes which `status.value` strings are acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentContext {
    /// Response to `PUT .../payments/{id}`.
    Created,
    /// Response to `POST .../payments/{id}/execute`.
    Executed,
    /// Element of the `GET .../payments` listing; any non-empty status.
    Listed,
}

impl PaymentContext {
    /// Returns the accepted status set, or `None` when any status is accepted.
    pub fn allowed_statuses(self) -> Option<&'static [&'static str]> {
        match self {
            Self::Created => Some(&[STATUS_CREATED]),
            Self::Executed => Some(&[STATUS_IN_PROGRESS, STATUS_COMPLETED]),
            Self::Listed => None,
        }
    }

    /// Returns `true` when `status` is acceptable in this context.
    pub fn allows(self, status: &str) -> bool {
        if status.trim().is_empty() {
            return false;
        }

        match self.allowed_statuses() {
            Some(allowed) => allowed.contains(&status),
            None => true,
        }
    }
}

/// Body of the create-payment call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    /// Payout destination.
    pub recipient_details: RecipientDetails,
    /// Amount to transfer.
    pub amount: Money,
}

impl CreatePaymentRequest {
    /// Builds a validated create-payment body.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidRequest`] when the provider code, any
    /// recipient field, or the amount is blank.
    pub fn new(
        provider_code: impl Into<String>,
        fields: BTreeMap<String, String>,
        amount: Money,
    ) -> Result<Self, CoreError> {
        let provider_code = provider_code.into();
        if provider_code.trim().is_empty() {
            return Err(CoreError::InvalidRequest(
                "provider code is empty".to_string(),
            ));
        }

        if let Some((name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(CoreError::InvalidRequest(format!(
                "recipient field `{name}` is empty"
            )));
        }

        if amount.value.trim().is_empty() || amount.currency.trim().is_empty() {
            return Err(CoreError::InvalidRequest(
                "amount value and currency must be non-empty".to_string(),
            ));
        }

        Ok(Self {
            recipient_details: RecipientDetails {
                provider_code,
                fields,
            },
            amount,
        })
    }

    /// Serializes the body to compact JSON bytes.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when JSON serialization fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec(self).map_err(CoreError::Codec)
    }
}

/// Error type for request construction and codec failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Request parameters are blank or malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// JSON encoding failure.
    #[error("payload codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}
