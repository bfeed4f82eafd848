#![warn(missing_docs)]
//! # payout-contract-validator
//!
//! ## Purpose
//! Checks payout API responses against the expected JSON shape and value
//! formats.
//!
//! ## Responsibilities
//! - Reject responses with a non-200 status or a non-JSON content type.
//! - Parse bodies into typed payment and balance records.
//! - Enforce timestamp, decimal amount, currency, and status constraints.
//!
//! ## Data flow
//! [`HttpResponse`] -> [`validate_envelope`] -> JSON body ->
//! [`validate_payment_record`] / [`validate_payment_list`] /
//! [`validate_balance_record`] -> typed record.
//!
//! Record validation runs in two phases. The schema phase confirms every
//! required field exists with the right JSON kind. Only then does the format
//! phase look at values, so a missing field is always reported as
//! [`ValidationError::Schema`] no matter what else is wrong.
//!
//! ## Ownership and lifetimes
//! Validators borrow the parsed body and return owned records.
//!
//! ## Error model
//! Every violation maps to exactly one [`ValidationError`] variant. Errors are
//! terminal for the check being performed.

use std::sync::LazyLock;

use payout_contract_core::{
    BalanceRecord, HttpResponse, JSON_MEDIA_TYPE, PaymentContext, PaymentRecord,
};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Required top-level keys of a payment record.
pub const PAYMENT_REQUIRED_FIELDS: [&str; 6] = [
    "paymentId",
    "creationDateTime",
    "expirationDatetime",
    "status",
    "recipientDetails",
    "amount",
];

/// Required top-level keys of a balance record.
pub const BALANCE_REQUIRED_FIELDS: [&str; 3] = ["balance", "overdraft", "available"];

static TIMESTAMP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]{3})?Z?$")
        .expect("timestamp pattern should compile")
});

static DECIMAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+(\.[0-9]{1,2})?$").expect("decimal pattern should compile")
});

/// Validation failure taxonomy.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Unexpected status code or content type.
    #[error("protocol violation: {0}")]
    Protocol(String),
    /// Body is not valid JSON.
    #[error("response body is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
    /// Required field is missing or has the wrong JSON kind.
    #[error("schema violation: `{field}` is missing or has the wrong type")]
    Schema {
        /// Dotted path of the offending field.
        field: String,
    },
    /// Field is present but its value is malformed.
    #[error("format violation at `{field}`: {reason}")]
    Format {
        /// Dotted path of the offending field.
        field: String,
        /// Human-readable constraint that failed.
        reason: String,
    },
}

impl ValidationError {
    /// Returns the dotted field path for schema and format errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Schema { field } | Self::Format { field, .. } => Some(field),
            Self::Protocol(_) | Self::Parse(_) => None,
        }
    }

    fn schema(field: String) -> Self {
        Self::Schema { field }
    }

    fn format(field: String, reason: impl Into<String>) -> Self {
        Self::Format {
            field,
            reason: reason.into(),
        }
    }
}

/// Checks status and content type, then parses the body.
///
/// # Errors
/// Returns [`ValidationError::Protocol`] when status is not 200 or the
/// `content-type` header is absent or lacks `application/json`.
/// Returns [`ValidationError::Parse`] when the body is not valid JSON.
pub fn validate_envelope(response: &HttpResponse) -> Result<Value, ValidationError> {
    if response.status != 200 {
        return Err(ValidationError::Protocol(format!(
            "status code is {}",
            response.status
        )));
    }

    let content_type = response.header("content-type").unwrap_or_default();
    if !content_type.contains(JSON_MEDIA_TYPE) {
        return Err(ValidationError::Protocol(format!(
            "content-type `{content_type}` is not {JSON_MEDIA_TYPE}"
        )));
    }

    Ok(serde_json::from_str(&response.body)?)
}

/// Validates one payment record returned after the call `context`.
///
/// # Errors
/// Returns [`ValidationError::Schema`] for missing or mistyped fields and
/// [`ValidationError::Format`] for malformed values or a status outside the
/// set allowed by `context`.
pub fn validate_payment_record(
    body: &Value,
    context: PaymentContext,
) -> Result<PaymentRecord, ValidationError> {
    validate_payment_at(body, context, "")
}

/// Validates a payment listing: a JSON array of payment records.
///
/// # Errors
/// Returns [`ValidationError::Schema`] when the body is not an array. Element
/// errors carry the element index in their field path (`[2].amount.value`).
pub fn validate_payment_list(
    body: &Value,
    context: PaymentContext,
) -> Result<Vec<PaymentRecord>, ValidationError> {
    let items = body
        .as_array()
        .ok_or_else(|| ValidationError::schema("[]".to_string()))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_payment_at(item, context, &format!("[{index}]")))
        .collect()
}

/// Validates a balance record.
///
/// # Errors
/// Returns [`ValidationError::Schema`] for missing sub-objects or fields and
/// [`ValidationError::Format`] when any value is not a positive decimal.
pub fn validate_balance_record(body: &Value) -> Result<BalanceRecord, ValidationError> {
    let root = require_object(body, "")?;
    for key in BALANCE_REQUIRED_FIELDS {
        require_field(root, "", key)?;
    }
    for key in BALANCE_REQUIRED_FIELDS {
        check_money_schema(root, "", key)?;
    }

    let record = BalanceRecord::deserialize(body)?;
    check_positive_decimal(&record.balance.value, "balance.value")?;
    check_positive_decimal(&record.overdraft.value, "overdraft.value")?;
    check_positive_decimal(&record.available.value, "available.value")?;

    Ok(record)
}

/// Fails when the provider echoed a different payment id than requested.
///
/// # Errors
/// Returns [`ValidationError::Format`] on mismatch.
pub fn expect_payment_id(record: &PaymentRecord, expected: &str) -> Result<(), ValidationError> {
    if record.payment_id != expected {
        return Err(ValidationError::format(
            "paymentId".to_string(),
            format!("expected `{expected}`, got `{}`", record.payment_id),
        ));
    }

    Ok(())
}

/// Returns `true` for `YYYY-MM-DDTHH:MM:SS[.mmm][Z]` timestamps.
pub fn is_timestamp(value: &str) -> bool {
    TIMESTAMP_PATTERN.is_match(value)
}

/// Returns `true` for unsigned decimals with at most two fractional digits.
pub fn is_decimal_amount(value: &str) -> bool {
    DECIMAL_PATTERN.is_match(value)
}

/// Returns `true` for well-formed decimal amounts strictly greater than zero.
pub fn is_positive_decimal(value: &str) -> bool {
    is_decimal_amount(value) && has_nonzero_digit(value)
}

fn validate_payment_at(
    body: &Value,
    context: PaymentContext,
    prefix: &str,
) -> Result<PaymentRecord, ValidationError> {
    check_payment_schema(body, prefix)?;
    let record = PaymentRecord::deserialize(body)?;
    check_payment_formats(&record, context, prefix)?;
    Ok(record)
}

// Covers every field `PaymentRecord` deserializes, so decoding cannot fail
// afterwards and missing data is always reported with its path.
fn check_payment_schema(body: &Value, prefix: &str) -> Result<(), ValidationError> {
    let root = require_object(body, prefix)?;
    for key in PAYMENT_REQUIRED_FIELDS {
        require_field(root, prefix, key)?;
    }

    require_string(root, prefix, "paymentId")?;
    require_string(root, prefix, "creationDateTime")?;
    require_string(root, prefix, "expirationDatetime")?;

    let status_path = join(prefix, "status");
    let status = require_object(require_field(root, prefix, "status")?, &status_path)?;
    require_string(status, &status_path, "value")?;
    require_string(status, &status_path, "changedDateTime")?;

    let recipient_path = join(prefix, "recipientDetails");
    let recipient = require_object(
        require_field(root, prefix, "recipientDetails")?,
        &recipient_path,
    )?;
    require_string(recipient, &recipient_path, "providerCode")?;
    let fields_path = join(&recipient_path, "fields");
    let fields = require_object(
        require_field(recipient, &recipient_path, "fields")?,
        &fields_path,
    )?;
    for name in fields.keys() {
        require_string(fields, &fields_path, name)?;
    }

    check_money_schema(root, prefix, "amount")
}

fn check_payment_formats(
    record: &PaymentRecord,
    context: PaymentContext,
    prefix: &str,
) -> Result<(), ValidationError> {
    if record.payment_id.is_empty() {
        return Err(ValidationError::format(
            join(prefix, "paymentId"),
            "must be non-empty",
        ));
    }

    check_timestamp(&record.creation_date_time, join(prefix, "creationDateTime"))?;
    check_timestamp(&record.expiration_datetime, join(prefix, "expirationDatetime"))?;
    check_timestamp(
        &record.status.changed_date_time,
        join(prefix, "status.changedDateTime"),
    )?;

    check_positive_decimal(&record.amount.value, &join(prefix, "amount.value"))?;

    let currency_len = record.amount.currency.chars().count();
    if currency_len != 3 {
        return Err(ValidationError::format(
            join(prefix, "amount.currency"),
            format!("expected 3 characters, got {currency_len}"),
        ));
    }

    if !context.allows(&record.status.value) {
        let expected = context
            .allowed_statuses()
            .map_or_else(|| "a non-empty status".to_string(), |set| set.join(" | "));
        return Err(ValidationError::format(
            join(prefix, "status.value"),
            format!("`{}` is not one of {expected}", record.status.value),
        ));
    }

    Ok(())
}

fn check_timestamp(value: &str, field: String) -> Result<(), ValidationError> {
    if !is_timestamp(value) {
        return Err(ValidationError::format(
            field,
            format!("`{value}` is not a YYYY-MM-DDTHH:MM:SS[.mmm][Z] timestamp"),
        ));
    }

    Ok(())
}

fn check_positive_decimal(value: &str, field: &str) -> Result<(), ValidationError> {
    if !is_decimal_amount(value) {
        return Err(ValidationError::format(
            field.to_string(),
            format!("`{value}` is not an unsigned decimal with at most 2 fractional digits"),
        ));
    }

    if !has_nonzero_digit(value) {
        return Err(ValidationError::format(
            field.to_string(),
            format!("`{value}` must be greater than zero"),
        ));
    }

    Ok(())
}

// Only meaningful for strings that already matched DECIMAL_PATTERN.
fn has_nonzero_digit(value: &str) -> bool {
    value.bytes().any(|byte| matches!(byte, b'1'..=b'9'))
}

fn check_money_schema(
    parent: &Map<String, Value>,
    prefix: &str,
    key: &str,
) -> Result<(), ValidationError> {
    let path = join(prefix, key);
    let object = require_object(require_field(parent, prefix, key)?, &path)?;
    require_string(object, &path, "value")?;
    require_string(object, &path, "currency")?;
    Ok(())
}

fn require_object<'a>(
    value: &'a Value,
    path: &str,
) -> Result<&'a Map<String, Value>, ValidationError> {
    value.as_object().ok_or_else(|| {
        ValidationError::schema(if path.is_empty() {
            "$".to_string()
        } else {
            path.to_string()
        })
    })
}

fn require_field<'a>(
    object: &'a Map<String, Value>,
    prefix: &str,
    key: &str,
) -> Result<&'a Value, ValidationError> {
    object
        .get(key)
        .ok_or_else(|| ValidationError::schema(join(prefix, key)))
}

fn require_string<'a>(
    object: &'a Map<String, Value>,
    prefix: &str,
    key: &str,
) -> Result<&'a str, ValidationError> {
    require_field(object, prefix, key)?
        .as_str()
        .ok_or_else(|| ValidationError::schema(join(prefix, key)))
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}
