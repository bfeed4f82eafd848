#![warn(missing_docs)]
//! # payout-contract-app
//!
//! ## Purpose
//! Runs the payout API contract checks end to end: request, envelope check,
//! record validation, and reporting.
//!
//! ## Responsibilities
//! - Load suite configuration from the environment.
//! - Run the listing, balance, create, and execute checks independently.
//! - Produce a per-check pass/fail report with log-safe diagnostics.
//!
//! ## Data flow
//! [`SuiteConfig`] -> [`PayoutClient`] request -> `validate_envelope` ->
//! record validator for the check's [`PaymentContext`] -> [`CheckOutcome`] ->
//! [`SuiteReport`].
//!
//! ## Ownership and lifetimes
//! The suite borrows client and config for the duration of a run. Outcomes own
//! their diagnostic strings.
//!
//! ## Error model
//! Subsystem failures are wrapped in [`AppError`]. Inside a run every error is
//! folded into a failed [`CheckOutcome`]; one failed check never stops the
//! next.
//!
//! ## Security and privacy notes
//! - Diagnostics pass through [`redact_sensitive`] before logging or display.
//! - The bearer token is only read from the environment, never from argv.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use payout_contract_client::{
    ApiConfig, ClientError, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS, PayoutClient, ReqwestTransport,
};
use payout_contract_core::{CoreError, CreatePaymentRequest, Money, PaymentContext};
use payout_contract_validator::{
    ValidationError, expect_payment_id, validate_balance_record, validate_envelope,
    validate_payment_list, validate_payment_record,
};
use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing::{info, warn};

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("PAYOUT_CONTRACT_VERSION");

const REDACTED: &str = "<redacted>";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Returns the `User-Agent` sent with every request.
pub fn user_agent() -> String {
    format!("payout-contract/{APP_VERSION}")
}

/// Everything one suite run needs.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Endpoint and identity settings.
    pub api: ApiConfig,
    /// Identifier used for the create and execute calls.
    pub payout_id: String,
    /// Body sent with the create call.
    pub create_request: CreatePaymentRequest,
    /// Transport timeout.
    pub timeout: Duration,
}

impl SuiteConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] when a required variable is missing or a
    /// numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| {
            read(key).ok_or_else(|| AppError::Config(format!("{key} must be set")))
        };

        let timeout_ms = match read("PAYOUT_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|error| {
                AppError::Config(format!("PAYOUT_TIMEOUT_MS is not a number: {error}"))
            })?,
            None => DEFAULT_TIMEOUT_MS,
        };

        let phone = read("PAYOUT_RECIPIENT_PHONE").unwrap_or_else(|| "79123456789".to_string());
        let create_request = CreatePaymentRequest::new(
            read("PAYOUT_PROVIDER_CODE").unwrap_or_else(|| "qiwi-wallet".to_string()),
            BTreeMap::from([("phone".to_string(), phone)]),
            Money::new(
                read("PAYOUT_AMOUNT").unwrap_or_else(|| "1.00".to_string()),
                read("PAYOUT_CURRENCY").unwrap_or_else(|| "RUB".to_string()),
            ),
        )?;

        Ok(Self {
            api: ApiConfig {
                base_url: read("PAYOUT_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                agent_id: required("PAYOUT_AGENT_ID")?,
                point_id: required("PAYOUT_POINT_ID")?,
                bearer_token: required("PAYOUT_BEARER_TOKEN")?,
                user_agent: user_agent(),
            },
            payout_id: read("PAYOUT_ID").unwrap_or_else(generated_payout_id),
            create_request,
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}

fn generated_payout_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    format!("payout-{millis}")
}

/// Builds a client backed by the blocking `reqwest` transport.
///
/// # Errors
/// Returns [`AppError::Client`] when the transport or client config is invalid.
pub fn build_client(config: &SuiteConfig) -> Result<PayoutClient, AppError> {
    let transport = ReqwestTransport::new(config.timeout)?;
    Ok(PayoutClient::new(config.api.clone(), Arc::new(transport))?)
}

/// One contract check against the payout API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Check {
    /// `GET .../payments`, every element validated.
    ListPayments,
    /// `GET .../balance`.
    RequestBalance,
    /// `PUT .../payments/{id}`, status must be `CREATED`.
    CreatePayment,
    /// `POST .../payments/{id}/execute`, status `IN_PROGRESS` or `COMPLETED`.
    ExecutePayment,
}

impl Check {
    /// All checks in run order.
    pub const ALL: [Check; 4] = [
        Check::ListPayments,
        Check::RequestBalance,
        Check::CreatePayment,
        Check::ExecutePayment,
    ];

    /// Stable name used on the command line and in reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::ListPayments => "list-payments",
            Self::RequestBalance => "request-balance",
            Self::CreatePayment => "create-payment",
            Self::ExecutePayment => "execute-payment",
        }
    }
}

/// Command-line arguments of the `payout-contract` binary.
///
/// Connection settings and the bearer token come from the environment (see
/// [`SuiteConfig::from_env`]), never from argv.
#[derive(Debug, Parser)]
#[command(
    name = "payout-contract",
    version = APP_VERSION,
    about = "Checks payout API responses against the expected contract"
)]
pub struct Cli {
    /// Checks to run, in the given order. Runs every check when omitted.
    #[arg(value_enum, value_name = "CHECK")]
    pub checks: Vec<Check>,
}

impl Cli {
    /// Returns the requested checks, or [`Check::ALL`] when none were named.
    pub fn selected_checks(&self) -> Vec<Check> {
        if self.checks.is_empty() {
            Check::ALL.to_vec()
        } else {
            self.checks.clone()
        }
    }
}

/// Result of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Check that ran.
    pub check: Check,
    /// Whether every assertion held.
    pub passed: bool,
    /// Summary on success, redacted error text on failure.
    pub diagnostic: String,
}

/// Outcomes of one suite run, in run order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    /// Per-check outcomes.
    pub outcomes: Vec<CheckOutcome>,
}

impl SuiteReport {
    /// Returns `true` when every check passed.
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.passed)
    }

    /// Number of failed checks.
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| !outcome.passed).count()
    }
}

/// Runs `checks` in order and collects their outcomes.
pub fn run_suite(client: &PayoutClient, config: &SuiteConfig, checks: &[Check]) -> SuiteReport {
    SuiteReport {
        outcomes: checks
            .iter()
            .map(|check| run_check(client, config, *check))
            .collect(),
    }
}

/// Runs one check and folds any error into a failed outcome.
pub fn run_check(client: &PayoutClient, config: &SuiteConfig, check: Check) -> CheckOutcome {
    match execute_check(client, config, check) {
        Ok(summary) => {
            info!(check = check.name(), %summary, "check passed");
            CheckOutcome {
                check,
                passed: true,
                diagnostic: summary,
            }
        }
        Err(error) => {
            let diagnostic = redact_sensitive(&error.to_string());
            warn!(check = check.name(), %diagnostic, "check failed");
            CheckOutcome {
                check,
                passed: false,
                diagnostic,
            }
        }
    }
}

fn execute_check(
    client: &PayoutClient,
    config: &SuiteConfig,
    check: Check,
) -> Result<String, AppError> {
    match check {
        Check::ListPayments => {
            let body = validate_envelope(&client.list_payments()?)?;
            let records = validate_payment_list(&body, PaymentContext::Listed)?;
            Ok(format!("{} payments validated", records.len()))
        }
        Check::RequestBalance => {
            let body = validate_envelope(&client.balance()?)?;
            let record = validate_balance_record(&body)?;
            Ok(format!(
                "available {} {}",
                record.available.value, record.available.currency
            ))
        }
        Check::CreatePayment => {
            let response = client.create_payment(&config.payout_id, &config.create_request)?;
            let body = validate_envelope(&response)?;
            let record = validate_payment_record(&body, PaymentContext::Created)?;
            expect_payment_id(&record, &config.payout_id)?;
            Ok(format!("payment {} is {}", record.payment_id, record.status.value))
        }
        Check::ExecutePayment => {
            let body = validate_envelope(&client.execute_payment(&config.payout_id)?)?;
            let record = validate_payment_record(&body, PaymentContext::Executed)?;
            expect_payment_id(&record, &config.payout_id)?;
            Ok(format!("payment {} is {}", record.payment_id, record.status.value))
        }
    }
}

/// Replaces bearer tokens and authorization/token values with a marker.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for marker in ["bearer ", "authorization=", "authorization: ", "token="] {
        redacted = redact_after_marker(&redacted, marker);
    }
    redacted
}

// ASCII lowercasing keeps byte offsets aligned with `input`.
fn redact_after_marker(input: &str, marker: &str) -> String {
    let lower = input.to_ascii_lowercase();
    let mut output = String::with_capacity(input.len());
    let mut cursor = 0;

    while let Some(offset) = lower[cursor..].find(marker) {
        let value_start = cursor + offset + marker.len();
        let value_end = input[value_start..]
            .find(|c: char| c.is_whitespace() || c == '"' || c == ',' || c == '`')
            .map_or(input.len(), |end| value_start + end);

        output.push_str(&input[cursor..value_start]);
        output.push_str(REDACTED);
        cursor = value_end;
    }

    output.push_str(&input[cursor..]);
    output
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed configuration.
    #[error("config error: {0}")]
    Config(String),
    /// Request building or transport error.
    #[error("client error: {0}")]
    Client(#[from] ClientError),
    /// Response failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    /// Create-payment body could not be built.
    #[error("request error: {0}")]
    Core(#[from] CoreError),
}
