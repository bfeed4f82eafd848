//! # payout-contract-tests
//!
//! Loads the frozen JSON Schemas and fixtures under the workspace
//! `contracts/` directory for cross-checking against the Rust validator.

use std::path::PathBuf;

use jsonschema::JSONSchema;
use serde_json::Value;
use thiserror::Error;

/// Returns the absolute path of a file under `contracts/`.
pub fn contract_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../contracts")
        .join(relative)
}

/// Reads and parses one contract JSON document.
pub fn load_contract(relative: &str) -> Result<Value, FixtureError> {
    let path = contract_path(relative);
    let raw = std::fs::read_to_string(&path).map_err(|source| FixtureError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| FixtureError::Decode {
        path: path.display().to_string(),
        source,
    })
}

/// Compiles one schema under `contracts/`.
pub fn compile_schema(relative: &str) -> Result<JSONSchema, FixtureError> {
    let schema = load_contract(relative)?;
    JSONSchema::compile(&schema).map_err(|error| FixtureError::Schema(error.to_string()))
}

/// Fixture loading failures.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// File could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// Offending path.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// File is not valid JSON.
    #[error("cannot decode {path}: {source}")]
    Decode {
        /// Offending path.
        path: String,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// Schema failed to compile.
    #[error("schema does not compile: {0}")]
    Schema(String),
}
