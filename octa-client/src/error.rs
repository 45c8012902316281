//! Error taxonomy for the client layer.

use octa_common::{AccountAddress, PayloadError};
use thiserror::Error;

use crate::account::LoadError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("BCS encoding failed: {0}")]
    Bcs(#[from] bcs::Error),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Key(#[from] LoadError),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("account not found on-chain: {0}")]
    AccountNotFound(AccountAddress),

    #[error("unexpected response shape: {0}")]
    UnexpectedResponse(String),

    #[error("timed out waiting for transaction {hash}")]
    ConfirmationTimeout { hash: String },

    #[error("transaction {hash} failed on-chain: {vm_status}")]
    TransactionFailed { hash: String, vm_status: String },

    #[error("faucet error: {0}")]
    Faucet(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
