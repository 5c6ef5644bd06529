//! Error types for the name registry

use nameservice_bank::BankError;
use nameservice_storage::StorageError;
use nameservice_types::{Coins, NameOperationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NameserviceError {
    #[error("Unauthorized: {name} is not owned by the sender")]
    Unauthorized { name: String },

    #[error("Name not found: {name}")]
    NameNotFound { name: String },

    #[error("Insufficient bid for {name}: price {price}, bid {bid}")]
    InsufficientBid { name: String, price: Coins, bid: Coins },

    /// Funds movement refused by the account ledger, passed through unchanged.
    #[error(transparent)]
    Bank(#[from] BankError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown request: {0}")]
    UnknownRequest(String),

    #[error("Registry storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<NameOperationError> for NameserviceError {
    fn from(err: NameOperationError) -> Self {
        NameserviceError::Validation(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NameserviceError>;
