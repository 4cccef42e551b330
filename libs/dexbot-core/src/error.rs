use thiserror::Error;

use crate::{alerts::AlertId, alerts::StoreError, chain::ChainError};

/// Errors surfaced by the scorer and the alert registry.
///
/// Every variant is recoverable: callers render them as user-facing
/// messages rather than aborting.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid token address: `{0}`")]
    InvalidAddress(String),

    #[error("Invalid target price `{0}`: must be a number greater than zero")]
    InvalidPrice(String),

    #[error("Chain data unavailable: {0}")]
    DataUnavailable(String),

    #[error("No pending alert with id {0}")]
    NotFound(AlertId),

    #[error("Alert {0} belongs to another user")]
    Forbidden(AlertId),

    #[error("Alert storage error: {0}")]
    Storage(String),
}

impl From<ChainError> for Error {
    fn from(err: ChainError) -> Self {
        Error::DataUnavailable(err.to_string())
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::Storage(err.to_string())
    }
}
