//! Failure classes shared by the ledger, store and mail clients.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{service} call failed: {message}")]
    ExternalCall {
        service: &'static str,
        message: String,
    },

    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("verification {0} is already recorded on the ledger")]
    AlreadyRecorded(String),
}

impl VerificationError {
    pub fn external(service: &'static str, err: impl std::fmt::Display) -> Self {
        VerificationError::ExternalCall {
            service,
            message: err.to_string(),
        }
    }
}
