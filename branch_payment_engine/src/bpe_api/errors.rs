use thiserror::Error;

use crate::traits::{PaymentProviderError, TransactionStoreError};

#[derive(Debug, Clone, Error)]
pub enum PaymentFlowError {
    /// Caller input was missing or malformed. The message is surfaced verbatim to the caller.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Provider(#[from] PaymentProviderError),
    #[error("{0}")]
    Store(#[from] TransactionStoreError),
}
