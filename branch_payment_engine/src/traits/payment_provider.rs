use thiserror::Error;

use crate::types::{CheckoutRequest, CheckoutSession, VerificationOutcome};

/// Adapter contract for the external payment provider.
#[allow(async_fn_in_trait)]
pub trait PaymentProvider {
    /// Create a provider-hosted checkout session. The returned reference is the correlation key for all later
    /// verification calls and webhook notifications.
    async fn initialize(&self, request: CheckoutRequest) -> Result<CheckoutSession, PaymentProviderError>;

    /// Fetch the current state of the transaction identified by `reference`.
    ///
    /// A pure query with no provider-side effects. Calling it N times for the same reference returns the same
    /// outcome, modulo the transaction's own state transitions on the provider side.
    async fn verify(&self, reference: &str) -> Result<VerificationOutcome, PaymentProviderError>;
}

#[derive(Debug, Clone, Error)]
pub enum PaymentProviderError {
    #[error("The payment provider returned an error. Status {status}. {body}")]
    Upstream { status: u16, body: String },
    #[error("The payment provider is unreachable. {0}")]
    Unreachable(String),
    #[error("The payment provider call timed out after {0}ms")]
    Timeout(u64),
    #[error("Could not interpret the payment provider response. {0}")]
    InvalidResponse(String),
    #[error("Could not initialize the payment provider client. {0}")]
    Initialization(String),
}
