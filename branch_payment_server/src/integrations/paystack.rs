use branch_payment_engine::{
    traits::{PaymentProvider, PaymentProviderError},
    types::{CheckoutRequest, CheckoutSession, VerificationOutcome, VerifiedStatus},
};
use paystack_tools::{InitializeRequest, PaystackApi, PaystackApiError, PaystackConfig};

/// Header the provider sends its webhook body signature in.
pub const PAYSTACK_SIGNATURE_HEADER: &str = "x-paystack-signature";

/// Engine-facing payment provider backed by [`PaystackApi`].
#[derive(Clone)]
pub struct PaystackProvider {
    api: PaystackApi,
}

impl PaystackProvider {
    pub fn new(config: PaystackConfig) -> Result<Self, PaystackApiError> {
        Ok(Self { api: PaystackApi::new(config)? })
    }
}

impl PaymentProvider for PaystackProvider {
    async fn initialize(&self, request: CheckoutRequest) -> Result<CheckoutSession, PaymentProviderError> {
        let request = InitializeRequest {
            email: request.email,
            amount: request.amount,
            currency: request.currency,
            callback_url: request.callback_url,
        };
        let envelope = self.api.initialize_transaction(&request).await.map_err(provider_error_from)?;
        let raw = serde_json::to_value(&envelope).map_err(|e| PaymentProviderError::InvalidResponse(e.to_string()))?;
        Ok(CheckoutSession { checkout_url: envelope.data.authorization_url, reference: envelope.data.reference, raw })
    }

    async fn verify(&self, reference: &str) -> Result<VerificationOutcome, PaymentProviderError> {
        let envelope = self.api.verify_transaction(reference).await.map_err(provider_error_from)?;
        let raw =
            serde_json::to_value(&envelope.data).map_err(|e| PaymentProviderError::InvalidResponse(e.to_string()))?;
        let status = VerifiedStatus::from_provider(&envelope.data.status);
        Ok(VerificationOutcome { status, message: envelope.message, raw })
    }
}

fn provider_error_from(e: PaystackApiError) -> PaymentProviderError {
    match e {
        PaystackApiError::QueryError { status, message } => PaymentProviderError::Upstream { status, body: message },
        PaystackApiError::Timeout(ms) => PaymentProviderError::Timeout(ms),
        PaystackApiError::JsonError(m) => PaymentProviderError::InvalidResponse(m),
        PaystackApiError::Initialization(m) => PaymentProviderError::Initialization(m),
        PaystackApiError::ResponseError(m) => PaymentProviderError::Unreachable(m),
    }
}
