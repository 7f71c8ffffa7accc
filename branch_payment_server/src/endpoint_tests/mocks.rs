use branch_payment_engine::{
    traits::{
        Geocoder,
        GeocoderError,
        PaymentProvider,
        PaymentProviderError,
        TransactionStore,
        TransactionStoreError,
    },
    types::{CheckoutRequest, CheckoutSession, Coordinates, TransactionState, VerificationOutcome},
};
use mockall::mock;

mock! {
    pub Geocoder {}
    impl Geocoder for Geocoder {
        async fn geocode(&self, address: &str) -> Result<Coordinates, GeocoderError>;
    }
}

mock! {
    pub PaymentProvider {}
    impl PaymentProvider for PaymentProvider {
        async fn initialize(&self, request: CheckoutRequest) -> Result<CheckoutSession, PaymentProviderError>;
        async fn verify(&self, reference: &str) -> Result<VerificationOutcome, PaymentProviderError>;
    }
}

mock! {
    pub TransactionStore {}
    impl TransactionStore for TransactionStore {
        async fn fetch_state(&self, reference: &str) -> Result<TransactionState, TransactionStoreError>;
        async fn try_finalize(&self, reference: &str, target: TransactionState) -> Result<bool, TransactionStoreError>;
    }
}
