use std::fmt::Debug;

use bpg_common::Kobo;
use log::*;

use crate::{
    bpe_api::{
        errors::PaymentFlowError,
        payment_objects::{ConfirmationResult, FinalizeOutcome},
    },
    events::{EventProducers, PaymentConfirmedEvent},
    traits::{PaymentProvider, TransactionStore},
    types::{CheckoutRequest, CheckoutSession, PaymentIntent, TransactionState, VerificationOutcome, VerifiedStatus},
};

/// Path appended to the caller-supplied origin to form the provider's redirect target.
pub const CALLBACK_PATH: &str = "/payment-callback";

/// `PaymentFlowApi` is the primary API for the payment lifecycle: initiating checkout sessions and reconciling
/// the two confirmation channels (provider webhook and client polling) that race to finalize the same reference.
pub struct PaymentFlowApi<P, S> {
    provider: P,
    store: S,
    producers: EventProducers,
}

impl<P, S> Debug for PaymentFlowApi<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentFlowApi")
    }
}

impl<P, S> PaymentFlowApi<P, S> {
    pub fn new(provider: P, store: S, producers: EventProducers) -> Self {
        Self { provider, store, producers }
    }
}

impl<P, S> PaymentFlowApi<P, S>
where
    P: PaymentProvider,
    S: TransactionStore,
{
    /// Validate the caller's payment intent and open a checkout session with the provider.
    ///
    /// The engine keeps no record of the intent or the session. The provider's reference, relayed back to the
    /// caller inside the session, is the only correlation key for the rest of the lifecycle.
    pub async fn initiate_payment(&self, intent: PaymentIntent) -> Result<CheckoutSession, PaymentFlowError> {
        let request = checkout_request_from_intent(intent)?;
        trace!("💳️🧾️ Opening a {} {} checkout session", request.amount, request.currency);
        let session = self.provider.initialize(request).await?;
        debug!("💳️🧾️ Checkout session created with reference [{}]", session.reference);
        Ok(session)
    }

    /// Verify `reference` against the provider and, when warranted, finalize it.
    ///
    /// Both confirmation channels funnel through this method. The transition to a terminal state goes through the
    /// store's compare-and-set, so when the webhook and a client poll race on the same reference only one of them
    /// observes [`FinalizeOutcome::Finalized`] and triggers the fulfillment hook. The loser sees
    /// [`FinalizeOutcome::AlreadyFinalized`] and performs no side effects.
    pub async fn confirm_payment(&self, reference: &str) -> Result<ConfirmationResult, PaymentFlowError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(PaymentFlowError::Validation("Reference is required".to_string()));
        }
        let outcome = self.provider.verify(reference).await?;
        let finalization = match outcome.status {
            VerifiedStatus::Success => {
                if self.store.try_finalize(reference, TransactionState::FinalizedSuccess).await? {
                    info!("💳️✅️ Payment [{reference}] finalized. Triggering fulfillment.");
                    self.call_payment_confirmed_hook(reference, &outcome).await;
                    FinalizeOutcome::Finalized(TransactionState::FinalizedSuccess)
                } else {
                    let state = self.store.fetch_state(reference).await?;
                    debug!("💳️✅️ Payment [{reference}] was already finalized as {state}. Skipping fulfillment.");
                    FinalizeOutcome::AlreadyFinalized(state)
                }
            },
            VerifiedStatus::Pending => {
                trace!("💳️⏳️ Payment [{reference}] is still pending at the provider");
                FinalizeOutcome::Pending
            },
            VerifiedStatus::Failed | VerifiedStatus::Other(_) => {
                if self.store.try_finalize(reference, TransactionState::FinalizedOther).await? {
                    info!("💳️❌️ Payment [{reference}] finalized as unsuccessful ({})", outcome.status);
                    FinalizeOutcome::Finalized(TransactionState::FinalizedOther)
                } else {
                    let state = self.store.fetch_state(reference).await?;
                    FinalizeOutcome::AlreadyFinalized(state)
                }
            },
        };
        Ok(ConfirmationResult { outcome, finalization })
    }

    async fn call_payment_confirmed_hook(&self, reference: &str, outcome: &VerificationOutcome) {
        for emitter in &self.producers.payment_confirmed_producer {
            debug!("💳️📬️ Notifying payment confirmed hook subscribers for [{reference}]");
            let event = PaymentConfirmedEvent::new(reference, outcome.clone());
            emitter.publish_event(event).await;
        }
    }
}

fn checkout_request_from_intent(intent: PaymentIntent) -> Result<CheckoutRequest, PaymentFlowError> {
    let email = required_field(intent.email, "Email is required")?;
    let currency = required_field(intent.currency, "Currency is required")?;
    let callback_origin = required_field(intent.callback_origin, "Callback origin is required")?;
    let amount = intent.amount.ok_or_else(|| PaymentFlowError::Validation("Amount is required".to_string()))?;
    if amount <= 0.0 {
        return Err(PaymentFlowError::Validation("Amount must be greater than zero".to_string()));
    }
    let amount = Kobo::from_major(amount).map_err(|e| PaymentFlowError::Validation(e.to_string()))?;
    // The origin is taken on trust (see PaymentIntent); only the path suffix is under our control.
    let callback_url = format!("{}{CALLBACK_PATH}", callback_origin.trim_end_matches('/'));
    Ok(CheckoutRequest { email, amount, currency, callback_url })
}

fn required_field(value: Option<String>, message: &str) -> Result<String, PaymentFlowError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| PaymentFlowError::Validation(message.to_string()))
}

#[cfg(test)]
mod test {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
        Mutex,
    };

    use serde_json::json;

    use super::*;
    use crate::{
        events::{EventHandlers, EventHooks},
        store::MemoryTransactionStore,
        traits::PaymentProviderError,
    };

    /// Provider stub that always reports the configured status and records every initialize request it sees.
    #[derive(Clone, Default)]
    struct StubProvider {
        status: String,
        initialized: Arc<Mutex<Vec<CheckoutRequest>>>,
    }

    impl StubProvider {
        fn reporting(status: &str) -> Self {
            Self { status: status.to_string(), initialized: Arc::default() }
        }
    }

    impl PaymentProvider for StubProvider {
        async fn initialize(&self, request: CheckoutRequest) -> Result<CheckoutSession, PaymentProviderError> {
            self.initialized.lock().unwrap().push(request);
            Ok(CheckoutSession {
                checkout_url: "https://checkout.example.com/abc".to_string(),
                reference: "ref_stub".to_string(),
                raw: json!({"status": true}),
            })
        }

        async fn verify(&self, reference: &str) -> Result<VerificationOutcome, PaymentProviderError> {
            Ok(VerificationOutcome::new(
                VerifiedStatus::from_provider(&self.status),
                "Verification successful",
                json!({"reference": reference, "status": self.status.clone()}),
            ))
        }
    }

    fn intent() -> PaymentIntent {
        PaymentIntent {
            email: Some("ada@example.com".to_string()),
            amount: Some(10.00),
            currency: Some("NGN".to_string()),
            callback_origin: Some("https://shop.example.com".to_string()),
        }
    }

    fn api_with(provider: StubProvider) -> PaymentFlowApi<StubProvider, MemoryTransactionStore> {
        PaymentFlowApi::new(provider, MemoryTransactionStore::new(), EventProducers::default())
    }

    #[tokio::test]
    async fn major_units_are_converted_once_on_initiate() {
        let provider = StubProvider::reporting("pending");
        let api = api_with(provider.clone());
        api.initiate_payment(intent()).await.unwrap();
        let seen = provider.initialized.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].amount, Kobo::from(1000));
        assert_eq!(seen[0].callback_url, "https://shop.example.com/payment-callback");
    }

    #[tokio::test]
    async fn missing_fields_are_rejected_with_field_specific_messages() {
        let api = api_with(StubProvider::reporting("pending"));
        let cases: [(PaymentIntent, &str); 4] = [
            (PaymentIntent { email: None, ..intent() }, "Email is required"),
            (PaymentIntent { amount: None, ..intent() }, "Amount is required"),
            (PaymentIntent { currency: Some("  ".to_string()), ..intent() }, "Currency is required"),
            (PaymentIntent { callback_origin: None, ..intent() }, "Callback origin is required"),
        ];
        for (bad_intent, expected) in cases {
            match api.initiate_payment(bad_intent).await {
                Err(PaymentFlowError::Validation(msg)) => assert_eq!(msg, expected),
                other => panic!("expected a validation error, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn zero_and_negative_amounts_are_rejected() {
        let provider = StubProvider::reporting("pending");
        let api = api_with(provider.clone());
        for amount in [0.0, -5.0] {
            let result = api.initiate_payment(PaymentIntent { amount: Some(amount), ..intent() }).await;
            match result {
                Err(PaymentFlowError::Validation(msg)) => assert_eq!(msg, "Amount must be greater than zero"),
                other => panic!("expected a validation error, got {other:?}"),
            }
        }
        assert!(provider.initialized.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_references_are_rejected_before_verification() {
        let api = api_with(StubProvider::reporting("success"));
        assert!(matches!(api.confirm_payment("  ").await, Err(PaymentFlowError::Validation(_))));
    }

    #[tokio::test]
    async fn the_second_confirmation_of_a_success_does_not_refinalize() {
        let api = api_with(StubProvider::reporting("success"));
        let first = api.confirm_payment("ref_42").await.unwrap();
        assert_eq!(first.finalization, FinalizeOutcome::Finalized(TransactionState::FinalizedSuccess));
        assert!(first.finalization.triggered_fulfillment());

        let second = api.confirm_payment("ref_42").await.unwrap();
        assert_eq!(second.finalization, FinalizeOutcome::AlreadyFinalized(TransactionState::FinalizedSuccess));
        assert!(!second.finalization.triggered_fulfillment());
        // Both channels still see the same provider verdict.
        assert_eq!(first.outcome.status, second.outcome.status);
    }

    #[tokio::test]
    async fn pending_outcomes_leave_the_reference_open_for_a_later_success() {
        let pending = StubProvider::reporting("pending");
        let store = MemoryTransactionStore::new();
        let api = PaymentFlowApi::new(pending, store.clone(), EventProducers::default());
        let result = api.confirm_payment("ref_wait").await.unwrap();
        assert_eq!(result.finalization, FinalizeOutcome::Pending);
        assert_eq!(store.fetch_state("ref_wait").await.unwrap(), TransactionState::Unverified);

        // The provider later reports success; the same store must still accept the finalize.
        let success = StubProvider::reporting("success");
        let api = PaymentFlowApi::new(success, store.clone(), EventProducers::default());
        let result = api.confirm_payment("ref_wait").await.unwrap();
        assert!(result.finalization.triggered_fulfillment());
    }

    #[tokio::test]
    async fn failed_payments_finalize_without_fulfillment() {
        let api = api_with(StubProvider::reporting("abandoned"));
        let result = api.confirm_payment("ref_dead").await.unwrap();
        assert_eq!(result.finalization, FinalizeOutcome::Finalized(TransactionState::FinalizedOther));
        assert!(!result.finalization.triggered_fulfillment());
    }

    #[tokio::test]
    async fn racing_confirmation_channels_fire_the_fulfillment_hook_exactly_once() {
        let _ = env_logger::try_init();
        let fulfillments = Arc::new(AtomicUsize::new(0));
        let counter = fulfillments.clone();
        let mut hooks = EventHooks::default();
        hooks.on_payment_confirmed(move |_event| {
            let counter = counter.clone();
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        });
        let handlers = EventHandlers::new(8, hooks);
        let producers = handlers.producers();
        let api = Arc::new(PaymentFlowApi::new(
            StubProvider::reporting("success"),
            MemoryTransactionStore::new(),
            producers,
        ));

        // Webhook and client poll arriving in the same instant.
        let webhook = { let api = api.clone(); tokio::spawn(async move { api.confirm_payment("ref_race").await }) };
        let poll = { let api = api.clone(); tokio::spawn(async move { api.confirm_payment("ref_race").await }) };
        let outcomes = [webhook.await.unwrap().unwrap(), poll.await.unwrap().unwrap()];
        let wins = outcomes.iter().filter(|o| o.finalization.triggered_fulfillment()).count();
        assert_eq!(wins, 1);

        // Dropping the API drops the producers, which lets the handler drain and shut down.
        drop(api);
        let handler = handlers.on_payment_confirmed.expect("handler was configured");
        handler.start_handler().await;
        assert_eq!(fulfillments.load(Ordering::SeqCst), 1);
    }
}
