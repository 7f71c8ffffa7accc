use serde::{Deserialize, Serialize};

use crate::types::VerificationOutcome;

/// Emitted when the reconciliation guard transitions a reference into `FinalizedSuccess`.
///
/// Exactly one of the confirmation channels wins that transition, so subscribers observe one event per fulfilled
/// payment. This is where order fulfillment, receipting, and similar success side effects should hang.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentConfirmedEvent {
    pub reference: String,
    pub outcome: VerificationOutcome,
}

impl PaymentConfirmedEvent {
    pub fn new(reference: &str, outcome: VerificationOutcome) -> Self {
        Self { reference: reference.to_string(), outcome }
    }
}
