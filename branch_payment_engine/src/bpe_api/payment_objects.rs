use crate::types::{TransactionState, VerificationOutcome};

/// What one confirmation attempt achieved for a reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationResult {
    /// The provider's verdict, as seen by this channel.
    pub outcome: VerificationOutcome,
    /// What this attempt did to the reconciliation state.
    pub finalization: FinalizeOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// This call won the compare-and-set and transitioned the reference into the given terminal state. For
    /// `FinalizedSuccess`, fulfillment side effects were triggered by this call and no other.
    Finalized(TransactionState),
    /// Another channel finalized the reference first; this call performed no side effects.
    AlreadyFinalized(TransactionState),
    /// The provider still reports the transaction as pending, so the reference remains unverified.
    Pending,
}

impl FinalizeOutcome {
    /// True iff this confirmation attempt is the one that triggered fulfillment.
    pub fn triggered_fulfillment(&self) -> bool {
        matches!(self, Self::Finalized(TransactionState::FinalizedSuccess))
    }
}
