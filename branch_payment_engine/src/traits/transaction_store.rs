use thiserror::Error;

use crate::types::TransactionState;

/// Storage capability for per-reference reconciliation state.
///
/// The store is the arbiter between the two confirmation channels: whichever channel's
/// [`try_finalize`](TransactionStore::try_finalize) lands first owns the side effects of finalization. An
/// in-memory implementation ships with the engine; a multi-process deployment can substitute an external store
/// without touching the flow logic.
#[allow(async_fn_in_trait)]
pub trait TransactionStore {
    /// The current state for `reference`. References never seen before are `Unverified`.
    async fn fetch_state(&self, reference: &str) -> Result<TransactionState, TransactionStoreError>;

    /// Atomically transition `reference` from `Unverified` to `target`.
    ///
    /// Returns `true` iff this call performed the transition. Exactly one caller can ever receive `true` for a
    /// given reference; everyone else finds the state already terminal and receives `false`.
    async fn try_finalize(&self, reference: &str, target: TransactionState) -> Result<bool, TransactionStoreError>;
}

#[derive(Debug, Clone, Error)]
pub enum TransactionStoreError {
    #[error("Backend storage error: {0}")]
    StorageError(String),
    #[error("{0} is not a terminal state")]
    NotATerminalState(TransactionState),
}
