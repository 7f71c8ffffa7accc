use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::{
    traits::{TransactionStore, TransactionStoreError},
    types::TransactionState,
};

/// In-memory transaction store.
///
/// State is shared across clones, so a single instance created at startup serves every worker in the process.
/// Suitable for a single-process deployment; references are forgotten on restart, which is acceptable because a
/// not-yet-finalized reference simply gets re-verified against the provider on the next confirmation attempt.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransactionStore {
    states: Arc<RwLock<HashMap<String, TransactionState>>>,
}

impl MemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransactionStore for MemoryTransactionStore {
    async fn fetch_state(&self, reference: &str) -> Result<TransactionState, TransactionStoreError> {
        let states = self.states.read().await;
        Ok(states.get(reference).copied().unwrap_or_default())
    }

    async fn try_finalize(&self, reference: &str, target: TransactionState) -> Result<bool, TransactionStoreError> {
        if !target.is_terminal() {
            return Err(TransactionStoreError::NotATerminalState(target));
        }
        // The compare-and-set happens under a single write lock, so only one caller can observe `Unverified` and
        // make the transition.
        let mut states = self.states.write().await;
        let state = states.entry(reference.to_string()).or_default();
        if *state == TransactionState::Unverified {
            *state = target;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod test {
    use futures_util::future::join_all;

    use super::*;

    #[tokio::test]
    async fn unknown_references_are_unverified() {
        let store = MemoryTransactionStore::new();
        assert_eq!(store.fetch_state("never-seen").await.unwrap(), TransactionState::Unverified);
    }

    #[tokio::test]
    async fn only_the_first_finalize_wins() {
        let store = MemoryTransactionStore::new();
        assert!(store.try_finalize("ref_1", TransactionState::FinalizedSuccess).await.unwrap());
        assert!(!store.try_finalize("ref_1", TransactionState::FinalizedSuccess).await.unwrap());
        assert!(!store.try_finalize("ref_1", TransactionState::FinalizedOther).await.unwrap());
        assert_eq!(store.fetch_state("ref_1").await.unwrap(), TransactionState::FinalizedSuccess);
    }

    #[tokio::test]
    async fn finalizing_to_unverified_is_rejected() {
        let store = MemoryTransactionStore::new();
        let result = store.try_finalize("ref_1", TransactionState::Unverified).await;
        assert!(matches!(result, Err(TransactionStoreError::NotATerminalState(_))));
        assert_eq!(store.fetch_state("ref_1").await.unwrap(), TransactionState::Unverified);
    }

    #[tokio::test]
    async fn concurrent_finalizers_produce_exactly_one_winner() {
        let store = MemoryTransactionStore::new();
        let attempts = (0..16).map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.try_finalize("ref_race", TransactionState::FinalizedSuccess).await })
        });
        let results = join_all(attempts).await;
        let winners =
            results.into_iter().filter(|r| matches!(r, Ok(Ok(true)))).count();
        assert_eq!(winners, 1);
        assert_eq!(store.fetch_state("ref_race").await.unwrap(), TransactionState::FinalizedSuccess);
    }

    #[tokio::test]
    async fn references_are_tracked_independently() {
        let store = MemoryTransactionStore::new();
        assert!(store.try_finalize("ref_a", TransactionState::FinalizedOther).await.unwrap());
        assert!(store.try_finalize("ref_b", TransactionState::FinalizedSuccess).await.unwrap());
        assert_eq!(store.fetch_state("ref_a").await.unwrap(), TransactionState::FinalizedOther);
        assert_eq!(store.fetch_state("ref_b").await.unwrap(), TransactionState::FinalizedSuccess);
    }
}
