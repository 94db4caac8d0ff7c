//! In-memory journal.

use splitledger_core::ledger::{LedgerMutation, LedgerStore, StoreError};
use tokio::sync::Mutex;

/// Keeps the journal in a vector. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    journal: Mutex<Vec<LedgerMutation>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything saved so far.
    pub async fn snapshot(&self) -> Vec<LedgerMutation> {
        self.journal.lock().await.clone()
    }
}

impl LedgerStore for MemoryStore {
    async fn load(&self) -> Result<Vec<LedgerMutation>, StoreError> {
        Ok(self.snapshot().await)
    }

    async fn save(&self, mutation: &LedgerMutation) -> Result<(), StoreError> {
        self.journal.lock().await.push(mutation.clone());
        Ok(())
    }
}
