//! Persistence port for the ledger.
//!
//! The ledger reads the full journal once at startup and hands every committed mutation to
//! `save` before applying it in memory. Implementations live in the db crate.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use super::mutation::LedgerMutation;

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A mutation could not be encoded or decoded.
    #[error("journal serialization failed: {0}")]
    Serialization(String),

    /// A stored record is unreadable.
    #[error("corrupt journal at line {line}: {message}")]
    Corrupt {
        /// 1-based line number of the bad record.
        line: usize,
        /// Decoder message.
        message: String,
    },

    /// The backing store refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Repository trait for ledger persistence.
///
/// This trait is implemented by the db crate to provide actual storage.
pub trait LedgerStore: Send + Sync {
    /// Load every mutation recorded so far, in commit order.
    fn load(&self) -> impl Future<Output = Result<Vec<LedgerMutation>, StoreError>> + Send;

    /// Durably record one atomic mutation.
    fn save(
        &self,
        mutation: &LedgerMutation,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

impl<S: LedgerStore> LedgerStore for Arc<S> {
    fn load(&self) -> impl Future<Output = Result<Vec<LedgerMutation>, StoreError>> + Send {
        (**self).load()
    }

    fn save(
        &self,
        mutation: &LedgerMutation,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).save(mutation)
    }
}
