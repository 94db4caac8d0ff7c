//! Balance ledger.
//!
//! This module implements the single source of truth for participant balances:
//! - Domain types (participants, expenses, settlements, snapshots)
//! - Validation of postings and the two policy flags
//! - Journal records and the command/apply state machine
//! - The persistence port
//! - The concurrent `Ledger` service
//! - Split builders

pub mod error;
pub mod mutation;
pub mod service;
pub mod split;
pub mod state;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod state_props;

pub use error::LedgerError;
pub use mutation::LedgerMutation;
pub use service::Ledger;
pub use split::Splits;
pub use state::LedgerState;
pub use store::{LedgerStore, StoreError};
pub use types::{BalanceSnapshot, Expense, NewExpense, Participant, Settlement, SplitShare};
pub use validation::LedgerPolicy;
