//! Core business logic for Splitledger.
//!
//! This crate contains the balance ledger and the settlement planner with ZERO storage or
//! web dependencies. Persistence is reached through the `LedgerStore` port.
//!
//! # Modules
//!
//! - `ledger` - Participant balances, expense and settlement postings
//! - `settlement` - Greedy transfer planning from a balance snapshot

pub mod ledger;
pub mod settlement;

pub use ledger::{Ledger, LedgerError, LedgerPolicy, LedgerStore};
pub use settlement::{SettlementPlan, SettlementPlanner, Transfer};
