//! Ledger persistence for Splitledger.
//!
//! This crate provides the `LedgerStore` implementations:
//! - `JournalStore` - append-only JSON-lines file, one mutation per line
//! - `MemoryStore` - process-local journal for tests and throwaway sessions

pub mod journal;
pub mod memory;

pub use journal::JournalStore;
pub use memory::MemoryStore;
