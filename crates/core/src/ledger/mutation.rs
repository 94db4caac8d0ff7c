//! Journal records for ledger mutations.
//!
//! Each variant is one atomic operation. Replaying the records in order rebuilds the ledger
//! exactly, so the same value is both what the store persists and what the in-memory state
//! applies.

use serde::{Deserialize, Serialize};

use super::types::{Expense, Settlement};

/// One committed, atomic ledger mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerMutation {
    /// A participant joined with a zero balance.
    ParticipantAdded {
        /// Participant name.
        name: String,
    },
    /// A participant left the group.
    ParticipantRemoved {
        /// Participant name.
        name: String,
    },
    /// An expense was posted.
    ExpenseRecorded {
        /// The recorded expense.
        expense: Expense,
    },
    /// A settlement was posted.
    SettlementRecorded {
        /// The recorded settlement.
        settlement: Settlement,
    },
}

impl LedgerMutation {
    /// Short label used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ParticipantAdded { .. } => "participant_added",
            Self::ParticipantRemoved { .. } => "participant_removed",
            Self::ExpenseRecorded { .. } => "expense_recorded",
            Self::SettlementRecorded { .. } => "settlement_recorded",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::SplitShare;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use splitledger_shared::types::ExpenseId;

    #[test]
    fn test_serializes_with_kind_tag() {
        let json = serde_json::to_value(LedgerMutation::ParticipantAdded {
            name: "ann".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "participant_added");
        assert_eq!(json["name"], "ann");
    }

    #[test]
    fn test_amounts_are_written_as_strings() {
        let mutation = LedgerMutation::ExpenseRecorded {
            expense: Expense {
                id: ExpenseId::new(),
                description: "dinner".into(),
                total_amount: dec!(90.10),
                paid_by: "A".into(),
                splits: vec![SplitShare::new("B", dec!(0.1))],
                recorded_at: Utc::now(),
            },
        };
        let json = serde_json::to_value(&mutation).unwrap();
        assert_eq!(json["expense"]["total_amount"], "90.10");
        assert_eq!(json["expense"]["splits"][0]["amount"], "0.1");

        let back: LedgerMutation = serde_json::from_value(json).unwrap();
        assert_eq!(back, mutation);
        assert_eq!(back.kind(), "expense_recorded");
    }
}
