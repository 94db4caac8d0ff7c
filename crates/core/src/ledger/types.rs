//! Ledger domain types.
//!
//! Participants are identified by name. Balances are signed: positive means the group owes
//! the participant, negative means the participant owes the group.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use splitledger_shared::types::{ExpenseId, SettlementId, format_amount};

/// A participant and their current net balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique, immutable name.
    pub name: String,
    /// Net balance. Positive = creditor, negative = debtor.
    pub balance: Decimal,
}

impl Participant {
    /// Creates a participant with a zero balance.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            balance: Decimal::ZERO,
        }
    }

    /// Returns true if the group owes this participant money.
    #[must_use]
    pub fn is_creditor(&self) -> bool {
        self.balance > Decimal::ZERO
    }

    /// Returns true if this participant owes the group money.
    #[must_use]
    pub fn is_debtor(&self) -> bool {
        self.balance < Decimal::ZERO
    }
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: Balance {}", self.name, format_amount(self.balance))
    }
}

/// One participant's share of an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitShare {
    /// Name of the participant who owes this share.
    pub participant: String,
    /// Amount debited from the participant (must be positive).
    pub amount: Decimal,
}

impl SplitShare {
    /// Creates a split share.
    #[must_use]
    pub fn new(participant: impl Into<String>, amount: Decimal) -> Self {
        Self {
            participant: participant.into(),
            amount,
        }
    }
}

/// Input for recording an expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
    /// Free-text description (required, non-empty).
    pub description: String,
    /// Amount fronted by the payer (must be positive).
    pub total_amount: Decimal,
    /// Name of the participant who paid.
    pub paid_by: String,
    /// Ordered shares debited from participants.
    pub splits: Vec<SplitShare>,
}

impl NewExpense {
    /// Creates expense input.
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        total_amount: Decimal,
        paid_by: impl Into<String>,
        splits: Vec<SplitShare>,
    ) -> Self {
        Self {
            description: description.into(),
            total_amount,
            paid_by: paid_by.into(),
            splits,
        }
    }

    /// Sum of all split amounts, or `None` if it overflows.
    #[must_use]
    pub fn split_total(&self) -> Option<Decimal> {
        checked_sum(self.splits.iter().map(|s| s.amount))
    }
}

/// Sums amounts without panicking; `None` on overflow.
pub(crate) fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
}

/// An immutable, recorded expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID.
    pub id: ExpenseId,
    /// Free-text description.
    pub description: String,
    /// Amount fronted by the payer.
    pub total_amount: Decimal,
    /// Name of the participant who paid.
    pub paid_by: String,
    /// Ordered shares debited from participants.
    pub splits: Vec<SplitShare>,
    /// When the expense was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl Expense {
    /// Sum of all split amounts, or `None` if it overflows.
    #[must_use]
    pub fn split_total(&self) -> Option<Decimal> {
        checked_sum(self.splits.iter().map(|s| s.amount))
    }

    /// Net effect of this expense on the sum of all balances.
    ///
    /// Zero whenever the splits add up to the total; `None` if not representable.
    #[must_use]
    pub fn imbalance(&self) -> Option<Decimal> {
        self.total_amount.checked_sub(self.split_total()?)
    }
}

/// An immutable, recorded settlement: `from` paid `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Settlement ID.
    pub id: SettlementId,
    /// Participant who paid.
    pub from: String,
    /// Participant who received the payment.
    pub to: String,
    /// Amount paid.
    pub amount: Decimal,
    /// When the settlement was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Immutable, insertion-ordered view of every participant's balance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceSnapshot {
    participants: Vec<Participant>,
}

impl BalanceSnapshot {
    /// Creates a snapshot from participants in insertion order.
    #[must_use]
    pub fn new(participants: Vec<Participant>) -> Self {
        Self { participants }
    }

    /// Participants in insertion order.
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Iterates over `(name, balance)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.participants
            .iter()
            .map(|p| (p.name.as_str(), p.balance))
    }

    /// Balance of one participant, if present.
    #[must_use]
    pub fn balance_of(&self, name: &str) -> Option<Decimal> {
        self.participants
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.balance)
    }

    /// Sum of all balances, or `None` if it overflows. Zero while the conservation
    /// invariant holds.
    #[must_use]
    pub fn total(&self) -> Option<Decimal> {
        checked_sum(self.participants.iter().map(|p| p.balance))
    }

    /// Returns true if every balance is exactly zero.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.participants.iter().all(|p| p.balance.is_zero())
    }

    /// Number of participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Returns true if there are no participants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Consumes the snapshot, returning the participants.
    #[must_use]
    pub fn into_participants(self) -> Vec<Participant> {
        self.participants
    }
}

impl<S: Into<String>> FromIterator<(S, Decimal)> for BalanceSnapshot {
    fn from_iter<T: IntoIterator<Item = (S, Decimal)>>(iter: T) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(name, balance)| Participant {
                    name: name.into(),
                    balance,
                })
                .collect(),
        )
    }
}
