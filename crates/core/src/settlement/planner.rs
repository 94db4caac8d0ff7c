//! Greedy settlement planning.
//!
//! Creditors and debtors are queued in snapshot order (never sorted by amount). The front
//! debtor pays the front creditor the smaller of their two outstanding amounts, and whoever
//! reaches exactly zero leaves their queue. This is not a minimum-transfer matching: with
//! mismatched amounts it can emit more transfers than strictly necessary.

use std::collections::VecDeque;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use splitledger_shared::types::{DISPLAY_DECIMAL_PLACES, format_amount_dp};
use tracing::debug;

use crate::ledger::BalanceSnapshot;

/// A suggested payment from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Participant who should pay.
    pub from: String,
    /// Participant who should receive.
    pub to: String,
    /// Amount to pay.
    pub amount: Decimal,
}

impl Transfer {
    /// Creates a transfer.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: Decimal) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

/// Renders `B owes A 30.00`; a precision (`{:.3}`) overrides the two default decimal places.
impl std::fmt::Display for Transfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let decimal_places = f
            .precision()
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or(DISPLAY_DECIMAL_PLACES);
        write!(
            f,
            "{} owes {} {}",
            self.from,
            self.to,
            format_amount_dp(self.amount, decimal_places)
        )
    }
}

/// Ordered, advisory list of transfers. Applying it does not happen automatically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettlementPlan {
    transfers: Vec<Transfer>,
}

impl SettlementPlan {
    /// Transfers in emission order.
    #[must_use]
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Number of transfers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    /// Returns true if nothing needs to be paid.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Sum of all transfer amounts.
    #[must_use]
    pub fn total_amount(&self) -> Decimal {
        self.transfers.iter().map(|t| t.amount).sum()
    }

    /// Iterates over the transfers.
    pub fn iter(&self) -> std::slice::Iter<'_, Transfer> {
        self.transfers.iter()
    }
}

impl IntoIterator for SettlementPlan {
    type Item = Transfer;
    type IntoIter = std::vec::IntoIter<Transfer>;

    fn into_iter(self) -> Self::IntoIter {
        self.transfers.into_iter()
    }
}

impl<'a> IntoIterator for &'a SettlementPlan {
    type Item = &'a Transfer;
    type IntoIter = std::slice::Iter<'a, Transfer>;

    fn into_iter(self) -> Self::IntoIter {
        self.transfers.iter()
    }
}

/// Outstanding amount for one side of the matching.
struct Position<'a> {
    name: &'a str,
    amount: Decimal,
}

/// Stateless settlement planner.
pub struct SettlementPlanner;

impl SettlementPlanner {
    /// Computes the transfer list for a balance snapshot.
    ///
    /// Deterministic: the same snapshot in the same order always yields the same plan.
    #[must_use]
    pub fn plan(balances: &BalanceSnapshot) -> SettlementPlan {
        let mut creditors: VecDeque<Position<'_>> = VecDeque::new();
        let mut debtors: VecDeque<Position<'_>> = VecDeque::new();

        for participant in balances.participants() {
            let position = Position {
                name: &participant.name,
                amount: participant.balance.abs(),
            };
            if participant.is_creditor() {
                creditors.push_back(position);
            } else if participant.is_debtor() {
                debtors.push_back(position);
            }
        }

        let mut transfers = Vec::new();
        while !debtors.is_empty() && !creditors.is_empty() {
            let debtor = &mut debtors[0];
            let creditor = &mut creditors[0];
            let amount = debtor.amount.min(creditor.amount);
            transfers.push(Transfer::new(debtor.name, creditor.name, amount));

            debtor.amount -= amount;
            creditor.amount -= amount;

            let debtor_done = debtor.amount.is_zero();
            let creditor_done = creditor.amount.is_zero();
            if debtor_done {
                debtors.pop_front();
            }
            if creditor_done {
                creditors.pop_front();
            }
        }

        debug!(
            transfers = transfers.len(),
            unmatched_debtors = debtors.len(),
            unmatched_creditors = creditors.len(),
            "settlement plan computed"
        );

        SettlementPlan { transfers }
    }
}
