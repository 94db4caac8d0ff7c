//! In-memory ledger state and the command/apply cycle.
//!
//! Mutations are built in two steps. A `prepare_*` method validates input against the
//! current state and returns the record to commit without touching anything. `apply` then
//! commits the matching `LedgerMutation` in one step. The service persists the mutation
//! between the two.

use chrono::Utc;
use rust_decimal::Decimal;
use splitledger_shared::types::{ExpenseId, SettlementId};

use super::error::LedgerError;
use super::mutation::LedgerMutation;
use super::types::{BalanceSnapshot, Expense, NewExpense, Participant, Settlement, SplitShare};
use super::validation::{LedgerPolicy, normalize_name, validate_expense, validate_settlement};

/// Participants, balances and the immutable expense and settlement logs.
#[derive(Debug, Clone, Default)]
pub struct LedgerState {
    participants: Vec<Participant>,
    expenses: Vec<Expense>,
    settlements: Vec<Settlement>,
}

impl LedgerState {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds state by applying journal records in order.
    ///
    /// # Errors
    ///
    /// Returns an error if a record references a participant that does not exist at that
    /// point in the journal.
    pub fn replay<'a, I>(mutations: I) -> Result<Self, LedgerError>
    where
        I: IntoIterator<Item = &'a LedgerMutation>,
    {
        let mut state = Self::new();
        for mutation in mutations {
            state.apply(mutation)?;
        }
        Ok(state)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.participants.iter().position(|p| p.name == name)
    }

    fn require(&self, name: &str) -> Result<usize, LedgerError> {
        self.position(name)
            .ok_or_else(|| LedgerError::NotFound(name.to_string()))
    }

    /// Computes the balances a posting would leave behind without writing them.
    ///
    /// `credits` and `debits` are `(participant, amount, field)` entries; a participant may
    /// appear more than once. Returns one `(index, new balance)` per touched participant.
    fn stage_balances<'a>(
        &self,
        credits: impl IntoIterator<Item = (&'a str, Decimal, String)>,
        debits: impl IntoIterator<Item = (&'a str, Decimal, String)>,
    ) -> Result<Vec<(usize, Decimal)>, LedgerError> {
        let mut staged: Vec<(usize, Decimal)> = Vec::new();
        let entries = credits
            .into_iter()
            .map(|entry| (entry, true))
            .chain(debits.into_iter().map(|entry| (entry, false)));

        for ((name, amount, field), credit) in entries {
            let idx = self.require(name)?;
            let slot = match staged.iter().position(|(i, _)| *i == idx) {
                Some(slot) => slot,
                None => {
                    staged.push((idx, self.participants[idx].balance));
                    staged.len() - 1
                }
            };
            let current = staged[slot].1;
            let next = if credit {
                current.checked_add(amount)
            } else {
                current.checked_sub(amount)
            };
            staged[slot].1 =
                next.ok_or_else(|| LedgerError::validation(field, "balance would overflow"))?;
        }
        Ok(staged)
    }

    fn stage_expense(&self, expense: &Expense) -> Result<Vec<(usize, Decimal)>, LedgerError> {
        self.stage_balances(
            [(
                expense.paid_by.as_str(),
                expense.total_amount,
                "total_amount".to_string(),
            )],
            expense.splits.iter().enumerate().map(|(i, split)| {
                (
                    split.participant.as_str(),
                    split.amount,
                    format!("splits[{i}].amount"),
                )
            }),
        )
    }

    fn stage_settlement(
        &self,
        settlement: &Settlement,
    ) -> Result<Vec<(usize, Decimal)>, LedgerError> {
        self.stage_balances(
            [(settlement.from.as_str(), settlement.amount, "amount".to_string())],
            [(settlement.to.as_str(), settlement.amount, "amount".to_string())],
        )
    }

    fn commit_balances(&mut self, staged: Vec<(usize, Decimal)>) {
        for (idx, balance) in staged {
            self.participants[idx].balance = balance;
        }
    }

    /// Returns true if a participant with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Looks up a participant by name.
    #[must_use]
    pub fn participant(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name == name)
    }

    /// Insertion-ordered copy of every balance.
    #[must_use]
    pub fn snapshot(&self) -> BalanceSnapshot {
        BalanceSnapshot::new(self.participants.clone())
    }

    /// Recorded expenses in insertion order.
    #[must_use]
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Recorded settlements in insertion order.
    #[must_use]
    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    /// Validates a new participant and returns the normalized name.
    ///
    /// # Errors
    ///
    /// `Validation` for a blank name, `DuplicateParticipant` if the name is taken.
    pub fn prepare_add_participant(&self, name: &str) -> Result<String, LedgerError> {
        let name = normalize_name(name, "name")?;
        if self.contains(&name) {
            return Err(LedgerError::DuplicateParticipant(name));
        }
        Ok(name)
    }

    /// Validates a participant removal under the given policy and returns the participant
    /// as it stands before removal.
    ///
    /// # Errors
    ///
    /// `NotFound` if absent; `NonZeroBalance` if the policy requires a settled balance.
    pub fn prepare_remove_participant(
        &self,
        name: &str,
        policy: LedgerPolicy,
    ) -> Result<Participant, LedgerError> {
        let participant = self
            .participant(name.trim())
            .ok_or_else(|| LedgerError::NotFound(name.trim().to_string()))?;

        if !policy.allow_nonzero_removal && !participant.balance.is_zero() {
            return Err(LedgerError::NonZeroBalance {
                name: participant.name.clone(),
                balance: participant.balance,
            });
        }

        Ok(participant.clone())
    }

    /// Validates an expense and builds its immutable record.
    ///
    /// Participant names are trimmed the same way `prepare_add_participant` trims them.
    ///
    /// # Errors
    ///
    /// `Validation` naming the first offending field, including a balance that would
    /// overflow.
    pub fn prepare_expense(
        &self,
        input: NewExpense,
        policy: LedgerPolicy,
    ) -> Result<Expense, LedgerError> {
        let NewExpense {
            description,
            total_amount,
            paid_by,
            splits,
        } = input;
        let input = NewExpense {
            description: description.trim().to_string(),
            total_amount,
            paid_by: paid_by.trim().to_string(),
            splits: splits
                .into_iter()
                .map(|split| SplitShare::new(split.participant.trim(), split.amount))
                .collect(),
        };

        validate_expense(&input, policy, |name| self.contains(name))?;

        let expense = Expense {
            id: ExpenseId::new(),
            description: input.description,
            total_amount: input.total_amount,
            paid_by: input.paid_by,
            splits: input.splits,
            recorded_at: Utc::now(),
        };
        self.stage_expense(&expense)?;
        Ok(expense)
    }

    /// Validates a settlement and builds its immutable record.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown participants, `Validation` otherwise.
    pub fn prepare_settlement(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<Settlement, LedgerError> {
        let (from, to) = (from.trim(), to.trim());
        validate_settlement(from, to, amount, |name| self.contains(name))?;

        let settlement = Settlement {
            id: SettlementId::new(),
            from: from.to_string(),
            to: to.to_string(),
            amount,
            recorded_at: Utc::now(),
        };
        self.stage_settlement(&settlement)?;
        Ok(settlement)
    }

    /// Commits a mutation.
    ///
    /// Every referenced participant is resolved and every new balance computed before any
    /// balance changes, so on error the state is unchanged.
    ///
    /// # Errors
    ///
    /// `NotFound` / `DuplicateParticipant` if the mutation does not fit the current state,
    /// `Validation` if a balance would overflow.
    pub fn apply(&mut self, mutation: &LedgerMutation) -> Result<(), LedgerError> {
        match mutation {
            LedgerMutation::ParticipantAdded { name } => {
                if self.contains(name) {
                    return Err(LedgerError::DuplicateParticipant(name.clone()));
                }
                self.participants.push(Participant::new(name.clone()));
            }
            LedgerMutation::ParticipantRemoved { name } => {
                let idx = self.require(name)?;
                self.participants.remove(idx);
            }
            LedgerMutation::ExpenseRecorded { expense } => {
                let staged = self.stage_expense(expense)?;
                self.commit_balances(staged);
                self.expenses.push(expense.clone());
            }
            LedgerMutation::SettlementRecorded { settlement } => {
                let staged = self.stage_settlement(settlement)?;
                self.commit_balances(staged);
                self.settlements.push(settlement.clone());
            }
        }
        Ok(())
    }
}
