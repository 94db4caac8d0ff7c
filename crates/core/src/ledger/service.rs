//! Concurrent ledger service.
//!
//! All mutations go through one write lock: validate against the locked state, persist the
//! resulting record, then apply it. If persisting fails nothing is applied. Readers take the
//! read lock and copy what they need, so they never see a half-applied posting.

use rust_decimal::Decimal;
use splitledger_shared::types::{PageRequest, PageResponse};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use super::error::LedgerError;
use super::mutation::LedgerMutation;
use super::state::LedgerState;
use super::store::LedgerStore;
use super::types::{BalanceSnapshot, Expense, NewExpense, Participant, Settlement};
use super::validation::LedgerPolicy;
use crate::settlement::{SettlementPlan, SettlementPlanner};

/// Shared, injectable ledger backed by a persistence collaborator.
pub struct Ledger<S: LedgerStore> {
    state: RwLock<LedgerState>,
    store: S,
    policy: LedgerPolicy,
}

impl<S: LedgerStore> Ledger<S> {
    /// Opens a ledger by replaying everything the store has recorded.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the journal cannot be loaded, or the replay error if the journal
    /// is inconsistent.
    pub async fn open(store: S, policy: LedgerPolicy) -> Result<Self, LedgerError> {
        let journal = store.load().await?;
        let state = LedgerState::replay(&journal)?;
        info!(
            records = journal.len(),
            participants = state.snapshot().len(),
            "ledger loaded"
        );
        Ok(Self {
            state: RwLock::new(state),
            store,
            policy,
        })
    }

    /// Persists and applies a mutation while the caller holds the write lock.
    async fn commit(
        &self,
        state: &mut LedgerState,
        mutation: &LedgerMutation,
    ) -> Result<(), LedgerError> {
        if let Err(err) = self.store.save(mutation).await {
            warn!(kind = mutation.kind(), error = %err, "mutation not persisted");
            return Err(err.into());
        }
        state.apply(mutation)
    }

    /// Adds a participant with a zero balance.
    ///
    /// # Errors
    ///
    /// `DuplicateParticipant`, `Validation` for a blank name, or `Storage`.
    #[instrument(skip(self))]
    pub async fn add_participant(&self, name: &str) -> Result<Participant, LedgerError> {
        let mut state = self.state.write().await;
        let name = state
            .prepare_add_participant(name)
            .inspect_err(|err| warn!(error = %err, "participant rejected"))?;

        let mutation = LedgerMutation::ParticipantAdded { name: name.clone() };
        self.commit(&mut state, &mutation).await?;

        info!(participant = %name, "participant added");
        Ok(Participant::new(name))
    }

    /// Removes a participant, subject to the removal policy.
    ///
    /// Returns the participant as it was just before removal.
    ///
    /// # Errors
    ///
    /// `NotFound`, `NonZeroBalance`, or `Storage`.
    #[instrument(skip(self))]
    pub async fn remove_participant(&self, name: &str) -> Result<Participant, LedgerError> {
        let mut state = self.state.write().await;
        let removed = state
            .prepare_remove_participant(name, self.policy)
            .inspect_err(|err| warn!(error = %err, "removal rejected"))?;

        let mutation = LedgerMutation::ParticipantRemoved {
            name: removed.name.clone(),
        };
        self.commit(&mut state, &mutation).await?;

        if removed.balance.is_zero() {
            info!(participant = %removed.name, "participant removed");
        } else {
            warn!(
                participant = %removed.name,
                balance = %removed.balance,
                "participant removed with outstanding balance"
            );
        }
        Ok(removed)
    }

    /// Insertion-ordered snapshot of every balance.
    pub async fn balances(&self) -> BalanceSnapshot {
        self.state.read().await.snapshot()
    }

    /// Every participant with their balance, in insertion order.
    pub async fn list_participants(&self) -> Vec<Participant> {
        self.balances().await.into_participants()
    }

    /// Posts an expense: the payer is credited the total and each split is debited.
    ///
    /// # Errors
    ///
    /// `Validation` naming the offending field, or `Storage`. Nothing changes on error.
    #[instrument(skip(self, input), fields(description = %input.description, total = %input.total_amount))]
    pub async fn record_expense(&self, input: NewExpense) -> Result<Expense, LedgerError> {
        let mut state = self.state.write().await;
        let expense = state
            .prepare_expense(input, self.policy)
            .inspect_err(|err| warn!(error = %err, "expense rejected"))?;

        let mutation = LedgerMutation::ExpenseRecorded {
            expense: expense.clone(),
        };
        self.commit(&mut state, &mutation).await?;

        info!(
            expense_id = %expense.id,
            paid_by = %expense.paid_by,
            amount = %expense.total_amount,
            splits = expense.splits.len(),
            "expense recorded"
        );
        match expense.imbalance() {
            Some(imbalance) if imbalance.is_zero() => {}
            imbalance => warn!(
                expense_id = %expense.id,
                imbalance = ?imbalance,
                "split amounts differ from total"
            ),
        }
        Ok(expense)
    }

    /// Posts a settlement: `from` paid `to`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Validation`, or `Storage`. Nothing changes on error.
    #[instrument(skip(self))]
    pub async fn record_settlement(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<Settlement, LedgerError> {
        let mut state = self.state.write().await;
        let settlement = state
            .prepare_settlement(from, to, amount)
            .inspect_err(|err| warn!(error = %err, "settlement rejected"))?;

        let mutation = LedgerMutation::SettlementRecorded {
            settlement: settlement.clone(),
        };
        self.commit(&mut state, &mutation).await?;

        info!(
            settlement_id = %settlement.id,
            from = %settlement.from,
            to = %settlement.to,
            amount = %settlement.amount,
            "settlement recorded"
        );
        Ok(settlement)
    }

    /// Recorded expenses in insertion order.
    pub async fn list_expenses(&self) -> Vec<Expense> {
        self.state.read().await.expenses().to_vec()
    }

    /// One page of the expense log.
    pub async fn expenses_page(&self, page: PageRequest) -> PageResponse<Expense> {
        page.paginate(self.state.read().await.expenses())
    }

    /// Recorded settlements in insertion order.
    pub async fn list_settlements(&self) -> Vec<Settlement> {
        self.state.read().await.settlements().to_vec()
    }

    /// Plans transfers that would zero every current balance. Does not post anything.
    pub async fn plan_settlement(&self) -> SettlementPlan {
        let snapshot = self.balances().await;
        SettlementPlanner::plan(&snapshot)
    }
}
