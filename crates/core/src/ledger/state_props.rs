//! Property-based tests for `LedgerState`.
//!
//! - Conservation: balances always sum to zero while every split sums to its total
//! - Atomicity: a rejected posting leaves the state exactly as it was
//! - Replay: rebuilding from the journal reproduces the same balances

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::mutation::LedgerMutation;
use super::split::Splits;
use super::state::LedgerState;
use super::types::{NewExpense, SplitShare};
use super::validation::LedgerPolicy;

const NAMES: [&str; 5] = ["ann", "bob", "cat", "dan", "eve"];

/// Strategy to generate positive amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// One expense: payer index, total, and the indexes sharing it.
fn expense_strategy() -> impl Strategy<Value = (usize, Decimal, Vec<usize>)> {
    (
        0..NAMES.len(),
        positive_amount(),
        prop::collection::vec(0..NAMES.len(), 1..=NAMES.len()),
    )
}

fn group() -> (LedgerState, Vec<LedgerMutation>) {
    let mut state = LedgerState::new();
    let mut journal = Vec::new();
    for name in NAMES {
        let mutation = LedgerMutation::ParticipantAdded {
            name: name.to_string(),
        };
        state.apply(&mutation).unwrap();
        journal.push(mutation);
    }
    (state, journal)
}

/// Builds an equal split; any sub-cent share is skipped since it would be rejected.
fn equal_expense(payer: usize, total: Decimal, sharers: &[usize]) -> NewExpense {
    let names: Vec<&str> = sharers.iter().map(|i| NAMES[*i]).collect();
    let splits = Splits::equal(total, names, 2)
        .unwrap()
        .into_iter()
        .filter(|s| !s.amount.is_zero())
        .collect();
    NewExpense::new("shared", total, NAMES[payer], splits)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Posting expenses whose splits sum to the total keeps the ledger balanced.
    #[test]
    fn prop_conservation_with_balanced_splits(
        expenses in prop::collection::vec(expense_strategy(), 1..20),
    ) {
        let (mut state, _) = group();
        for (payer, total, sharers) in &expenses {
            let input = equal_expense(*payer, *total, sharers);
            prop_assume!(input.split_total() == Some(input.total_amount));
            let expense = state.prepare_expense(input, LedgerPolicy::strict()).unwrap();
            state.apply(&LedgerMutation::ExpenseRecorded { expense }).unwrap();
        }
        prop_assert_eq!(state.snapshot().total(), Some(Decimal::ZERO));
    }

    /// Settlements never change the sum of balances.
    #[test]
    fn prop_settlement_preserves_total(
        from in 0..NAMES.len(),
        to in 0..NAMES.len(),
        amount in positive_amount(),
    ) {
        prop_assume!(from != to);
        let (mut state, _) = group();
        let before = state.snapshot().total();
        let settlement = state.prepare_settlement(NAMES[from], NAMES[to], amount).unwrap();
        state.apply(&LedgerMutation::SettlementRecorded { settlement }).unwrap();
        prop_assert_eq!(state.snapshot().total(), before);
    }

    /// An expense naming an unknown participant is rejected with no effect.
    #[test]
    fn prop_unknown_split_participant_is_atomic(
        (payer, total, sharers) in expense_strategy(),
        position in 0usize..NAMES.len(),
    ) {
        let (state, _) = group();
        let before = state.snapshot();

        let mut input = equal_expense(payer, total, &sharers);
        let at = position.min(input.splits.len());
        input.splits.insert(at, SplitShare::new("mallory", Decimal::ONE));

        let result = state.prepare_expense(input, LedgerPolicy::default());
        prop_assert!(result.is_err());
        prop_assert_eq!(state.snapshot(), before);
        prop_assert!(state.expenses().is_empty());
    }

    /// Replaying the journal rebuilds the same balances and logs.
    #[test]
    fn prop_replay_matches_live_state(
        expenses in prop::collection::vec(expense_strategy(), 0..10),
    ) {
        let (mut state, mut journal) = group();
        for (payer, total, sharers) in &expenses {
            let input = equal_expense(*payer, *total, sharers);
            if let Ok(expense) = state.prepare_expense(input, LedgerPolicy::default()) {
                let mutation = LedgerMutation::ExpenseRecorded { expense };
                state.apply(&mutation).unwrap();
                journal.push(mutation);
            }
        }

        let replayed = LedgerState::replay(&journal).unwrap();
        prop_assert_eq!(replayed.snapshot(), state.snapshot());
        prop_assert_eq!(replayed.expenses(), state.expenses());
    }
}
