//! Property-based tests for `SettlementPlanner`.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::planner::SettlementPlanner;
use crate::ledger::BalanceSnapshot;

/// Strategy to generate signed amounts (-1,000.00 to 1,000.00).
fn signed_amount() -> impl Strategy<Value = Decimal> {
    (-100_000i64..=100_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Builds a snapshot whose balances sum to exactly zero by adding a balancing participant.
fn balanced_snapshot(amounts: &[Decimal]) -> BalanceSnapshot {
    let balancing: Decimal = -amounts.iter().copied().sum::<Decimal>();
    amounts
        .iter()
        .copied()
        .chain(std::iter::once(balancing))
        .enumerate()
        .map(|(i, amount)| (format!("p{i}"), amount))
        .collect()
}

/// Applies every transfer to a copy of the balances.
fn apply_plan(snapshot: &BalanceSnapshot) -> Vec<(String, Decimal)> {
    let mut balances: Vec<(String, Decimal)> = snapshot
        .iter()
        .map(|(name, amount)| (name.to_string(), amount))
        .collect();
    for transfer in &SettlementPlanner::plan(snapshot) {
        for (name, amount) in &mut balances {
            if *name == transfer.from {
                *amount += transfer.amount;
            }
            if *name == transfer.to {
                *amount -= transfer.amount;
            }
        }
    }
    balances
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Executing the plan on a balanced ledger zeroes every balance.
    #[test]
    fn prop_plan_settles_balanced_ledger(amounts in prop::collection::vec(signed_amount(), 0..12)) {
        let snapshot = balanced_snapshot(&amounts);
        for (name, amount) in apply_plan(&snapshot) {
            prop_assert!(amount.is_zero(), "{} left with {}", name, amount);
        }
    }

    /// Every transfer is positive and goes from a debtor to a creditor.
    #[test]
    fn prop_transfers_flow_from_debtors_to_creditors(
        amounts in prop::collection::vec(signed_amount(), 0..12),
    ) {
        let snapshot = balanced_snapshot(&amounts);
        let plan = SettlementPlanner::plan(&snapshot);
        for transfer in &plan {
            prop_assert!(transfer.amount > Decimal::ZERO);
            prop_assert!(snapshot.balance_of(&transfer.from).unwrap() < Decimal::ZERO);
            prop_assert!(snapshot.balance_of(&transfer.to).unwrap() > Decimal::ZERO);
        }
    }

    /// Never more transfers than the number of non-zero positions minus one.
    #[test]
    fn prop_transfer_count_bound(amounts in prop::collection::vec(signed_amount(), 0..12)) {
        let snapshot = balanced_snapshot(&amounts);
        let nonzero = snapshot.iter().filter(|(_, amount)| !amount.is_zero()).count();
        let plan = SettlementPlanner::plan(&snapshot);
        prop_assert!(plan.len() <= nonzero.saturating_sub(1));
    }

    /// Same snapshot, same plan.
    #[test]
    fn prop_plan_is_deterministic(amounts in prop::collection::vec(signed_amount(), 0..12)) {
        let snapshot = balanced_snapshot(&amounts);
        prop_assert_eq!(SettlementPlanner::plan(&snapshot), SettlementPlanner::plan(&snapshot));
    }

    /// A settled ledger needs no transfers.
    #[test]
    fn prop_zero_snapshot_plans_nothing(count in 0usize..10) {
        let snapshot: BalanceSnapshot = (0..count)
            .map(|i| (format!("p{i}"), Decimal::ZERO))
            .collect();
        prop_assert!(SettlementPlanner::plan(&snapshot).is_empty());
    }
}
