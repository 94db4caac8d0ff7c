//! Command handlers.
//!
//! Each handler runs one ledger operation and returns the lines to print, so the binary
//! only deals with parsing and output.

use rust_decimal::Decimal;
use splitledger_core::ledger::{Ledger, LedgerError, LedgerStore, NewExpense, Splits};
use splitledger_shared::types::{PageRequest, format_amount_dp, parse_amount};

/// How an expense is divided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitMode {
    /// Explicit `(participant, amount)` shares.
    Exact(Vec<(String, Decimal)>),
    /// Divide the total equally across these participants.
    Equal(Vec<String>),
}

/// Parses a `NAME=AMOUNT` share.
///
/// # Errors
///
/// Returns a message if the separator is missing or the amount is not a number.
pub fn parse_share(input: &str) -> Result<(String, Decimal), String> {
    let (name, amount) = input
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=AMOUNT, got '{input}'"))?;
    let amount = parse_amount(amount).map_err(|e| e.to_string())?;
    Ok((name.to_string(), amount))
}

/// Command handlers bound to one ledger and one display precision.
pub struct Commands<'a, S: LedgerStore> {
    ledger: &'a Ledger<S>,
    decimal_places: u32,
}

impl<'a, S: LedgerStore> Commands<'a, S> {
    /// Binds handlers to a ledger.
    pub fn new(ledger: &'a Ledger<S>, decimal_places: u32) -> Self {
        Self {
            ledger,
            decimal_places,
        }
    }

    fn amount(&self, amount: Decimal) -> String {
        format_amount_dp(amount, self.decimal_places)
    }

    /// `participant add NAME`
    pub async fn add_participant(&self, name: &str) -> Result<Vec<String>, LedgerError> {
        let participant = self.ledger.add_participant(name).await?;
        Ok(vec![format!("Added {}", participant.name)])
    }

    /// `participant remove NAME`
    pub async fn remove_participant(&self, name: &str) -> Result<Vec<String>, LedgerError> {
        let removed = self.ledger.remove_participant(name).await?;
        let mut lines = vec![format!("Removed {}", removed.name)];
        if !removed.balance.is_zero() {
            lines.push(format!(
                "Outstanding balance dropped: {}",
                self.amount(removed.balance)
            ));
        }
        Ok(lines)
    }

    /// `participant list` and `balances`
    pub async fn balances(&self) -> Vec<String> {
        self.ledger
            .balances()
            .await
            .iter()
            .map(|(name, balance)| format!("{name}: Balance {}", self.amount(balance)))
            .collect()
    }

    /// `expense add`
    pub async fn add_expense(
        &self,
        description: &str,
        total: Decimal,
        paid_by: &str,
        split: SplitMode,
    ) -> Result<Vec<String>, LedgerError> {
        let splits = match split {
            SplitMode::Exact(shares) => Splits::exact(shares),
            SplitMode::Equal(names) => Splits::equal(total, names, self.decimal_places)?,
        };
        let expense = self
            .ledger
            .record_expense(NewExpense::new(description, total, paid_by, splits))
            .await?;

        let mut lines = vec![format!(
            "Recorded {} ({}) paid by {}",
            expense.description,
            self.amount(expense.total_amount),
            expense.paid_by
        )];
        lines.extend(expense.splits.iter().map(|share| {
            format!("  {} owes {}", share.participant, self.amount(share.amount))
        }));
        Ok(lines)
    }

    /// `expense list`
    pub async fn list_expenses(&self, page: PageRequest) -> Vec<String> {
        let response = self.ledger.expenses_page(page).await;
        let mut lines: Vec<String> = response
            .data
            .iter()
            .map(|expense| {
                format!(
                    "{}  {}  {} paid by {}",
                    expense.recorded_at.format("%Y-%m-%d %H:%M"),
                    expense.description,
                    self.amount(expense.total_amount),
                    expense.paid_by
                )
            })
            .collect();
        lines.push(format!(
            "page {} of {} ({} expenses)",
            response.meta.page, response.meta.total_pages, response.meta.total
        ));
        lines
    }

    /// `settle FROM TO AMOUNT`
    pub async fn settle(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<Vec<String>, LedgerError> {
        let settlement = self.ledger.record_settlement(from, to, amount).await?;
        Ok(vec![format!(
            "{} paid {} {}",
            settlement.from,
            settlement.to,
            self.amount(settlement.amount)
        )])
    }

    /// `settlements`
    pub async fn list_settlements(&self) -> Vec<String> {
        self.ledger
            .list_settlements()
            .await
            .iter()
            .map(|s| {
                format!(
                    "{}  {} paid {} {}",
                    s.recorded_at.format("%Y-%m-%d %H:%M"),
                    s.from,
                    s.to,
                    self.amount(s.amount)
                )
            })
            .collect()
    }

    /// `plan`
    pub async fn plan(&self) -> Vec<String> {
        let plan = self.ledger.plan_settlement().await;
        if plan.is_empty() {
            return vec!["All settled".to_string()];
        }
        let precision = self.decimal_places as usize;
        plan.iter()
            .map(|transfer| format!("{transfer:.precision$}"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use splitledger_core::ledger::LedgerPolicy;
    use splitledger_db::MemoryStore;

    async fn ledger(names: &[&str]) -> Ledger<MemoryStore> {
        let ledger = Ledger::open(MemoryStore::new(), LedgerPolicy::default())
            .await
            .unwrap();
        for name in names {
            ledger.add_participant(name).await.unwrap();
        }
        ledger
    }

    #[rstest]
    #[case("ann=12.50", ("ann", dec!(12.50)))]
    #[case("a=b=3", ("a=b", dec!(3)))]
    fn test_parse_share(#[case] input: &str, #[case] expected: (&str, Decimal)) {
        let (name, amount) = parse_share(input).unwrap();
        assert_eq!((name.as_str(), amount), expected);
    }

    #[rstest]
    #[case("ann")]
    #[case("ann=lots")]
    fn test_parse_share_rejects(#[case] input: &str) {
        assert!(parse_share(input).is_err());
    }

    #[tokio::test]
    async fn test_equal_expense_then_plan() {
        let ledger = ledger(&["A", "B", "C"]).await;
        let commands = Commands::new(&ledger, 2);

        let lines = commands
            .add_expense(
                "dinner",
                dec!(90),
                "A",
                SplitMode::Equal(vec!["A".into(), "B".into(), "C".into()]),
            )
            .await
            .unwrap();
        assert_eq!(lines[0], "Recorded dinner (90.00) paid by A");

        assert_eq!(
            commands.balances().await,
            vec!["A: Balance 60.00", "B: Balance -30.00", "C: Balance -30.00"]
        );
        assert_eq!(
            commands.plan().await,
            vec!["B owes A 30.00", "C owes A 30.00"]
        );
    }

    #[tokio::test]
    async fn test_plan_uses_configured_precision() {
        let ledger = ledger(&["A", "B"]).await;
        let commands = Commands::new(&ledger, 3);
        commands.settle("B", "A", dec!(1.5)).await.unwrap();

        assert_eq!(commands.plan().await, vec!["A owes B 1.500"]);
        assert_eq!(commands.balances().await[1], "B: Balance 1.500");
    }

    #[tokio::test]
    async fn test_plan_when_settled() {
        let ledger = ledger(&["A"]).await;
        assert_eq!(Commands::new(&ledger, 2).plan().await, vec!["All settled"]);
    }

    #[tokio::test]
    async fn test_errors_surface_ledger_codes() {
        let ledger = ledger(&["A", "B"]).await;
        let commands = Commands::new(&ledger, 2);

        let err = commands.settle("A", "Z", dec!(5)).await.unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");

        let err = commands.add_participant("A").await.unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_PARTICIPANT");
    }
}
