//! Split builders for expense postings.
//!
//! Equal splits use the Largest Remainder Method:
//! 1. Work at the target precision, or the total's own scale if that is finer
//! 2. Give every participant the total divided by N, rounded toward zero
//! 3. Hand the leftover smallest units to the first participants in order
//!
//! so the shares always add up to exactly the total and no cents are lost.

use rust_decimal::prelude::*;

use super::error::LedgerError;
use super::types::SplitShare;

/// Builders for the `splits` of an expense.
pub struct Splits;

impl Splits {
    /// Splits `total` equally across `participants`, in order.
    ///
    /// Shares use `decimal_places`, widened to the scale of `total` when it carries more
    /// digits (10.005 over two people is 5.003 + 5.002).
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use splitledger_core::ledger::Splits;
    ///
    /// // 100 / 3 = [33.34, 33.33, 33.33]
    /// let shares = Splits::equal(dec!(100), ["A", "B", "C"], 2).unwrap();
    /// assert_eq!(shares[0].amount, dec!(33.34));
    /// assert_eq!(shares.iter().map(|s| s.amount).sum::<rust_decimal::Decimal>(), dec!(100));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a validation error on `splits` if no participants are given.
    pub fn equal<I, S>(
        total: Decimal,
        participants: I,
        decimal_places: u32,
    ) -> Result<Vec<SplitShare>, LedgerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = participants.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(LedgerError::validation(
                "splits",
                "an equal split needs at least one participant",
            ));
        }

        let amounts = allocate_equal(total, names.len(), decimal_places);
        Ok(names
            .into_iter()
            .zip(amounts)
            .map(|(name, amount)| SplitShare::new(name, amount))
            .collect())
    }

    /// Builds an explicit ("unequal") split from `(participant, amount)` pairs.
    pub fn exact<I, S>(shares: I) -> Vec<SplitShare>
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: Into<String>,
    {
        shares
            .into_iter()
            .map(|(name, amount)| SplitShare::new(name, amount))
            .collect()
    }
}

/// Finest scale a `Decimal` can represent.
const MAX_SCALE: u32 = 28;

/// Allocates `total` across `count` recipients so the parts sum exactly to the total.
fn allocate_equal(total: Decimal, count: usize, decimal_places: u32) -> Vec<Decimal> {
    let decimal_places = decimal_places.max(total.scale()).min(MAX_SCALE);
    let total_rounded =
        total.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven);
    if count == 1 {
        return vec![total_rounded];
    }

    let count_dec = Decimal::from(count as u64);
    let unit = Decimal::new(1, decimal_places);

    let base = (total_rounded / count_dec)
        .round_dp_with_strategy(decimal_places, RoundingStrategy::ToZero);
    let remainder = total_rounded - base * count_dec;

    let extra_count = (remainder / unit)
        .round_dp_with_strategy(0, RoundingStrategy::ToZero)
        .to_usize()
        .unwrap_or(0);

    (0..count)
        .map(|i| if i < extra_count { base + unit } else { base })
        .collect()
}
