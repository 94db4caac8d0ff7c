//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Balances and postings are plain `rust_decimal::Decimal` values; these helpers cover
//! parsing user input and rendering amounts for display.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Decimal places used when rendering amounts.
pub const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// Error returned when user input is not a decimal amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid amount '{input}'")]
pub struct AmountParseError {
    /// The rejected input.
    pub input: String,
}

/// Parses a decimal amount such as `"12.50"` or `"-3"`.
///
/// Scientific notation is accepted (`"1e2"`). Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns `AmountParseError` if the input is not a decimal number.
pub fn parse_amount(input: &str) -> Result<Decimal, AmountParseError> {
    let trimmed = input.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| AmountParseError {
            input: input.to_string(),
        })
}

/// Formats an amount with the given number of decimal places.
///
/// Uses Banker's Rounding (MidpointNearestEven) for display only; the stored value is never
/// rounded.
#[must_use]
pub fn format_amount_dp(amount: Decimal, decimal_places: u32) -> String {
    let mut rounded =
        amount.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(decimal_places);
    rounded.to_string()
}

/// Formats an amount with two decimal places (`30` -> `"30.00"`).
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format_amount_dp(amount, DISPLAY_DECIMAL_PLACES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case::integer("30", dec!(30))]
    #[case::fraction("12.50", dec!(12.50))]
    #[case::negative("-7.25", dec!(-7.25))]
    #[case::whitespace("  4.1 ", dec!(4.1))]
    #[case::scientific("1e2", dec!(100))]
    fn test_parse_amount(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(input).unwrap(), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::word("ten")]
    #[case::two_points("1.2.3")]
    fn test_parse_amount_rejects_garbage(#[case] input: &str) {
        let err = parse_amount(input).unwrap_err();
        assert_eq!(err.input, input);
    }

    #[test]
    fn test_parse_amount_is_exact() {
        // 0.1 + 0.2 must be exactly 0.3, unlike f64
        let sum = parse_amount("0.1").unwrap() + parse_amount("0.2").unwrap();
        assert_eq!(sum, dec!(0.3));
    }

    #[rstest]
    #[case(dec!(30), "30.00")]
    #[case(dec!(33.333), "33.33")]
    #[case(dec!(-5.5), "-5.50")]
    #[case(dec!(0.125), "0.12")]
    #[case(dec!(0), "0.00")]
    fn test_format_amount(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(format_amount(amount), expected);
    }

    #[test]
    fn test_format_amount_dp() {
        assert_eq!(format_amount_dp(dec!(1.5), 0), "2");
        assert_eq!(format_amount_dp(dec!(1), 4), "1.0000");
    }
}
