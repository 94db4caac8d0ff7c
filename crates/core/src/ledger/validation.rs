//! Business rule validation for ledger postings.
//!
//! Validation runs against a read-only view of the current participants and never mutates
//! anything, so a rejected posting leaves the ledger untouched.

use rust_decimal::Decimal;
use splitledger_shared::LedgerConfig;

use super::error::LedgerError;
use super::types::NewExpense;

/// Policy flags for the two behaviours the group may choose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerPolicy {
    /// Reject expenses whose splits do not sum to the total.
    ///
    /// Off by default: the payer absorbs or gains the difference.
    pub enforce_split_total: bool,
    /// Allow removing a participant whose balance is not zero.
    ///
    /// Off by default: removal requires an exactly-zero balance.
    pub allow_nonzero_removal: bool,
}

impl LedgerPolicy {
    /// Policy that enforces split totals and zero-balance removal.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            enforce_split_total: true,
            allow_nonzero_removal: false,
        }
    }
}

impl From<&LedgerConfig> for LedgerPolicy {
    fn from(config: &LedgerConfig) -> Self {
        Self {
            enforce_split_total: config.enforce_split_total,
            allow_nonzero_removal: config.allow_nonzero_removal,
        }
    }
}

/// Normalizes a participant name, rejecting blanks.
///
/// # Errors
///
/// Returns a validation error on `field` if the trimmed name is empty.
pub fn normalize_name(name: &str, field: &str) -> Result<String, LedgerError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

/// Checks that an amount is strictly positive.
///
/// # Errors
///
/// Returns a validation error on `field` for zero or negative amounts.
pub fn require_positive(amount: Decimal, field: &str) -> Result<(), LedgerError> {
    if amount.is_zero() {
        return Err(LedgerError::validation(field, "must not be zero"));
    }
    if amount.is_sign_negative() {
        return Err(LedgerError::validation(field, "must be positive"));
    }
    Ok(())
}

/// Validates an expense posting.
///
/// Checks, in order: description, total, payer, then every split. `exists` answers whether
/// a participant name is known to the ledger.
///
/// # Errors
///
/// Returns `LedgerError::Validation` naming the first offending field.
pub fn validate_expense<F>(
    input: &NewExpense,
    policy: LedgerPolicy,
    exists: F,
) -> Result<(), LedgerError>
where
    F: Fn(&str) -> bool,
{
    if input.description.trim().is_empty() {
        return Err(LedgerError::validation("description", "must not be empty"));
    }

    require_positive(input.total_amount, "total_amount")?;

    if !exists(&input.paid_by) {
        return Err(LedgerError::validation(
            "paid_by",
            format!("participant '{}' does not exist", input.paid_by),
        ));
    }

    if input.splits.is_empty() {
        return Err(LedgerError::validation("splits", "must not be empty"));
    }

    for (i, split) in input.splits.iter().enumerate() {
        if !exists(&split.participant) {
            return Err(LedgerError::validation(
                format!("splits[{i}].participant"),
                format!("participant '{}' does not exist", split.participant),
            ));
        }
        require_positive(split.amount, &format!("splits[{i}].amount"))?;
    }

    if policy.enforce_split_total {
        let Some(split_total) = input.split_total() else {
            return Err(LedgerError::validation("splits", "split amounts overflow"));
        };
        if split_total != input.total_amount {
            return Err(LedgerError::validation(
                "splits",
                format!(
                    "split amounts sum to {split_total} but total is {}",
                    input.total_amount
                ),
            ));
        }
    }

    Ok(())
}

/// Validates a settlement posting.
///
/// # Errors
///
/// Returns `NotFound` for unknown participants and `Validation` for a self-payment or a
/// non-positive amount.
pub fn validate_settlement<F>(
    from: &str,
    to: &str,
    amount: Decimal,
    exists: F,
) -> Result<(), LedgerError>
where
    F: Fn(&str) -> bool,
{
    if !exists(from) {
        return Err(LedgerError::NotFound(from.to_string()));
    }
    if !exists(to) {
        return Err(LedgerError::NotFound(to.to_string()));
    }
    if from == to {
        return Err(LedgerError::validation(
            "to",
            "must differ from the paying participant",
        ));
    }
    require_positive(amount, "amount")
}
