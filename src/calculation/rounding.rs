//! Monetary rounding rules.
//!
//! Monthly amounts are rounded to kobo (2 decimal places) the moment they
//! are produced, so every later sum is exact.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of pay periods in a year.
pub const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Rounds a monetary amount to 2 decimal places, halves away from zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("10.005").unwrap()), Decimal::from_str("10.01").unwrap());
/// assert_eq!(round_money(Decimal::from_str("-10.005").unwrap()), Decimal::from_str("-10.01").unwrap());
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts an annual amount to a rounded monthly amount.
pub fn monthly_from_annual(annual: Decimal) -> Decimal {
    round_money(annual / MONTHS_PER_YEAR)
}
