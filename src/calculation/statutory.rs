//! Statutory contribution calculation.
//!
//! This module computes the two fixed-rate employee contributions deducted
//! every month:
//!
//! - **Pension**: a percentage of basic salary plus housing/transport
//!   allowances (Pension Reform Act 2014, s.4). Bonus and cash benefits are
//!   not pensionable.
//! - **NHF**: a percentage of basic salary (National Housing Fund Act, s.4).

use rust_decimal::Decimal;

use crate::models::AuditStep;

use super::rounding::round_money;

/// Statutory reference for the pension contribution.
pub const PENSION_REF: &str = "Pension Reform Act 2014 s.4(1)";

/// Statutory reference for the NHF contribution.
pub const NHF_REF: &str = "National Housing Fund Act s.4(1)";

/// The result of a single statutory contribution calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionResult {
    /// The monthly contribution, rounded to 2 decimal places.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the monthly employee pension contribution.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_pension;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result = calculate_pension(
///     Decimal::from(100_000),
///     Decimal::from(50_000),
///     Decimal::from_str("0.08").unwrap(),
///     1,
/// );
/// assert_eq!(result.amount, Decimal::from(12_000));
/// ```
pub fn calculate_pension(
    basic_salary: Decimal,
    allowances: Decimal,
    rate: Decimal,
    step_number: u32,
) -> ContributionResult {
    let pensionable = basic_salary + allowances;
    let amount = round_money(pensionable * rate);

    let audit_step = AuditStep {
        step_number,
        rule_id: "pension".to_string(),
        rule_name: "Employee Pension Contribution".to_string(),
        statutory_ref: PENSION_REF.to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.normalize().to_string(),
            "allowances": allowances.normalize().to_string(),
            "rate": rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "pensionable_pay": pensionable.normalize().to_string(),
            "pension": amount.to_string()
        }),
        reasoning: format!(
            "{}% × (₦{} basic + ₦{} allowances) = ₦{}",
            (rate * Decimal::ONE_HUNDRED).normalize(),
            basic_salary.normalize(),
            allowances.normalize(),
            amount
        ),
    };

    ContributionResult { amount, audit_step }
}

/// Calculates the monthly National Housing Fund contribution.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_nhf;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let result = calculate_nhf(Decimal::from(100_000), Decimal::from_str("0.025").unwrap(), 2);
/// assert_eq!(result.amount, Decimal::from(2_500));
/// ```
pub fn calculate_nhf(basic_salary: Decimal, rate: Decimal, step_number: u32) -> ContributionResult {
    let amount = round_money(basic_salary * rate);

    let audit_step = AuditStep {
        step_number,
        rule_id: "nhf".to_string(),
        rule_name: "National Housing Fund".to_string(),
        statutory_ref: NHF_REF.to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.normalize().to_string(),
            "rate": rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "nhf": amount.to_string()
        }),
        reasoning: format!(
            "{}% × ₦{} basic = ₦{}",
            (rate * Decimal::ONE_HUNDRED).normalize(),
            basic_salary.normalize(),
            amount
        ),
    };

    ContributionResult { amount, audit_step }
}
