//! Compensation snapshot model.
//!
//! This module defines [`CompensationInput`], the read-only view of an
//! employee's pay facts that the engine takes from the employee directory
//! when a run is created.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest annual basic salary the calculator accepts (one quadrillion).
///
/// Keeps every derived monthly and annual figure well inside `Decimal`
/// range, so the per-employee arithmetic cannot overflow.
pub const MAX_ANNUAL_BASIC_SALARY: Decimal =
    Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// The compensation facts needed to compute one employee's month.
///
/// Owned by the employee directory; the engine only ever reads a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationInput {
    /// Unique identifier for the employee.
    pub employee_id: String,
    /// The employee's display name, as printed on payslips and bank files.
    pub employee_name: String,
    /// Basic annual salary; never negative.
    pub annual_basic_salary: Decimal,
    /// Name of the employee's bank.
    #[serde(default)]
    pub bank: Option<String>,
    /// The employee's account number at `bank`.
    #[serde(default)]
    pub account_number: Option<String>,
}

impl CompensationInput {
    /// Returns true if both bank name and account number are present and non-blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::CompensationInput;
    /// use rust_decimal::Decimal;
    ///
    /// let input = CompensationInput {
    ///     employee_id: "emp_001".to_string(),
    ///     employee_name: "Ada Obi".to_string(),
    ///     annual_basic_salary: Decimal::from(1_200_000),
    ///     bank: Some("First Bank".to_string()),
    ///     account_number: Some("   ".to_string()),
    /// };
    /// assert!(!input.has_bank_details());
    /// ```
    pub fn has_bank_details(&self) -> bool {
        has_value(&self.bank) && has_value(&self.account_number)
    }
}

/// True if an optional bank field holds something other than whitespace.
pub(crate) fn has_value(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}
