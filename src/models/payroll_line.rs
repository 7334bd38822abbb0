//! Payroll line models.
//!
//! A [`PayrollLine`] is one employee's computed month inside a run. Lines
//! are produced by the calculator and never edited afterwards; a draft run
//! is recomputed by replacing its whole line set.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::compensation::has_value;

/// Identifies the kind of condition a [`LineWarning`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    /// Bank name or account number is missing; the line cannot be disbursed.
    MissingBankDetails,
    /// Statutory deductions exceed gross pay.
    NegativeNetPay,
}

impl WarningCode {
    /// The stable string form used in logs and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::MissingBankDetails => "MISSING_BANK_DETAILS",
            WarningCode::NegativeNetPay => "NEGATIVE_NET_PAY",
        }
    }
}

/// A non-fatal condition attached to a payroll line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineWarning {
    /// The kind of condition.
    pub code: WarningCode,
    /// A human-readable description of the condition.
    pub message: String,
}

/// One employee's computed pay for a run's month.
///
/// Monthly money fields are rounded to 2 decimal places. `cra` and
/// `taxable_income` are annual figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLine {
    /// The employee this line pays.
    pub employee_id: String,
    /// The employee's name at snapshot time.
    pub employee_name: String,
    /// Bank name at snapshot time.
    pub bank: Option<String>,
    /// Account number at snapshot time.
    pub account_number: Option<String>,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Housing/transport allowance.
    pub allowances: Decimal,
    /// 13th-month bonus, zero unless configured for the run.
    pub bonus: Decimal,
    /// Airtime/data cash benefits.
    pub cash_benefits: Decimal,
    /// basic + allowances + bonus + cash benefits.
    pub gross_pay: Decimal,
    /// Consolidated Relief Allowance (annual).
    pub cra: Decimal,
    /// Taxable income after relief and statutory deductions (annual).
    pub taxable_income: Decimal,
    /// Monthly PAYE.
    pub paye: Decimal,
    /// Monthly employee pension contribution.
    pub pension: Decimal,
    /// Monthly NHF contribution.
    pub nhf: Decimal,
    /// gross - paye - pension - nhf.
    pub net_pay: Decimal,
    /// Conditions that need attention but do not block the run.
    #[serde(default)]
    pub warnings: Vec<LineWarning>,
}

impl PayrollLine {
    /// Returns true if a warning with the given code is attached.
    pub fn has_warning(&self, code: WarningCode) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }

    /// Returns true if the line carries a non-blank bank name and account number.
    ///
    /// Same rule the calculator applies when it attaches
    /// [`WarningCode::MissingBankDetails`].
    pub fn has_bank_details(&self) -> bool {
        has_value(&self.bank) && has_value(&self.account_number)
    }
}
