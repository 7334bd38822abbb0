//! Per-employee payslip calculation.
//!
//! This module turns one [`CompensationInput`] and a [`RunConfiguration`]
//! into a [`PayrollLine`] using the annual-then-monthly method:
//!
//! 1. Monthly components (basic, allowances, bonus, cash benefits) are
//!    derived and rounded to 2 decimal places; gross is their sum.
//! 2. Pension and NHF are computed monthly.
//! 3. Gross, pension and NHF are annualized (× 12); CRA and taxable income
//!    are computed on the annual axis; PAYE bands give annual tax.
//! 4. Annual tax is divided by 12 and net pay is derived from the rounded
//!    monthly figures.
//!
//! The calculation is pure: the same inputs always produce the same line
//! and audit trace.

use rust_decimal::Decimal;

use crate::config::{StatutoryRates, TaxTable};
use crate::models::{
    AuditStep, CompensationInput, LineWarning, PayrollLine, RunConfiguration, WarningCode,
};

use super::paye_bands::{BandTax, calculate_paye};
use super::relief::calculate_cra;
use super::rounding::{MONTHS_PER_YEAR, monthly_from_annual, round_money};
use super::statutory::{calculate_nhf, calculate_pension};

/// The result of calculating one employee's month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayslipResult {
    /// The computed line.
    pub line: PayrollLine,
    /// Per-band PAYE breakdown.
    pub paye_bands: Vec<BandTax>,
    /// Ordered audit steps explaining every figure on the line.
    pub audit_steps: Vec<AuditStep>,
}

/// Calculates one employee's payroll line for a run.
///
/// Net pay is never clamped: if statutory deductions exceed gross the line
/// carries a negative `net_pay` and a [`WarningCode::NegativeNetPay`]
/// warning. Missing bank details produce a
/// [`WarningCode::MissingBankDetails`] warning.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_payroll_line;
/// use payroll_engine::config::{StatutoryRates, TaxTable};
/// use payroll_engine::models::{CompensationInput, RunConfiguration};
/// use rust_decimal::Decimal;
///
/// let input = CompensationInput {
///     employee_id: "emp_001".to_string(),
///     employee_name: "Ada Obi".to_string(),
///     annual_basic_salary: Decimal::from(1_200_000),
///     bank: Some("GTBank".to_string()),
///     account_number: Some("0123456789".to_string()),
/// };
/// let run = RunConfiguration {
///     month: 3,
///     year: 2025,
///     include_13th_month: false,
///     airtime_data_percentage: Decimal::ZERO,
/// };
///
/// let result = calculate_payroll_line(
///     &input,
///     &run,
///     &StatutoryRates::default(),
///     &TaxTable::standard(),
/// );
///
/// assert_eq!(result.line.basic_salary, Decimal::from(100_000));
/// assert_eq!(result.line.gross_pay, Decimal::from(150_000));
/// assert_eq!(result.line.paye, Decimal::from(10_325));
/// assert_eq!(result.line.net_pay, Decimal::from(125_175));
/// ```
pub fn calculate_payroll_line(
    input: &CompensationInput,
    run: &RunConfiguration,
    rates: &StatutoryRates,
    table: &TaxTable,
) -> PayslipResult {
    let mut audit_steps = Vec::new();
    let mut step_number: u32 = 1;

    // Monthly components
    let basic_salary = monthly_from_annual(input.annual_basic_salary);
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "basic_salary".to_string(),
        rule_name: "Monthly Basic Salary".to_string(),
        statutory_ref: "Contract of employment".to_string(),
        input: serde_json::json!({
            "annual_basic_salary": input.annual_basic_salary.normalize().to_string()
        }),
        output: serde_json::json!({
            "basic_salary": basic_salary.to_string()
        }),
        reasoning: format!(
            "₦{} / 12 = ₦{}",
            input.annual_basic_salary.normalize(),
            basic_salary
        ),
    });
    step_number += 1;

    let allowances = round_money(basic_salary * rates.allowance_rate);
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "allowances".to_string(),
        rule_name: "Housing and Transport Allowance".to_string(),
        statutory_ref: "Payroll policy allowance_rate".to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.to_string(),
            "allowance_rate": rates.allowance_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "allowances": allowances.to_string()
        }),
        reasoning: format!(
            "{}% × ₦{} basic = ₦{}",
            (rates.allowance_rate * Decimal::ONE_HUNDRED).normalize(),
            basic_salary,
            allowances
        ),
    });
    step_number += 1;

    let bonus = if run.include_13th_month {
        monthly_from_annual(input.annual_basic_salary)
    } else {
        Decimal::ZERO
    };
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "thirteenth_month".to_string(),
        rule_name: "13th Month Bonus".to_string(),
        statutory_ref: "Payroll policy".to_string(),
        input: serde_json::json!({
            "include_13th_month": run.include_13th_month,
            "annual_basic_salary": input.annual_basic_salary.normalize().to_string()
        }),
        output: serde_json::json!({
            "bonus": bonus.to_string()
        }),
        reasoning: if run.include_13th_month {
            format!("13th month included: one month's basic = ₦{}", bonus)
        } else {
            "13th month not included in this run".to_string()
        },
    });
    step_number += 1;

    let cash_benefits =
        round_money(basic_salary * run.airtime_data_percentage / Decimal::ONE_HUNDRED);
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "cash_benefits".to_string(),
        rule_name: "Airtime and Data Benefit".to_string(),
        statutory_ref: "Payroll policy".to_string(),
        input: serde_json::json!({
            "basic_salary": basic_salary.to_string(),
            "airtime_data_percentage": run.airtime_data_percentage.normalize().to_string()
        }),
        output: serde_json::json!({
            "cash_benefits": cash_benefits.to_string()
        }),
        reasoning: format!(
            "{}% × ₦{} basic = ₦{}",
            run.airtime_data_percentage.normalize(),
            basic_salary,
            cash_benefits
        ),
    });
    step_number += 1;

    let gross_pay = basic_salary + allowances + bonus + cash_benefits;

    // Statutory contributions
    let pension = calculate_pension(basic_salary, allowances, rates.pension_rate, step_number);
    audit_steps.push(pension.audit_step);
    step_number += 1;

    let nhf = calculate_nhf(basic_salary, rates.nhf_rate, step_number);
    audit_steps.push(nhf.audit_step);
    step_number += 1;

    // Annual axis
    let annual_gross = gross_pay * MONTHS_PER_YEAR;
    let annual_pension = pension.amount * MONTHS_PER_YEAR;
    let annual_nhf = nhf.amount * MONTHS_PER_YEAR;

    let relief = calculate_cra(annual_gross, &table.relief, step_number);
    audit_steps.push(relief.audit_step);
    step_number += 1;

    let taxable_income =
        (annual_gross - relief.cra - annual_pension - annual_nhf).max(Decimal::ZERO);
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "taxable_income".to_string(),
        rule_name: "Annual Taxable Income".to_string(),
        statutory_ref: "PITA s.33".to_string(),
        input: serde_json::json!({
            "annual_gross": annual_gross.normalize().to_string(),
            "cra": relief.cra.normalize().to_string(),
            "annual_pension": annual_pension.normalize().to_string(),
            "annual_nhf": annual_nhf.normalize().to_string()
        }),
        output: serde_json::json!({
            "taxable_income": taxable_income.normalize().to_string()
        }),
        reasoning: format!(
            "max(0, ₦{} - ₦{} CRA - ₦{} pension - ₦{} NHF) = ₦{}",
            annual_gross.normalize(),
            relief.cra.normalize(),
            annual_pension.normalize(),
            annual_nhf.normalize(),
            taxable_income.normalize()
        ),
    });
    step_number += 1;

    let paye = calculate_paye(taxable_income, &table.bands, step_number);
    step_number += paye.audit_steps.len() as u32;
    audit_steps.extend(paye.audit_steps);

    let net_pay = gross_pay - paye.monthly_tax - pension.amount - nhf.amount;
    audit_steps.push(AuditStep {
        step_number,
        rule_id: "net_pay".to_string(),
        rule_name: "Net Pay".to_string(),
        statutory_ref: "Payroll policy".to_string(),
        input: serde_json::json!({
            "gross_pay": gross_pay.to_string(),
            "annual_paye": paye.annual_tax.normalize().to_string(),
            "paye": paye.monthly_tax.to_string(),
            "pension": pension.amount.to_string(),
            "nhf": nhf.amount.to_string()
        }),
        output: serde_json::json!({
            "net_pay": net_pay.to_string()
        }),
        reasoning: format!(
            "₦{} gross - ₦{} PAYE - ₦{} pension - ₦{} NHF = ₦{}",
            gross_pay, paye.monthly_tax, pension.amount, nhf.amount, net_pay
        ),
    });

    let mut warnings = Vec::new();
    if !input.has_bank_details() {
        warnings.push(LineWarning {
            code: WarningCode::MissingBankDetails,
            message: format!(
                "Employee '{}' has no complete bank details; line cannot be disbursed",
                input.employee_id
            ),
        });
    }
    if net_pay < Decimal::ZERO {
        warnings.push(LineWarning {
            code: WarningCode::NegativeNetPay,
            message: format!(
                "Deductions exceed gross pay for employee '{}': net pay {}",
                input.employee_id, net_pay
            ),
        });
    }

    let line = PayrollLine {
        employee_id: input.employee_id.clone(),
        employee_name: input.employee_name.clone(),
        bank: input.bank.clone(),
        account_number: input.account_number.clone(),
        basic_salary,
        allowances,
        bonus,
        cash_benefits,
        gross_pay,
        cra: relief.cra,
        taxable_income,
        paye: paye.monthly_tax,
        pension: pension.amount,
        nhf: nhf.amount,
        net_pay,
        warnings,
    };

    PayslipResult {
        line,
        paye_bands: paye.bands,
        audit_steps,
    }
}
