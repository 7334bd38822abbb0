//! Calculation logic for the Payroll Engine.
//!
//! This module contains the pure tax and relief calculator (monthly
//! components, pension and NHF contributions, consolidated relief,
//! progressive PAYE bands) and the run aggregator that folds computed
//! lines into run totals.

mod aggregate;
mod paye_bands;
mod payslip;
mod relief;
mod rounding;
mod statutory;

pub use aggregate::aggregate_lines;
pub use paye_bands::{BandTax, PAYE_REF, PayeResult, calculate_paye};
pub use payslip::{PayslipResult, calculate_payroll_line};
pub use relief::{CRA_REF, ReliefResult, calculate_cra};
pub use rounding::{MONTHS_PER_YEAR, monthly_from_annual, round_money};
pub use statutory::{ContributionResult, NHF_REF, PENSION_REF, calculate_nhf, calculate_pension};
