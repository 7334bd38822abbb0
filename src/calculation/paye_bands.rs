//! Progressive PAYE calculation.
//!
//! This module applies the graduated income tax bands to annual taxable
//! income (Personal Income Tax Act, Sixth Schedule).
//!
//! ## Band Structure
//!
//! Income is consumed through the bands in order. Each band contributes
//! `rate × min(remaining income, band width)`; consumption stops as soon as
//! income is exhausted. The last band is open-ended.
//!
//! | Band (annual)            | Rate |
//! |--------------------------|------|
//! | first 300,000            | 7%   |
//! | next 300,000             | 11%  |
//! | next 500,000             | 15%  |
//! | next 500,000             | 19%  |
//! | next 1,600,000           | 21%  |
//! | remainder above 3,200,000| 24%  |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::TaxBand;
use crate::models::AuditStep;

use super::rounding::monthly_from_annual;

/// Statutory reference for the graduated tax table.
pub const PAYE_REF: &str = "PITA Sixth Schedule";

/// The tax contributed by a single band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandTax {
    /// 1-based position of the band in the table.
    pub band_number: u32,
    /// Income at which the band starts.
    pub lower_bound: Decimal,
    /// Income at which the band ends; `None` for the open top band.
    pub upper_bound: Option<Decimal>,
    /// Marginal rate of the band.
    pub rate: Decimal,
    /// Portion of taxable income that fell in this band.
    pub taxable_amount: Decimal,
    /// `rate × taxable_amount`.
    pub tax: Decimal,
}

/// The result of a PAYE calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayeResult {
    /// The annual taxable income the bands were applied to.
    pub annual_taxable_income: Decimal,
    /// Exact annual tax, the sum of `bands[..].tax`.
    pub annual_tax: Decimal,
    /// Annual tax / 12, rounded to 2 decimal places.
    pub monthly_tax: Decimal,
    /// One entry per band that received income.
    pub bands: Vec<BandTax>,
    /// One audit step per contributing band.
    pub audit_steps: Vec<AuditStep>,
}

/// Calculates annual and monthly PAYE for an annual taxable income.
///
/// Negative income is treated as zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_paye;
/// use payroll_engine::config::TaxTable;
/// use rust_decimal::Decimal;
///
/// let table = TaxTable::standard();
/// let result = calculate_paye(Decimal::from(1_066_000), &table.bands, 1);
///
/// // 21,000 + 33,000 + 69,900
/// assert_eq!(result.annual_tax, Decimal::from(123_900));
/// assert_eq!(result.monthly_tax, Decimal::from(10_325));
/// assert_eq!(result.bands.len(), 3);
/// ```
pub fn calculate_paye(
    annual_taxable_income: Decimal,
    bands: &[TaxBand],
    step_number_start: u32,
) -> PayeResult {
    let income = annual_taxable_income.max(Decimal::ZERO);
    let mut remaining = income;
    let mut lower_bound = Decimal::ZERO;
    let mut band_taxes = Vec::new();
    let mut audit_steps = Vec::new();
    let mut step_number = step_number_start;

    for (index, band) in bands.iter().enumerate() {
        if remaining <= Decimal::ZERO {
            break;
        }

        let taxable_amount = match band.width {
            Some(width) => remaining.min(width),
            None => remaining,
        };
        let tax = taxable_amount * band.rate;
        let upper_bound = band.width.map(|width| lower_bound + width);
        let band_number = index as u32 + 1;

        let range = match upper_bound {
            Some(upper) => format!("₦{} to ₦{}", lower_bound.normalize(), upper.normalize()),
            None => format!("above ₦{}", lower_bound.normalize()),
        };

        audit_steps.push(AuditStep {
            step_number,
            rule_id: format!("paye_band_{}", band_number),
            rule_name: format!("PAYE Band {}", band_number),
            statutory_ref: PAYE_REF.to_string(),
            input: serde_json::json!({
                "remaining_income": remaining.normalize().to_string(),
                "band_width": band.width.map(|w| w.normalize().to_string()),
                "rate": band.rate.normalize().to_string()
            }),
            output: serde_json::json!({
                "taxable_amount": taxable_amount.normalize().to_string(),
                "tax": tax.normalize().to_string()
            }),
            reasoning: format!(
                "Band {} ({}): ₦{} × {}% = ₦{}",
                band_number,
                range,
                taxable_amount.normalize(),
                (band.rate * Decimal::ONE_HUNDRED).normalize(),
                tax.normalize()
            ),
        });
        step_number += 1;

        band_taxes.push(BandTax {
            band_number,
            lower_bound,
            upper_bound,
            rate: band.rate,
            taxable_amount,
            tax,
        });

        remaining -= taxable_amount;
        if let Some(upper) = upper_bound {
            lower_bound = upper;
        }
    }

    let annual_tax: Decimal = band_taxes.iter().map(|b| b.tax).sum();

    PayeResult {
        annual_taxable_income: income,
        annual_tax,
        monthly_tax: monthly_from_annual(annual_tax),
        bands: band_taxes,
        audit_steps,
    }
}
