//! Consolidated Relief Allowance calculation.
//!
//! CRA is computed on annual gross income as the higher of a fixed floor or
//! a small percentage of gross, plus a larger percentage of gross
//! (Personal Income Tax Act s.33(1), as amended 2011).

use rust_decimal::Decimal;

use crate::config::ReliefConfig;
use crate::models::AuditStep;

/// Statutory reference for the consolidated relief allowance.
pub const CRA_REF: &str = "PITA s.33(1)";

/// The result of a CRA calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReliefResult {
    /// The annual relief amount.
    pub cra: Decimal,
    /// The fixed part: `max(floor, floor_percentage × annual_gross)`.
    pub fixed_component: Decimal,
    /// The variable part: `gross_percentage × annual_gross`.
    pub variable_component: Decimal,
    /// True when the fixed floor exceeded the percentage alternative.
    pub floor_applied: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the annual Consolidated Relief Allowance.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_cra;
/// use payroll_engine::config::TaxTable;
/// use rust_decimal::Decimal;
///
/// let relief = TaxTable::standard().relief;
/// let result = calculate_cra(Decimal::from(1_800_000), &relief, 1);
///
/// // max(200,000, 18,000) + 360,000
/// assert!(result.floor_applied);
/// assert_eq!(result.cra, Decimal::from(560_000));
/// ```
pub fn calculate_cra(annual_gross: Decimal, relief: &ReliefConfig, step_number: u32) -> ReliefResult {
    let percentage_alternative = annual_gross * relief.floor_percentage;
    let floor_applied = relief.floor > percentage_alternative;
    let fixed_component = relief.floor.max(percentage_alternative);
    let variable_component = annual_gross * relief.gross_percentage;
    let cra = fixed_component + variable_component;

    let reasoning = if floor_applied {
        format!(
            "Floor ₦{} exceeds {}% of gross (₦{}); CRA = ₦{} + {}% of ₦{} = ₦{}",
            relief.floor.normalize(),
            (relief.floor_percentage * Decimal::ONE_HUNDRED).normalize(),
            percentage_alternative.normalize(),
            relief.floor.normalize(),
            (relief.gross_percentage * Decimal::ONE_HUNDRED).normalize(),
            annual_gross.normalize(),
            cra.normalize()
        )
    } else {
        format!(
            "{}% of gross (₦{}) exceeds floor ₦{}; CRA = ₦{} + {}% of ₦{} = ₦{}",
            (relief.floor_percentage * Decimal::ONE_HUNDRED).normalize(),
            percentage_alternative.normalize(),
            relief.floor.normalize(),
            percentage_alternative.normalize(),
            (relief.gross_percentage * Decimal::ONE_HUNDRED).normalize(),
            annual_gross.normalize(),
            cra.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "cra".to_string(),
        rule_name: "Consolidated Relief Allowance".to_string(),
        statutory_ref: CRA_REF.to_string(),
        input: serde_json::json!({
            "annual_gross": annual_gross.normalize().to_string(),
            "floor": relief.floor.normalize().to_string(),
            "floor_percentage": relief.floor_percentage.normalize().to_string(),
            "gross_percentage": relief.gross_percentage.normalize().to_string()
        }),
        output: serde_json::json!({
            "fixed_component": fixed_component.normalize().to_string(),
            "variable_component": variable_component.normalize().to_string(),
            "floor_applied": floor_applied,
            "cra": cra.normalize().to_string()
        }),
        reasoning,
    };

    ReliefResult {
        cra,
        fixed_component,
        variable_component,
        floor_applied,
        audit_step,
    }
}
