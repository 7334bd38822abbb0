//! Audit trace models.
//!
//! Every calculator step records what it was given, what it produced, and
//! the statutory rule it applied, so a payslip can be explained line by line.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
///
/// # Example
///
/// ```
/// use payroll_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "basic_salary".to_string(),
///     rule_name: "Monthly Basic Salary".to_string(),
///     statutory_ref: "Contract of employment".to_string(),
///     input: serde_json::json!({"annual_basic_salary": "1200000"}),
///     output: serde_json::json!({"basic_salary": "100000.00"}),
///     reasoning: "1200000 / 12 = 100000.00".to_string(),
/// };
/// assert_eq!(step.rule_id, "basic_salary");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the statute or policy behind this rule.
    pub statutory_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}
