//! Payroll run models.
//!
//! This module contains [`PayrollRun`], its [`RunStatus`] state, and the
//! [`RunTotals`] aggregated from the run's lines.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{PayrollLine, RunConfiguration};

/// The lifecycle state of a payroll run.
///
/// `Draft` runs may be recomputed; `Processed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Computed but not yet approved; lines may be replaced.
    Draft,
    /// Approved and posted to the ledger; frozen.
    Processed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Draft => write!(f, "DRAFT"),
            RunStatus::Processed => write!(f, "PROCESSED"),
        }
    }
}

/// Sums of the line fields of a run.
///
/// # Example
///
/// ```
/// use payroll_engine::models::RunTotals;
/// use rust_decimal::Decimal;
///
/// let totals = RunTotals::default();
/// assert_eq!(totals.total_net, Decimal::ZERO);
/// assert_eq!(totals.employee_count, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    /// Sum of line gross pay.
    pub total_gross: Decimal,
    /// Sum of line PAYE.
    pub total_paye: Decimal,
    /// Sum of line pension.
    pub total_pension: Decimal,
    /// Sum of line NHF.
    pub total_nhf: Decimal,
    /// Sum of line net pay.
    pub total_net: Decimal,
    /// Number of lines.
    pub employee_count: u32,
}

/// A monthly payroll run.
///
/// At most one run exists per `(month, year)`. Lines are held alongside the
/// run by the lifecycle manager rather than embedded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Unique identifier for the run.
    pub id: Uuid,
    /// The configuration the run was computed with.
    pub config: RunConfiguration,
    /// Current lifecycle state.
    pub status: RunStatus,
    /// Totals over the run's lines.
    #[serde(flatten)]
    pub totals: RunTotals,
    /// When the run was first created.
    pub created_at: DateTime<Utc>,
    /// When the lines were last (re)computed.
    pub computed_at: DateTime<Utc>,
    /// When the run was processed; `None` while in draft.
    pub processed_at: Option<DateTime<Utc>>,
    /// The caller that processed the run.
    pub processed_by: Option<String>,
    /// Reference of the ledger journal posted on processing.
    pub journal_reference: Option<String>,
}

impl PayrollRun {
    /// Calendar month of the run.
    pub fn month(&self) -> u32 {
        self.config.month
    }

    /// Calendar year of the run.
    pub fn year(&self) -> i32 {
        self.config.year
    }

    /// Returns true once the run has been processed.
    pub fn is_processed(&self) -> bool {
        self.status == RunStatus::Processed
    }
}

/// A run together with its lines, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunWithLines {
    /// The run header.
    pub run: PayrollRun,
    /// One line per employee.
    pub lines: Vec<PayrollLine>,
}
