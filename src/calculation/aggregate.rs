//! Run aggregation.
//!
//! Folds payroll lines into [`RunTotals`]. Totals are plain sums of the
//! already-rounded line fields, so adding and retracting lines one at a
//! time always lands on the same totals as summing from scratch.

use rust_decimal::Decimal;

use crate::models::{PayrollLine, RunTotals};

impl RunTotals {
    /// Adds one line's figures to the totals.
    pub fn add_line(&mut self, line: &PayrollLine) {
        self.total_gross += line.gross_pay;
        self.total_paye += line.paye;
        self.total_pension += line.pension;
        self.total_nhf += line.nhf;
        self.total_net += line.net_pay;
        self.employee_count += 1;
    }

    /// Removes one previously added line's figures from the totals.
    pub fn remove_line(&mut self, line: &PayrollLine) {
        self.total_gross -= line.gross_pay;
        self.total_paye -= line.paye;
        self.total_pension -= line.pension;
        self.total_nhf -= line.nhf;
        self.total_net -= line.net_pay;
        self.employee_count = self.employee_count.saturating_sub(1);
    }

    /// Total statutory deductions withheld across the run.
    pub fn total_deductions(&self) -> Decimal {
        self.total_paye + self.total_pension + self.total_nhf
    }
}

/// Sums every line into fresh run totals.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::aggregate_lines;
///
/// let totals = aggregate_lines(&[]);
/// assert_eq!(totals.employee_count, 0);
/// ```
pub fn aggregate_lines(lines: &[PayrollLine]) -> RunTotals {
    lines.iter().fold(RunTotals::default(), |mut totals, line| {
        totals.add_line(line);
        totals
    })
}
