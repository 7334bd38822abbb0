//! Bank disbursement export.
//!
//! Renders a processed run into one row per employee (name, bank, account
//! number, net pay) for upload to the paying bank.

use std::io::Write;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculation::round_money;
use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollLine, PayrollRun};

/// Column headers of the disbursement file, in order.
pub const DISBURSEMENT_HEADERS: [&str; 4] = ["employee_name", "bank", "account_number", "net_pay"];

/// One payee in a disbursement file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisbursementRow {
    /// The employee being paid.
    pub employee_name: String,
    /// Destination bank; empty when the directory had none.
    pub bank: String,
    /// Destination account number; empty when the directory had none.
    pub account_number: String,
    /// Amount to transfer.
    pub net_pay: Decimal,
}

impl DisbursementRow {
    /// Net pay formatted with exactly two decimal places.
    pub fn net_pay_display(&self) -> String {
        format!("{:.2}", round_money(self.net_pay))
    }
}

/// Builds disbursement rows for a processed run.
///
/// Fails with [`EngineError::NotProcessed`] for a draft run. Lines without
/// complete bank details are still exported; missing or blank values become
/// empty cells.
pub fn disbursement_rows(
    run: &PayrollRun,
    lines: &[PayrollLine],
) -> EngineResult<Vec<DisbursementRow>> {
    if !run.is_processed() {
        return Err(EngineError::NotProcessed { run_id: run.id });
    }

    let rows = lines
        .iter()
        .map(|line| {
            if !line.has_bank_details() {
                warn!(
                    run_id = %run.id,
                    employee_id = %line.employee_id,
                    "Exporting disbursement row without bank details"
                );
            }
            DisbursementRow {
                employee_name: line.employee_name.clone(),
                bank: cell(&line.bank),
                account_number: cell(&line.account_number),
                net_pay: line.net_pay,
            }
        })
        .collect();

    Ok(rows)
}

fn cell(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

/// Writes a processed run's disbursement file as CSV.
pub fn write_disbursement_csv<W: Write>(
    run: &PayrollRun,
    lines: &[PayrollLine],
    writer: W,
) -> EngineResult<()> {
    let rows = disbursement_rows(run, lines)?;

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(DISBURSEMENT_HEADERS)?;
    for row in &rows {
        csv_writer.write_record([
            row.employee_name.as_str(),
            row.bank.as_str(),
            row.account_number.as_str(),
            row.net_pay_display().as_str(),
        ])?;
    }
    csv_writer.flush().map_err(|e| EngineError::ExportFailure {
        message: e.to_string(),
    })?;

    Ok(())
}

/// Renders a processed run's disbursement file into a CSV string.
pub fn disbursement_csv(run: &PayrollRun, lines: &[PayrollLine]) -> EngineResult<String> {
    let mut buffer = Vec::new();
    write_disbursement_csv(run, lines, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| EngineError::ExportFailure {
        message: e.to_string(),
    })
}
