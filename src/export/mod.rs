//! Disbursement export for processed payroll runs.

mod disbursement;

pub use disbursement::{
    DISBURSEMENT_HEADERS, DisbursementRow, disbursement_csv, disbursement_rows,
    write_disbursement_csv,
};
