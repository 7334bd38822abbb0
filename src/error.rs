//! Error types for the Payroll Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while computing, processing,
//! or exporting a payroll run.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::RunStatus;

/// The main error type for the Payroll Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::DuplicateRun { month: 3, year: 2025 };
/// assert_eq!(error.to_string(), "A payroll run already exists for 03/2025");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but describes an unusable policy.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of what made the configuration invalid.
        message: String,
    },

    /// No tax table is effective for the requested period.
    #[error("No tax table effective on {date}")]
    TaxTableNotFound {
        /// The first day of the requested period.
        date: NaiveDate,
    },

    /// A run configuration or input was rejected before any computation.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A run already exists for the requested period.
    #[error("A payroll run already exists for {month:02}/{year}")]
    DuplicateRun {
        /// The calendar month of the existing run.
        month: u32,
        /// The calendar year of the existing run.
        year: i32,
    },

    /// No run exists with the given identifier.
    #[error("Payroll run not found: {run_id}")]
    RunNotFound {
        /// The identifier that was looked up.
        run_id: Uuid,
    },

    /// The requested transition is not allowed from the run's current status.
    #[error("Cannot {operation} payroll run {run_id} in status {status}")]
    InvalidState {
        /// The run the transition was attempted on.
        run_id: Uuid,
        /// The run's status at the time of the attempt.
        status: RunStatus,
        /// The attempted operation (e.g. "process").
        operation: String,
    },

    /// A disbursement export was requested for a run that is still a draft.
    #[error("Payroll run {run_id} has not been processed")]
    NotProcessed {
        /// The run that was exported.
        run_id: Uuid,
    },

    /// The ledger rejected the payroll journal; the run was left untouched.
    #[error("Ledger posting failed: {message}")]
    LedgerPostingFailure {
        /// The reason reported by the ledger.
        message: String,
    },

    /// A journal was built whose debits and credits do not net to zero.
    #[error("Journal '{reference}' is unbalanced: debits {debits}, credits {credits}")]
    UnbalancedJournal {
        /// The journal reference.
        reference: String,
        /// Sum of the debit legs.
        debits: Decimal,
        /// Sum of the credit legs.
        credits: Decimal,
    },

    /// The employee directory could not provide a compensation snapshot.
    #[error("Employee directory unavailable: {message}")]
    DirectoryUnavailable {
        /// A description of the directory failure.
        message: String,
    },

    /// The disbursement file could not be written.
    #[error("Disbursement export failed: {message}")]
    ExportFailure {
        /// A description of the write failure.
        message: String,
    },
}

impl From<csv::Error> for EngineError {
    fn from(error: csv::Error) -> Self {
        EngineError::ExportFailure {
            message: error.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/policy.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/policy.yaml"
        );
    }

    #[test]
    fn test_duplicate_run_pads_month() {
        let error = EngineError::DuplicateRun {
            month: 3,
            year: 2025,
        };
        assert_eq!(
            error.to_string(),
            "A payroll run already exists for 03/2025"
        );
    }

    #[test]
    fn test_validation_displays_field_and_message() {
        let error = EngineError::Validation {
            field: "airtime_data_percentage".to_string(),
            message: "must be between 0 and 100".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid field 'airtime_data_percentage': must be between 0 and 100"
        );
    }

    #[test]
    fn test_invalid_state_displays_operation_and_status() {
        let run_id = Uuid::nil();
        let error = EngineError::InvalidState {
            run_id,
            status: RunStatus::Processed,
            operation: "process".to_string(),
        };
        assert_eq!(
            error.to_string(),
            format!("Cannot process payroll run {} in status PROCESSED", run_id)
        );
    }

    #[test]
    fn test_unbalanced_journal_displays_sides() {
        let error = EngineError::UnbalancedJournal {
            reference: "PAYROLL-2025-03".to_string(),
            debits: Decimal::from_str("100.00").unwrap(),
            credits: Decimal::from_str("99.99").unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Journal 'PAYROLL-2025-03' is unbalanced: debits 100.00, credits 99.99"
        );
    }

    #[test]
    fn test_tax_table_not_found_displays_date() {
        let error = EngineError::TaxTableNotFound {
            date: NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
        };
        assert_eq!(error.to_string(), "No tax table effective on 2001-01-01");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_processed() -> EngineResult<()> {
            Err(EngineError::NotProcessed {
                run_id: Uuid::nil(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_processed()?;
            Ok(())
        }

        assert!(matches!(
            propagates_error(),
            Err(EngineError::NotProcessed { .. })
        ));
    }
}
