//! Core data models for the Payroll Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod audit;
mod compensation;
mod ledger;
mod payroll_line;
mod payroll_run;
mod run_config;

pub use audit::AuditStep;
pub use compensation::{CompensationInput, MAX_ANNUAL_BASIC_SALARY};
pub use ledger::{EntrySide, JournalEntry, LedgerEntry};
pub use payroll_line::{LineWarning, PayrollLine, WarningCode};
pub use payroll_run::{PayrollRun, RunStatus, RunTotals, RunWithLines};
pub use run_config::RunConfiguration;
