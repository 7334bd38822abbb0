//! Payroll computation and run-lifecycle engine.
//!
//! This crate computes monthly payslips under the Nigerian PAYE regime
//! (statutory pension and NHF contributions, consolidated relief allowance,
//! banded income tax), aggregates them into a payroll run, drives the run
//! from draft to processed while posting a balanced journal to the ledger,
//! and exports the bank disbursement file of a processed run.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod export;
pub mod lifecycle;
pub mod models;
