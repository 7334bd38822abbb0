//! Payroll run lifecycle.
//!
//! Runs move from DRAFT to PROCESSED exactly once. The manager reads the
//! employee directory and posts to the ledger through the [`ports`] traits;
//! [`in_memory`] provides process-local adapters for both.

pub mod in_memory;
mod journal;
mod manager;
pub mod ports;

pub use in_memory::{InMemoryDirectory, InMemoryLedger};
pub use journal::build_payroll_journal;
pub use manager::{CallerContext, PayrollRunManager};
pub use ports::{DirectoryHandle, EmployeeDirectory, Ledger, LedgerHandle};
