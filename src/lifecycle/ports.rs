//! Collaborator ports.
//!
//! The lifecycle manager reaches the outside world through two narrow
//! capabilities: reading the active compensation snapshot and posting a
//! journal to the ledger.

use std::sync::Arc;

use crate::error::EngineResult;
use crate::models::{CompensationInput, JournalEntry};

/// Read-only access to the employee directory.
pub trait EmployeeDirectory: Send + Sync {
    /// Lists the compensation facts of every active employee.
    ///
    /// The manager reports any failure here as
    /// [`EngineError::DirectoryUnavailable`](crate::error::EngineError::DirectoryUnavailable).
    fn list_active_compensation(&self) -> EngineResult<Vec<CompensationInput>>;
}

/// The accounting ledger payroll journals are posted to.
///
/// `post` must be all-or-nothing: on error no leg of the journal may have
/// been recorded.
pub trait Ledger: Send + Sync {
    /// Posts a balanced journal.
    fn post(&self, journal: &JournalEntry) -> EngineResult<()>;
}

/// Shared, dynamically dispatched directory handle.
pub type DirectoryHandle = Arc<dyn EmployeeDirectory>;

/// Shared, dynamically dispatched ledger handle.
pub type LedgerHandle = Arc<dyn Ledger>;
