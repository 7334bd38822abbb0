//! In-memory collaborator adapters.
//!
//! Thread-safe implementations of [`EmployeeDirectory`] and [`Ledger`] for
//! tests, demos and embedding callers that keep their data in process.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use crate::error::{EngineError, EngineResult};
use crate::models::{CompensationInput, JournalEntry};

use super::ports::{EmployeeDirectory, Ledger};

/// An employee directory backed by a vector of compensation records.
///
/// It can be made unavailable to exercise snapshot failures.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    employees: RwLock<Vec<CompensationInput>>,
    unavailable: AtomicBool,
}

impl InMemoryDirectory {
    /// Creates a directory holding the given active employees.
    pub fn new(employees: Vec<CompensationInput>) -> Self {
        Self {
            employees: RwLock::new(employees),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent snapshot fail (`true`) or succeed (`false`).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Inserts an employee, replacing any record with the same id.
    pub fn upsert(&self, employee: CompensationInput) {
        let mut employees = self.employees.write().unwrap_or_else(PoisonError::into_inner);
        match employees
            .iter_mut()
            .find(|e| e.employee_id == employee.employee_id)
        {
            Some(existing) => *existing = employee,
            None => employees.push(employee),
        }
    }

    /// Removes an employee from the active set.
    pub fn deactivate(&self, employee_id: &str) {
        let mut employees = self.employees.write().unwrap_or_else(PoisonError::into_inner);
        employees.retain(|e| e.employee_id != employee_id);
    }
}

impl EmployeeDirectory for InMemoryDirectory {
    fn list_active_compensation(&self) -> EngineResult<Vec<CompensationInput>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(EngineError::DirectoryUnavailable {
                message: "in-memory directory switched off".to_string(),
            });
        }

        let employees = self.employees.read().unwrap_or_else(PoisonError::into_inner);
        Ok(employees.clone())
    }
}

/// A ledger that records posted journals in memory.
///
/// It can be switched into a failing mode to exercise rollback paths.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    journals: Mutex<Vec<JournalEntry>>,
    failing: AtomicBool,
}

impl InMemoryLedger {
    /// Creates an empty, accepting ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent post fail (`true`) or succeed (`false`).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns every journal posted so far, in posting order.
    pub fn journals(&self) -> Vec<JournalEntry> {
        self.journals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Ledger for InMemoryLedger {
    fn post(&self, journal: &JournalEntry) -> EngineResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EngineError::LedgerPostingFailure {
                message: format!("ledger rejected journal '{}'", journal.reference),
            });
        }

        journal.ensure_balanced()?;
        self.journals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(journal.clone());
        Ok(())
    }
}
