//! Application state for the Payroll Engine API.

use std::sync::Arc;

use crate::lifecycle::PayrollRunManager;

/// Shared application state.
///
/// Holds the run manager every handler operates on.
#[derive(Clone)]
pub struct AppState {
    manager: Arc<PayrollRunManager>,
}

impl AppState {
    /// Creates application state around the given manager.
    pub fn new(manager: PayrollRunManager) -> Self {
        Self {
            manager: Arc::new(manager),
        }
    }

    /// Creates application state sharing an existing manager.
    pub fn from_shared(manager: Arc<PayrollRunManager>) -> Self {
        Self { manager }
    }

    /// Returns the run manager.
    pub fn manager(&self) -> &PayrollRunManager {
        &self.manager
    }

    /// Returns a shared handle to the run manager, for work moved off the
    /// request task.
    pub fn shared_manager(&self) -> Arc<PayrollRunManager> {
        Arc::clone(&self.manager)
    }
}
