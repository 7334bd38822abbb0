//! Payroll run lifecycle management.
//!
//! [`PayrollRunManager`] owns the run state machine:
//!
//! ```text
//! create ──► DRAFT ──process──► PROCESSED
//!             │  ▲
//!             └──┘ recompute
//! ```
//!
//! At most one run exists per `(month, year)`. The run book lock only
//! guards the period index; each run carries its own lock. Processing posts
//! the run's journal to the ledger and flips the status as one unit under
//! that run's lock: if the ledger rejects the journal the run stays in
//! draft. A slow ledger therefore only holds up callers of the same run.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{aggregate_lines, calculate_payroll_line};
use crate::config::{ConfigLoader, PolicyConfig};
use crate::error::{EngineError, EngineResult};
use crate::export::{DisbursementRow, disbursement_csv, disbursement_rows};
use crate::models::{
    CompensationInput, MAX_ANNUAL_BASIC_SALARY, PayrollLine, PayrollRun, RunConfiguration,
    RunStatus, RunWithLines,
};

use super::journal::build_payroll_journal;
use super::ports::{DirectoryHandle, LedgerHandle};

/// The already-authorized caller performing a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
    /// Identifier of the approving user or service.
    pub actor: String,
}

impl CallerContext {
    /// Creates a caller context for the given actor.
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
        }
    }
}

type PeriodKey = (i32, u32);

#[derive(Debug, Clone)]
struct RunRecord {
    run: PayrollRun,
    lines: Vec<PayrollLine>,
}

impl RunRecord {
    fn to_run_with_lines(&self) -> RunWithLines {
        RunWithLines {
            run: self.run.clone(),
            lines: self.lines.clone(),
        }
    }
}

type SharedRecord = Arc<Mutex<RunRecord>>;

#[derive(Debug, Default)]
struct RunBook {
    records: HashMap<Uuid, SharedRecord>,
    by_period: BTreeMap<PeriodKey, Uuid>,
}

impl RunBook {
    fn record(&self, run_id: Uuid) -> EngineResult<SharedRecord> {
        self.records
            .get(&run_id)
            .cloned()
            .ok_or(EngineError::RunNotFound { run_id })
    }
}

fn lock_record(record: &SharedRecord) -> MutexGuard<'_, RunRecord> {
    record.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Creates, recomputes, processes and exports payroll runs.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use payroll_engine::config::PolicyConfig;
/// use payroll_engine::lifecycle::{CallerContext, InMemoryDirectory, InMemoryLedger, PayrollRunManager};
/// use payroll_engine::models::{CompensationInput, RunConfiguration, RunStatus};
/// use rust_decimal::Decimal;
///
/// let directory = Arc::new(InMemoryDirectory::new(vec![CompensationInput {
///     employee_id: "emp_001".to_string(),
///     employee_name: "Ada Obi".to_string(),
///     annual_basic_salary: Decimal::from(1_200_000),
///     bank: Some("GTBank".to_string()),
///     account_number: Some("0123456789".to_string()),
/// }]));
/// let ledger = Arc::new(InMemoryLedger::new());
/// let manager = PayrollRunManager::new(PolicyConfig::standard(), directory, ledger.clone());
///
/// let created = manager.create_run(RunConfiguration {
///     month: 3,
///     year: 2025,
///     include_13th_month: false,
///     airtime_data_percentage: Decimal::ZERO,
/// })?;
/// assert_eq!(created.run.status, RunStatus::Draft);
///
/// let processed = manager.process_run(created.run.id, &CallerContext::new("finance.lead"))?;
/// assert_eq!(processed.status, RunStatus::Processed);
/// assert_eq!(ledger.journals().len(), 1);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
pub struct PayrollRunManager {
    policy: PolicyConfig,
    directory: DirectoryHandle,
    ledger: LedgerHandle,
    book: Mutex<RunBook>,
}

impl PayrollRunManager {
    /// Creates a manager over the given policy and collaborators.
    pub fn new(policy: PolicyConfig, directory: DirectoryHandle, ledger: LedgerHandle) -> Self {
        Self {
            policy,
            directory,
            ledger,
            book: Mutex::new(RunBook::default()),
        }
    }

    /// Creates a manager over the policy a [`ConfigLoader`] has loaded.
    pub fn from_loader(
        loader: &ConfigLoader,
        directory: DirectoryHandle,
        ledger: LedgerHandle,
    ) -> Self {
        Self::new(loader.config().clone(), directory, ledger)
    }

    /// Returns the policy runs are computed with.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    fn lock_book(&self) -> MutexGuard<'_, RunBook> {
        self.book.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, run_id: Uuid) -> EngineResult<SharedRecord> {
        self.lock_book().record(run_id)
    }

    /// Creates a draft run for the configured period.
    ///
    /// Fails with [`EngineError::Validation`] for a bad configuration or
    /// snapshot, [`EngineError::DirectoryUnavailable`] if the snapshot cannot
    /// be read and [`EngineError::DuplicateRun`] if a run already exists for
    /// the period, whatever its status. Lines are computed outside the lock;
    /// the period is re-checked on insert so concurrent creators for the
    /// same period produce exactly one run.
    pub fn create_run(&self, config: RunConfiguration) -> EngineResult<RunWithLines> {
        config.validate()?;
        let key = (config.year, config.month);

        if self.lock_book().by_period.contains_key(&key) {
            return Err(self.duplicate(&config));
        }

        let lines = self.compute_lines(&config)?;
        let now = Utc::now();
        let run = PayrollRun {
            id: Uuid::new_v4(),
            config,
            status: RunStatus::Draft,
            totals: aggregate_lines(&lines),
            created_at: now,
            computed_at: now,
            processed_at: None,
            processed_by: None,
            journal_reference: None,
        };

        let mut book = self.lock_book();
        if book.by_period.contains_key(&key) {
            return Err(self.duplicate(&run.config));
        }

        let record = RunRecord { run, lines };
        let created = record.to_run_with_lines();
        book.by_period.insert(key, record.run.id);
        book.records.insert(record.run.id, Arc::new(Mutex::new(record)));
        drop(book);

        info!(
            run_id = %created.run.id,
            period = %created.run.config.reference(),
            employee_count = created.run.totals.employee_count,
            total_gross = %created.run.totals.total_gross,
            total_net = %created.run.totals.total_net,
            "Created draft payroll run"
        );

        Ok(created)
    }

    /// Recomputes a draft run from a fresh directory snapshot.
    ///
    /// The whole line set and the totals are replaced together; a processed
    /// run fails with [`EngineError::InvalidState`]. The run's lock is held
    /// while the snapshot is read, so overlapping recomputes of one run are
    /// serialized and the last to finish stores the newest snapshot.
    pub fn recompute_run(&self, run_id: Uuid) -> EngineResult<RunWithLines> {
        let shared = self.record(run_id)?;
        let mut record = lock_record(&shared);
        Self::ensure_draft(&record.run, "recompute")?;

        let lines = self.compute_lines(&record.run.config)?;
        let previous_count = record.run.totals.employee_count;
        record.run.totals = aggregate_lines(&lines);
        record.lines = lines;
        record.run.computed_at = Utc::now();

        info!(
            run_id = %run_id,
            period = %record.run.config.reference(),
            previous_employee_count = previous_count,
            employee_count = record.run.totals.employee_count,
            total_net = %record.run.totals.total_net,
            "Recomputed draft payroll run"
        );

        Ok(record.to_run_with_lines())
    }

    /// Processes a draft run: freezes it and posts its journal.
    ///
    /// Fails with [`EngineError::InvalidState`] if the run is already
    /// processed. A ledger failure leaves the run in draft with
    /// `processed_at` unset and is reported as
    /// [`EngineError::LedgerPostingFailure`]. Only this run is locked while
    /// the ledger is called.
    pub fn process_run(&self, run_id: Uuid, caller: &CallerContext) -> EngineResult<PayrollRun> {
        let shared = self.record(run_id)?;
        let mut record = lock_record(&shared);

        if let Err(err) = Self::ensure_draft(&record.run, "process") {
            warn!(run_id = %run_id, actor = %caller.actor, "Rejected processing of processed run");
            return Err(err);
        }

        // Freeze totals from the exact line set being posted.
        record.run.totals = aggregate_lines(&record.lines);

        let journal = build_payroll_journal(&record.run, self.policy.accounts());
        journal.ensure_balanced()?;

        if let Err(err) = self.ledger.post(&journal) {
            warn!(
                run_id = %run_id,
                reference = %journal.reference,
                error = %err,
                "Ledger posting failed; run left in draft"
            );
            return Err(match err {
                EngineError::LedgerPostingFailure { .. } => err,
                other => EngineError::LedgerPostingFailure {
                    message: other.to_string(),
                },
            });
        }

        record.run.status = RunStatus::Processed;
        record.run.processed_at = Some(Utc::now());
        record.run.processed_by = Some(caller.actor.clone());
        record.run.journal_reference = Some(journal.reference.clone());

        info!(
            run_id = %run_id,
            period = %record.run.config.reference(),
            actor = %caller.actor,
            journal = %journal.reference,
            total_gross = %record.run.totals.total_gross,
            total_net = %record.run.totals.total_net,
            "Processed payroll run"
        );

        Ok(record.run.clone())
    }

    /// Returns a run with its lines.
    pub fn get_run(&self, run_id: Uuid) -> EngineResult<RunWithLines> {
        let shared = self.record(run_id)?;
        let record = lock_record(&shared);
        Ok(record.to_run_with_lines())
    }

    /// Finds the run for a period, if one exists.
    pub fn find_run(&self, month: u32, year: i32) -> Option<PayrollRun> {
        let shared = {
            let book = self.lock_book();
            book.by_period
                .get(&(year, month))
                .and_then(|id| book.records.get(id))
                .cloned()
        }?;
        let record = lock_record(&shared);
        Some(record.run.clone())
    }

    /// Lists every run, oldest period first.
    pub fn list_runs(&self) -> Vec<PayrollRun> {
        let shared: Vec<SharedRecord> = {
            let book = self.lock_book();
            book.by_period
                .values()
                .filter_map(|id| book.records.get(id))
                .cloned()
                .collect()
        };
        shared
            .iter()
            .map(|record| lock_record(record).run.clone())
            .collect()
    }

    /// Returns the lines of a run.
    pub fn lines(&self, run_id: Uuid) -> EngineResult<Vec<PayrollLine>> {
        let shared = self.record(run_id)?;
        let record = lock_record(&shared);
        Ok(record.lines.clone())
    }

    /// Builds the disbursement rows of a processed run.
    pub fn export_disbursement(&self, run_id: Uuid) -> EngineResult<Vec<DisbursementRow>> {
        let shared = self.record(run_id)?;
        let record = lock_record(&shared);
        disbursement_rows(&record.run, &record.lines)
    }

    /// Renders the disbursement file of a processed run as CSV.
    pub fn export_disbursement_csv(&self, run_id: Uuid) -> EngineResult<String> {
        let shared = self.record(run_id)?;
        let record = lock_record(&shared);
        disbursement_csv(&record.run, &record.lines)
    }

    fn ensure_draft(run: &PayrollRun, operation: &str) -> EngineResult<()> {
        if run.status != RunStatus::Draft {
            return Err(EngineError::InvalidState {
                run_id: run.id,
                status: run.status,
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    fn duplicate(&self, config: &RunConfiguration) -> EngineError {
        warn!(period = %config.reference(), "Rejected duplicate payroll run");
        EngineError::DuplicateRun {
            month: config.month,
            year: config.year,
        }
    }

    /// Reads the directory snapshot and runs the calculator per employee.
    fn compute_lines(&self, config: &RunConfiguration) -> EngineResult<Vec<PayrollLine>> {
        let table = self.policy.tax_table_for(config.period_start()?)?;
        let snapshot = self.directory.list_active_compensation().map_err(|err| {
            warn!(period = %config.reference(), error = %err, "Directory snapshot failed");
            match err {
                EngineError::DirectoryUnavailable { .. } => err,
                other => EngineError::DirectoryUnavailable {
                    message: other.to_string(),
                },
            }
        })?;
        Self::validate_snapshot(&snapshot)?;

        debug!(
            period = %config.reference(),
            employees = snapshot.len(),
            tax_table = %table.effective_date,
            "Computing payroll lines"
        );

        let lines: Vec<PayrollLine> = snapshot
            .iter()
            .map(|input| calculate_payroll_line(input, config, self.policy.rates(), table).line)
            .collect();

        for line in &lines {
            for warning in &line.warnings {
                warn!(
                    period = %config.reference(),
                    employee_id = %line.employee_id,
                    code = warning.code.as_str(),
                    "{}",
                    warning.message
                );
            }
        }

        Ok(lines)
    }

    fn validate_snapshot(snapshot: &[CompensationInput]) -> EngineResult<()> {
        let mut seen = HashSet::new();
        for input in snapshot {
            if input.annual_basic_salary < Decimal::ZERO {
                return Err(EngineError::Validation {
                    field: "annual_basic_salary".to_string(),
                    message: format!(
                        "employee '{}' has negative salary {}",
                        input.employee_id, input.annual_basic_salary
                    ),
                });
            }
            if input.annual_basic_salary > MAX_ANNUAL_BASIC_SALARY {
                return Err(EngineError::Validation {
                    field: "annual_basic_salary".to_string(),
                    message: format!(
                        "employee '{}' has salary {} above the ceiling of {}",
                        input.employee_id, input.annual_basic_salary, MAX_ANNUAL_BASIC_SALARY
                    ),
                });
            }
            if !seen.insert(input.employee_id.as_str()) {
                return Err(EngineError::Validation {
                    field: "employee_id".to_string(),
                    message: format!(
                        "employee '{}' appears more than once in the snapshot",
                        input.employee_id
                    ),
                });
            }
        }
        Ok(())
    }
}
