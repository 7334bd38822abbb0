//! Payroll journal construction.

use rust_decimal::Decimal;

use crate::config::LedgerAccounts;
use crate::models::{EntrySide, JournalEntry, LedgerEntry, PayrollRun};

/// Builds the journal that books a run's totals.
///
/// Debits the salaries expense account with total gross and credits the
/// PAYE, pension, NHF and net-salaries liabilities. Zero legs are omitted.
/// Because every line satisfies `gross = net + paye + pension + nhf`, the
/// journal balances whenever the run totals equal the sum of its lines.
pub fn build_payroll_journal(run: &PayrollRun, accounts: &LedgerAccounts) -> JournalEntry {
    let totals = &run.totals;
    let legs = [
        (&accounts.salaries_expense, EntrySide::Debit, totals.total_gross),
        (&accounts.paye_payable, EntrySide::Credit, totals.total_paye),
        (&accounts.pension_payable, EntrySide::Credit, totals.total_pension),
        (&accounts.nhf_payable, EntrySide::Credit, totals.total_nhf),
        (&accounts.net_salaries_payable, EntrySide::Credit, totals.total_net),
    ];

    let entries = legs
        .into_iter()
        .filter(|(_, _, amount)| *amount != Decimal::ZERO)
        .map(|(account, side, amount)| LedgerEntry::new(account.as_str(), side, amount))
        .collect();

    JournalEntry {
        reference: run.config.reference(),
        run_id: run.id,
        entries,
    }
}
