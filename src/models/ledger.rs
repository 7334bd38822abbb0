//! Ledger posting models.
//!
//! A processed run is booked as one [`JournalEntry`] whose legs must net to
//! zero before it is handed to the ledger.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// Which side of the account a leg is booked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySide {
    /// Debit leg.
    Debit,
    /// Credit leg.
    Credit,
}

impl EntrySide {
    /// The opposite side.
    pub fn opposite(self) -> Self {
        match self {
            EntrySide::Debit => EntrySide::Credit,
            EntrySide::Credit => EntrySide::Debit,
        }
    }
}

/// A single journal leg. `amount` is always non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Chart-of-accounts code.
    pub account: String,
    /// Debit or credit.
    pub side: EntrySide,
    /// Amount booked.
    pub amount: Decimal,
}

impl LedgerEntry {
    /// Builds a leg, moving negative amounts to the opposite side.
    pub fn new(account: impl Into<String>, side: EntrySide, amount: Decimal) -> Self {
        let (side, amount) = if amount < Decimal::ZERO {
            (side.opposite(), -amount)
        } else {
            (side, amount)
        };
        Self {
            account: account.into(),
            side,
            amount,
        }
    }
}

/// A balanced set of legs posted as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Human-readable reference, e.g. `PAYROLL-2025-03`.
    pub reference: String,
    /// The run the journal books.
    pub run_id: Uuid,
    /// The journal legs.
    pub entries: Vec<LedgerEntry>,
}

impl JournalEntry {
    /// Sum of the debit legs.
    pub fn total_debits(&self) -> Decimal {
        self.side_total(EntrySide::Debit)
    }

    /// Sum of the credit legs.
    pub fn total_credits(&self) -> Decimal {
        self.side_total(EntrySide::Credit)
    }

    fn side_total(&self, side: EntrySide) -> Decimal {
        self.entries
            .iter()
            .filter(|e| e.side == side)
            .map(|e| e.amount)
            .sum()
    }

    /// Fails with [`EngineError::UnbalancedJournal`] unless debits equal credits.
    pub fn ensure_balanced(&self) -> EngineResult<()> {
        let debits = self.total_debits();
        let credits = self.total_credits();
        if debits != credits {
            return Err(EngineError::UnbalancedJournal {
                reference: self.reference.clone(),
                debits,
                credits,
            });
        }
        Ok(())
    }
}
